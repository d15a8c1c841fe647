use std::fmt;

use serde_json::Value;

/// Identifier of one grid cell.
///
/// The history table and the grid geometry come from different files, and
/// the same cell can be spelled `12`, `"12"` or `12.0` depending on the
/// writer. Integral numeric spellings are normalized to their integer form so
/// that both sources agree; anything else is kept verbatim (trimmed).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GridId(String);

impl GridId {
    #[must_use]
    pub fn new(raw: &str) -> Self {
        let raw = raw.trim();
        if let Ok(n) = raw.parse::<i64>() {
            return Self(n.to_string());
        }
        if let Ok(f) = raw.parse::<f64>()
            && let Some(n) = integral(f)
        {
            return Self(n.to_string());
        }
        Self(raw.to_owned())
    }

    /// Builds an id from a GeoJSON property value.
    ///
    /// Returns `None` for values that cannot name a cell (null, bool, arrays,
    /// objects).
    #[must_use]
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Self::new(s)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(Self(i.to_string()))
                } else if let Some(i) = n.as_f64().and_then(integral) {
                    Some(Self(i.to_string()))
                } else {
                    Some(Self(n.to_string()))
                }
            }
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[expect(clippy::cast_possible_truncation)]
fn integral(f: f64) -> Option<i64> {
    (f.is_finite() && f.fract() == 0.0 && f.abs() < 9.0e15).then_some(f as i64)
}

impl fmt::Display for GridId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GridId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}
