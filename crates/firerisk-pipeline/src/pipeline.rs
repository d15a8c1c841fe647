use std::iter;

use firerisk_data::{
    frame::LabelVector,
    month::{MalformedMonthError, YearMonth},
    risk::{RiskAnnotatedGrid, RiskCounts, annotate},
    slice::slice_month,
};
use firerisk_map::{
    choropleth::{ColorScale, overlay},
    view::{MapView, create_base_map},
};
use firerisk_model::predictor::{PredictionError, predict};
use serde::Serialize;
use tracing::info;

use crate::context::AppContext;

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum PipelineError {
    #[display("invalid month selection")]
    MalformedMonth(MalformedMonthError),
    #[display("risk prediction failed")]
    Prediction(PredictionError),
}

/// Output of one month's run: the observed and predicted risk grids and a
/// freshly rendered map for each.
#[derive(Debug, Clone)]
pub struct MonthMaps<'a> {
    pub month: YearMonth,
    /// Number of history records that matched the month.
    pub records: usize,
    pub true_risk: RiskAnnotatedGrid<'a>,
    pub predicted_risk: RiskAnnotatedGrid<'a>,
    pub true_map: MapView,
    pub predicted_map: MapView,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthSummary {
    pub month: String,
    pub readable_month: String,
    pub records: usize,
    pub cells: usize,
    pub true_risk: RiskCounts,
    pub predicted_risk: RiskCounts,
    /// Cells where the predicted level equals the observed one.
    pub agreeing_cells: usize,
}

impl MonthMaps<'_> {
    #[must_use]
    pub fn summary(&self) -> MonthSummary {
        let agreeing_cells = iter::zip(self.true_risk.cells(), self.predicted_risk.cells())
            .filter(|(t, p)| t.risk == p.risk)
            .count();
        MonthSummary {
            month: self.month.to_string(),
            readable_month: self.month.readable(),
            records: self.records,
            cells: self.true_risk.len(),
            true_risk: self.true_risk.counts(),
            predicted_risk: self.predicted_risk.counts(),
            agreeing_cells,
        }
    }
}

/// Runs the full pipeline for one `YYYY-MM` month.
///
/// Slices the history, predicts labels with the context's model, joins both
/// the observed and the predicted labels onto the grid and renders each on
/// its own base map. The two render branches share nothing mutable and run
/// in parallel.
///
/// A month without history records is not an error: both maps then show
/// every cell as low risk.
pub fn run_month<'a>(
    ctx: &'a AppContext,
    month: &str,
    colors: &ColorScale,
) -> Result<MonthMaps<'a>, PipelineError> {
    let month: YearMonth = month.parse()?;
    info!(%month, "running risk pipeline");

    let (features, true_labels) = slice_month(ctx.history(), month);
    if features.is_empty() {
        info!(%month, "no history records for month, all cells default to low risk");
    }
    let predicted_labels = predict(&features, &true_labels, ctx.model())?;

    let render = |labels: &LabelVector| {
        let risk = annotate(labels, ctx.grid());
        let map = overlay(create_base_map(), &risk, colors);
        (risk, map)
    };
    let ((true_risk, true_map), (predicted_risk, predicted_map)) =
        rayon::join(|| render(&true_labels), || render(&predicted_labels));

    let maps = MonthMaps {
        month,
        records: features.n_rows(),
        true_risk,
        predicted_risk,
        true_map,
        predicted_map,
    };
    let summary = maps.summary();
    info!(
        %month,
        records = summary.records,
        true_high = summary.true_risk.high,
        predicted_high = summary.predicted_risk.high,
        agreeing = summary.agreeing_cells,
        cells = summary.cells,
        "risk pipeline finished"
    );
    Ok(maps)
}
