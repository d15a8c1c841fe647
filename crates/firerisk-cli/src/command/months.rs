use std::path::PathBuf;

use firerisk_data::history::HistoryTable;
use serde::Serialize;

use crate::{config::DataArgs, util::Output};

#[derive(Debug, Clone, PartialEq, Eq, clap::Args)]
pub(crate) struct MonthsArg {
    /// Output JSON file; prints to stdout when omitted
    #[arg(long)]
    output: Option<PathBuf>,
    #[clap(flatten)]
    data: DataArgs,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct MonthEntry {
    month: String,
    readable_month: String,
    records: usize,
}

pub(crate) fn run(arg: &MonthsArg) -> anyhow::Result<()> {
    let MonthsArg { output, data } = arg;

    let history = data.load_history()?;
    Output::save_json(&list_months(&history), output.clone())?;
    Ok(())
}

/// Months with at least one record, oldest first.
fn list_months(history: &HistoryTable) -> Vec<MonthEntry> {
    history
        .month_counts()
        .into_iter()
        .map(|(month, records)| MonthEntry {
            month: month.to_string(),
            readable_month: month.readable(),
            records,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_months() {
        let history = HistoryTable::from_reader(
            "GRID_ID,CURRENT_MONTH_END,NEXT_MONTH_END,RISK_NEXT_MONTH\n\
             A,2025-05-31,2025-06-30,0\n\
             A,2025-04-30,2025-05-31,1\n\
             B,2025-04-30,2025-05-31,0\n"
                .as_bytes(),
        )
        .unwrap();

        let months = list_months(&history);
        assert_eq!(
            months,
            [
                MonthEntry {
                    month: "2025-05".to_owned(),
                    readable_month: "May 2025".to_owned(),
                    records: 2,
                },
                MonthEntry {
                    month: "2025-06".to_owned(),
                    readable_month: "June 2025".to_owned(),
                    records: 1,
                },
            ]
        );
    }
}
