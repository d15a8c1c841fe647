use std::path::{Path, PathBuf};

use firerisk_map::{choropleth::ColorScale, view::MapView};
use firerisk_pipeline::{
    context::AppContext,
    pipeline::{MonthMaps, MonthSummary, run_month},
};
use serde::Serialize;
use tracing::info;

use crate::{
    config::{DEFAULT_MONTH, DEFAULT_OUTPUT_DIR, DataArgs},
    util::Output,
};

const TRUE_MAP_FILE: &str = "map_month_true.html";
const PREDICTED_MAP_FILE: &str = "map_month_pred.html";

#[derive(Debug, Clone, PartialEq, Eq, clap::Args)]
pub(crate) struct RenderArg {
    /// Month to render, as YYYY-MM
    #[arg(long, default_value = DEFAULT_MONTH)]
    month: String,
    /// Directory the two map files are written to
    #[arg(long, default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,
    /// Write the run summary here instead of stdout
    #[arg(long)]
    summary: Option<PathBuf>,
    #[clap(flatten)]
    data: DataArgs,
}

#[derive(Debug, Serialize)]
struct RenderSummary {
    #[serde(flatten)]
    month: MonthSummary,
    true_map: PathBuf,
    predicted_map: PathBuf,
}

pub(crate) fn run(arg: &RenderArg) -> anyhow::Result<()> {
    let RenderArg {
        month,
        output_dir,
        summary,
        data,
    } = arg;

    let ctx = data.load_context()?;
    let summary_value = render_month(&ctx, month, output_dir)?;
    Output::save_json(&summary_value, summary.clone())?;
    Ok(())
}

fn render_month(ctx: &AppContext, month: &str, output_dir: &Path) -> anyhow::Result<RenderSummary> {
    let maps = run_month(ctx, month, &ColorScale::default())?;
    write_maps(&maps, output_dir)
}

fn write_maps(maps: &MonthMaps<'_>, output_dir: &Path) -> anyhow::Result<RenderSummary> {
    let true_map = output_dir.join(TRUE_MAP_FILE);
    let predicted_map = output_dir.join(PREDICTED_MAP_FILE);
    write_map(&maps.true_map, &true_map)?;
    write_map(&maps.predicted_map, &predicted_map)?;

    Ok(RenderSummary {
        month: maps.summary(),
        true_map,
        predicted_map,
    })
}

fn write_map(map: &MapView, path: &Path) -> anyhow::Result<()> {
    Output::save_text(&map.to_html(), Some(path.to_owned()))?;
    info!(path = %path.display(), "saved map");
    Ok(())
}
