use std::path::PathBuf;

use firerisk_map::{choropleth::overlay_grid, view::create_base_map};
use tracing::info;

use crate::{config::DataArgs, util::Output};

#[derive(Debug, Clone, PartialEq, Eq, clap::Args)]
pub(crate) struct GridArg {
    /// Output HTML file; prints to stdout when omitted
    #[arg(long)]
    output: Option<PathBuf>,
    #[clap(flatten)]
    data: DataArgs,
}

pub(crate) fn run(arg: &GridArg) -> anyhow::Result<()> {
    let GridArg { output, data } = arg;

    let grid = data.load_grid()?;
    let map = overlay_grid(create_base_map(), &grid);
    let mut out = Output::from_output_path(output.clone())?;
    info!(cells = grid.len(), output = %out.display_path(), "writing grid map");
    out.write_text(&map.to_html())?;
    Ok(())
}
