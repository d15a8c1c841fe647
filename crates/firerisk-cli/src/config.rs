use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context;
use firerisk_data::{grid::GridGeometry, history::HistoryTable};
use firerisk_model::artifact::RiskModel;
use firerisk_pipeline::context::AppContext;
use tracing::info;

use crate::util::read_json_file;

pub(crate) const DEFAULT_MONTH: &str = "2025-05";
pub(crate) const DEFAULT_OUTPUT_DIR: &str = "/tmp/maps";

const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_HISTORY_FILE: &str = "df_fires_history_risk.csv";
const DEFAULT_GRID_FILE: &str = "montreal_grid_v1.geojson";
const DEFAULT_MODEL_FILE: &str = "model/xgb_model_v1.json";

/// Locations of the input files.
#[derive(Debug, Clone, PartialEq, Eq, clap::Args)]
pub(crate) struct DataArgs {
    /// Directory holding the history and grid files
    #[arg(long, env = "FIRERISK_DATA_DIR", default_value = DEFAULT_DATA_DIR)]
    data_dir: PathBuf,
    /// History CSV, relative to the data directory
    #[arg(long, default_value = DEFAULT_HISTORY_FILE)]
    history_file: PathBuf,
    /// Grid GeoJSON, relative to the data directory
    #[arg(long, default_value = DEFAULT_GRID_FILE)]
    grid_file: PathBuf,
    /// Trained model artifact
    #[arg(long, env = "FIRERISK_MODEL_FILE", default_value = DEFAULT_MODEL_FILE)]
    model_file: PathBuf,
}

impl DataArgs {
    fn history_path(&self) -> PathBuf {
        self.data_dir.join(&self.history_file)
    }

    fn grid_path(&self) -> PathBuf {
        self.data_dir.join(&self.grid_file)
    }

    pub(crate) fn load_history(&self) -> anyhow::Result<HistoryTable> {
        read_history_file(self.history_path())
    }

    pub(crate) fn load_grid(&self) -> anyhow::Result<GridGeometry> {
        read_grid_file(self.grid_path())
    }

    pub(crate) fn load_model(&self) -> anyhow::Result<RiskModel> {
        read_model_file(&self.model_file)
    }

    /// Loads everything a pipeline run needs, once.
    pub(crate) fn load_context(&self) -> anyhow::Result<AppContext> {
        let history = self.load_history()?;
        let grid = self.load_grid()?;
        let model = self.load_model()?;
        Ok(AppContext::new(history, grid, model))
    }
}

fn open(kind: &str, path: &Path) -> anyhow::Result<BufReader<File>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open {kind} file: {}", path.display()))?;
    Ok(BufReader::new(file))
}

pub(crate) fn read_history_file<P>(path: P) -> anyhow::Result<HistoryTable>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let history = HistoryTable::from_reader(open("history", path)?)
        .with_context(|| format!("Failed to load history file: {}", path.display()))?;
    info!(
        path = %path.display(),
        records = history.len(),
        features = history.feature_names().len(),
        "loaded history"
    );
    Ok(history)
}

pub(crate) fn read_grid_file<P>(path: P) -> anyhow::Result<GridGeometry>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let grid = GridGeometry::from_reader(open("grid", path)?)
        .with_context(|| format!("Failed to load grid file: {}", path.display()))?;
    info!(path = %path.display(), cells = grid.len(), "loaded grid");
    Ok(grid)
}

pub(crate) fn read_model_file<P>(path: P) -> anyhow::Result<RiskModel>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let model: RiskModel = read_json_file("model", path)?;
    model
        .validate()
        .with_context(|| format!("Invalid model file: {}", path.display()))?;
    info!(
        path = %path.display(),
        name = %model.name,
        trained_at = %model.trained_at,
        features = ?model.feature_names(),
        "loaded model"
    );
    Ok(model)
}
