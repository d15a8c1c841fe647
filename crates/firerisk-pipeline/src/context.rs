use firerisk_data::{grid::GridGeometry, history::HistoryTable};
use firerisk_model::Classifier;

/// Long-lived, read-only inputs shared by every pipeline run.
///
/// Built once by the loading layer and passed by reference; nothing in the
/// pipeline mutates it, so one context can serve concurrent runs.
#[derive(Debug)]
pub struct AppContext {
    history: HistoryTable,
    grid: GridGeometry,
    model: Box<dyn Classifier>,
}

impl AppContext {
    pub fn new<C>(history: HistoryTable, grid: GridGeometry, model: C) -> Self
    where
        C: Classifier + 'static,
    {
        Self {
            history,
            grid,
            model: Box::new(model),
        }
    }

    #[must_use]
    pub fn history(&self) -> &HistoryTable {
        &self.history
    }

    #[must_use]
    pub fn grid(&self) -> &GridGeometry {
        &self.grid
    }

    #[must_use]
    pub fn model(&self) -> &dyn Classifier {
        self.model.as_ref()
    }
}
