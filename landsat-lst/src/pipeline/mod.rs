//! End-to-end retrieval.
//!
//! ```text
//! SceneQuery ─► CollectionSelector ─► [Scene] ─► LstEngine ─► [DerivedProduct] ─► ExportDispatcher
//!                      │                            │                                   │
//!                  empty? ─► EmptySelection     scene failure                    dispatch failures
//!                  (stop)     (recorded, continue)                          (recorded, continue)
//! ```
//!
//! An empty selection stops the run before any per-scene work or export
//! submission. Everything after selection is per scene: one scene failing
//! never affects another.

use std::fmt;

use thiserror::Error;
use tracing::{info, warn};

use crate::catalog::{NameResolver, SceneCatalog};
use crate::export::{DispatchReport, ExportDispatcher, ExportParams, ExportSink};
use crate::lst::{DerivedProduct, LstEngine};
use crate::scene::SceneError;
use crate::selector::{CollectionSelector, SceneQuery, SelectError};

/// Suggestions shown when no scene matches a query.
pub const EMPTY_SELECTION_HINTS: [&str; 4] = [
    "widen the date range",
    "adjust the month filters",
    "relax the cloud cover limits",
    "check the WRS path/row",
];

/// Diagnostic for a query that matched no scene.
#[derive(Debug, Clone, PartialEq)]
pub struct EmptySelection {
    pub query: String,
    pub hints: Vec<&'static str>,
}

impl EmptySelection {
    fn new(query: &SceneQuery) -> Self {
        Self {
            query: query.to_string(),
            hints: EMPTY_SELECTION_HINTS.to_vec(),
        }
    }
}

impl fmt::Display for EmptySelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "No scenes match the query ({})", self.query)?;
        write!(f, "Try to:")?;
        for hint in &self.hints {
            write!(f, "\n  - {hint}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Select(#[from] SelectError),

    #[error("{0}")]
    EmptySelection(EmptySelection),
}

/// Outcome of a successful run.
#[derive(Debug, Default)]
pub struct PipelineReport {
    /// Number of scenes the selector returned.
    pub selected: usize,
    pub products: Vec<DerivedProduct>,
    /// Scenes that could not be processed.
    pub scene_failures: Vec<SceneError>,
    pub dispatch: DispatchReport,
}

/// Selection, retrieval and export over one catalog.
pub struct LstPipeline<'a, C, S>
where
    C: SceneCatalog + NameResolver,
    S: ExportSink,
{
    catalog: &'a C,
    sink: &'a S,
    engine: LstEngine,
    params: ExportParams,
}

impl<'a, C, S> LstPipeline<'a, C, S>
where
    C: SceneCatalog + NameResolver,
    S: ExportSink,
{
    pub fn new(catalog: &'a C, sink: &'a S) -> Self {
        Self {
            catalog,
            sink,
            engine: LstEngine::default(),
            params: ExportParams::default(),
        }
    }

    pub fn with_engine(mut self, engine: LstEngine) -> Self {
        self.engine = engine;
        self
    }

    pub fn with_export_params(mut self, params: ExportParams) -> Self {
        self.params = params;
        self
    }

    /// Select and derive without exporting. The returned report has an
    /// empty dispatch section.
    pub fn derive(&self, query: &SceneQuery) -> Result<PipelineReport, PipelineError> {
        let scenes = CollectionSelector::new(self.catalog).select(query)?;
        if scenes.is_empty() {
            let diagnostic = EmptySelection::new(query);
            warn!(query = %diagnostic.query, "No scenes match the query");
            return Err(PipelineError::EmptySelection(diagnostic));
        }

        let selected = scenes.len();
        let profile = query.sensor().profile();
        let mut products = Vec::with_capacity(selected);
        let mut failures = Vec::new();
        for scene in scenes {
            match self.engine.compute(scene, profile) {
                Ok(product) => products.push(product),
                Err(error) => {
                    warn!(error = %error, "Skipping scene");
                    failures.push(error);
                }
            }
        }
        info!(
            selected,
            derived = products.len(),
            failed = failures.len(),
            "LST retrieval finished"
        );
        Ok(PipelineReport {
            selected,
            products,
            scene_failures: failures,
            dispatch: DispatchReport::default(),
        })
    }

    /// Run selection, retrieval and export.
    pub fn run(&self, query: &SceneQuery) -> Result<PipelineReport, PipelineError> {
        let mut report = self.derive(query)?;
        report.dispatch =
            ExportDispatcher::new(self.catalog, self.sink, self.params).dispatch(&report.products);
        Ok(report)
    }
}
