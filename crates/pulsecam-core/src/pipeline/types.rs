use crate::model::{ApertureValue, ExposureParams, Look};

/// Composite processing stage, used for progress reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompositeStage {
    Accumulating,
    Developing,
}

impl std::fmt::Display for CompositeStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Accumulating => write!(f, "Accumulating frames"),
            Self::Developing => write!(f, "Developing"),
        }
    }
}

/// Progress feedback for a composite.
///
/// Implementors can drive progress bars, logging, or any other UI feedback.
/// All methods have default no-op implementations.
pub trait ProgressReporter {
    /// A new stage has started. `total_items` is the number of work items in
    /// this stage (e.g. frame count), if known.
    fn begin_stage(&self, _stage: CompositeStage, _total_items: Option<usize>) {}

    /// `items_done` work items within the current stage have completed.
    fn advance(&self, _items_done: usize) {}

    /// The current stage is finished.
    fn finish_stage(&self) {}
}

/// No-op progress reporter.
pub struct NoOpReporter;
impl ProgressReporter for NoOpReporter {}

/// Parameters of one composite, fixed when it starts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CompositePlan {
    pub aperture: ApertureValue,
    pub bpm: f64,
    pub exposure: ExposureParams,
    pub look: Look,
}
