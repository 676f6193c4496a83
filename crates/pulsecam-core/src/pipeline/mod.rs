pub mod config;
mod compositor;
mod develop;
mod preview;
mod session;
mod types;

pub use compositor::{CompositeJob, Compositor};
pub use develop::develop;
pub use preview::{DisplaySurface, ImageSurface, PreviewRenderer};
pub use session::RenderSession;
pub use types::{CompositePlan, CompositeStage, NoOpReporter, ProgressReporter};
