pub mod catalog;
#[allow(clippy::module_inception)]
pub mod orchestrator;
pub mod progress;
pub mod view;


pub use catalog::SessionCatalog;
pub use orchestrator::{OrchestratorSettings, ProgressStatus, QueryOutcome, SessionOrchestrator};
pub use progress::{ProgressSimulator, ProgressTick};
pub use view::{ActiveView, Ticket};
