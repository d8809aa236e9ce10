mod interrupt;
mod orchestrator;
mod pipeline;
mod stats;

pub use interrupt::Interrupt;
pub use orchestrator::{Orchestrator, RunStatus};
