pub mod deadline;
pub mod outcome;
pub mod processor;

pub use deadline::Deadline;
pub use outcome::{Action, Cleanup, Outcome};
pub use processor::Pipeline;
