// 11.0: simulation session. owns the run state machine, the two price sources,
// the last result and the event log. one run at a time; each run's data flows
// linearly fetch -> perturb -> aggregate -> assemble and is never shared.

mod core;
mod pipeline;
mod results;
mod runs;

pub use self::core::SimulationSession;
pub use pipeline::run_pipeline;
pub use results::{RunState, SimulationError};
