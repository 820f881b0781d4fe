mod load;
pub use load::Load;

mod task;
pub use task::SimTask;

mod axes;
pub use axes::{GridAxes, LoadRange};

mod worker;
pub use worker::{WorkerId, WorkerState};

/// Number of contending stations in one simulation run.
pub type StationCount = u32;

/// Random seed handed to the simulator.
pub type Seed = u64;
