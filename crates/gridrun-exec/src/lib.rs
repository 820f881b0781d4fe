mod error;
pub use error::{ExecError, ExecResult};

mod util;
pub use util::kill_graceful;

pub mod proc;
pub use proc::{StdioPolicy, run_to_completion};

pub mod sim;
pub use sim::SimRunner;

pub mod prelude {
    pub use crate::SimRunner;
    pub use crate::error::{ExecError, ExecResult};
    pub use crate::proc::StdioPolicy;
}
