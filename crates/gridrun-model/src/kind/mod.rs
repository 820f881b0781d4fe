mod exec;
pub use exec::ExecSpec;

mod sim;
pub use sim::SimSpec;
