mod domain;
pub use domain::*;

mod kind;
pub use kind::*;

mod config;
pub use config::GridConfig;

mod error;
pub use error::ModelError;
