pub mod error;
pub mod geometry;
pub mod math;
pub mod operations;
pub mod outline;
pub mod step;
pub mod topology;

pub use error::{BoardStepError, Result};
