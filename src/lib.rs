pub mod core;
pub mod error;
pub mod scheduler;
pub mod sim;

pub use error::{ConfigError, SimError};
pub use scheduler::{Hrrn, Policy, RoundRobin};
pub use sim::{PolicyKind, Sim, SimConfig, Stats};
