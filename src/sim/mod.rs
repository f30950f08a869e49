pub mod config;
pub mod driver;
pub mod sampler;
pub mod stats;

pub use config::SimConfig;
pub use driver::{PolicyKind, Sim, replicate, simulate, sweep_arrival_rates};
pub use sampler::{RandSampler, ScriptedSampler};
pub use stats::Stats;
