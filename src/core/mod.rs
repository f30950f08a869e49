pub mod driver;
pub mod event;
pub mod factory;
pub mod observer;
pub mod state;

pub use driver::SimCore;
pub use event::{Event, EventKind, EventQueue};
pub use factory::{ProcessFactory, Sampler};
pub use state::{CpuSwitch, Process, ProcessId, ReadyQueue, RunState, SwitchReason, Time};
