//! OS collaborators of the broker: spawning, liveness and activation.
//!
//! Each concern is a trait so the broker can be built with fakes in tests.

pub mod activator;
pub mod probe;
pub mod spawner;

pub use activator::{Activator, DbusActivator};
pub use probe::{ProcessProbe, ProcfsProbe};
pub use spawner::{ProcessSpawner, SpawnedProcess, TokioProcessSpawner};
