//! Data types shared by the registry, the broker and the D-Bus surface.

pub mod identity;
pub mod record;
pub mod request;

pub use identity::ExecutableIdentity;
pub use record::ProcessRecord;
pub use request::{LaunchOutcome, LaunchRequest};
