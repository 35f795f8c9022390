pub mod manager;

pub use manager::{DbusManagerError, DbusServiceManager};
