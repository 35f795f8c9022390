//! Typed D-Bus proxies.

pub mod launcher_client;
pub mod window_manager;

pub use launcher_client::LauncherProxy;
pub use window_manager::WindowManagerProxy;
