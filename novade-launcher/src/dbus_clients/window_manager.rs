use zbus::dbus_proxy;

/// Proxy for the NovaDE window manager, used to raise the windows of a process.
#[dbus_proxy(
    interface = "org.novade.WindowManager",
    default_service = "org.novade.WindowManager",
    default_path = "/org/novade/WindowManager",
    gen_blocking = false
)]
pub trait WindowManager {
    /// Focuses and raises the primary toplevel owned by `pid`.
    /// Returns `false` when the process has no mapped toplevel.
    fn activate_by_pid(&self, pid: u32) -> zbus::Result<bool>;
}
