use zbus::dbus_proxy;

/// Client side of `org.novade.Launcher1`, used by `novade-launch` and by
/// integrations that forward "open this" requests to the launcher daemon.
#[dbus_proxy(
    interface = "org.novade.Launcher1",
    default_service = "org.novade.Launcher",
    default_path = "/org/novade/Launcher",
    gen_blocking = false
)]
pub trait Launcher {
    /// `arguments` is `[executable, arg1, ...]`; it must not be empty.
    fn handle_launch_request(&self, arguments: &[&str]) -> zbus::Result<()>;

    fn is_running(&self, executable: &str) -> zbus::Result<bool>;

    /// `(executable, pid, launched_at_unix_ms, last_arguments)` per entry.
    fn list_running(&self) -> zbus::Result<Vec<(String, u32, i64, Vec<String>)>>;
}
