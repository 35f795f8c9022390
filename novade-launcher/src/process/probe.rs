//! OS-level liveness checks for registry entries.

use crate::types::ExecutableIdentity;
use nix::errno::Errno;
use nix::sys::signal::kill;
use nix::unistd::Pid;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

/// argv slots that may hold the script path: `[interpreter, (option,) script, ...]`.
const MAX_SCRIPT_ARGV_INDEX: usize = 2;

/// Answers whether a cached pid still belongs to a live process running the
/// same executable.
pub trait ProcessProbe: Send + Sync {
    fn is_running(&self, pid: u32, identity: &ExecutableIdentity) -> bool;
}

/// [`ProcessProbe`] backed by `kill(pid, 0)` and `/proc`.
///
/// A pid counts as running when it accepts signal 0, is not a zombie, and its
/// `/proc/<pid>` entry matches the identity:
///
/// - the `exe` link equals the executable (after resolving symlinks), or a
///   bare command name equals the `exe` file name;
/// - `argv[0]` equals the identity verbatim;
/// - the identity is a `#!` script, `exe` is its interpreter, and one of the
///   first argv slots names the script. The kernel runs scripts as
///   `[interpreter, script, args...]`, so neither of the rules above sees them.
#[derive(Debug, Clone)]
pub struct ProcfsProbe {
    proc_root: PathBuf,
}

impl Default for ProcfsProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcfsProbe {
    pub fn new() -> Self {
        Self::with_proc_root("/proc")
    }

    pub fn with_proc_root(proc_root: impl Into<PathBuf>) -> Self {
        Self {
            proc_root: proc_root.into(),
        }
    }

    fn pid_dir(&self, pid: u32) -> PathBuf {
        self.proc_root.join(pid.to_string())
    }

    fn is_zombie(&self, pid: u32) -> bool {
        let Ok(stat) = fs::read_to_string(self.pid_dir(pid).join("stat")) else {
            return false;
        };
        // comm may contain spaces and parentheses; the state follows the last ')'.
        stat.rfind(')')
            .and_then(|idx| stat[idx + 1..].split_whitespace().next())
            .map(|state| state == "Z" || state == "X")
            .unwrap_or(false)
    }

    fn matches_identity(&self, pid: u32, identity: &ExecutableIdentity) -> bool {
        let dir = self.pid_dir(pid);
        if !dir.exists() {
            // No procfs for this pid (non-Linux); the signal check is all we have.
            return true;
        }

        if let Ok(exe) = fs::read_link(dir.join("exe")) {
            let exe_text = exe.to_string_lossy();
            let exe_path = Path::new(exe_text.trim_end_matches(" (deleted)"));
            if exe_path == identity.as_path() {
                return true;
            }
            if let Ok(canonical) = fs::canonicalize(identity.as_path()) {
                if canonical == exe_path {
                    return true;
                }
            }
            if !identity.as_str().contains('/')
                && exe_path.file_name().and_then(|n| n.to_str()) == identity.file_name()
            {
                return true;
            }
        }

        let argv = fs::read(dir.join("cmdline")).map(|raw| split_cmdline(&raw)).unwrap_or_default();
        if argv.first().map(String::as_str) == Some(identity.as_str()) {
            return true;
        }

        matches_script(&dir, &argv, identity)
    }
}

fn matches_script(dir: &Path, argv: &[String], identity: &ExecutableIdentity) -> bool {
    let Some(script) = resolve_executable(identity) else {
        return false;
    };
    let Some(interpreter) = shebang_interpreter(&script) else {
        return false;
    };
    let Ok(exe) = fs::read_link(dir.join("exe")) else {
        return false;
    };
    if !is_interpreter(&exe, &interpreter) {
        return false;
    }

    let canonical_script = fs::canonicalize(&script).ok();
    argv.iter()
        .skip(1)
        .take(MAX_SCRIPT_ARGV_INDEX)
        .any(|arg| {
            let arg = Path::new(arg);
            arg == identity.as_path()
                || arg == script.as_path()
                || (canonical_script.is_some() && fs::canonicalize(arg).ok() == canonical_script)
        })
}

fn split_cmdline(raw: &[u8]) -> Vec<String> {
    raw.split(|b| *b == 0)
        .filter(|part| !part.is_empty())
        .map(|part| String::from_utf8_lossy(part).into_owned())
        .collect()
}

/// Path of the file a request for `identity` executes; bare names go through `$PATH`.
fn resolve_executable(identity: &ExecutableIdentity) -> Option<PathBuf> {
    if identity.as_str().contains('/') {
        return Some(identity.as_path().to_path_buf());
    }
    let path_var = std::env::var_os("PATH")?;
    std::env::split_paths(&path_var)
        .map(|dir| dir.join(identity.as_str()))
        .find(|candidate| candidate.is_file())
}

/// Interpreter named by the `#!` line of `script`. For `#!/usr/bin/env prog`
/// this is `prog`.
fn shebang_interpreter(script: &Path) -> Option<PathBuf> {
    let mut head = [0u8; 256];
    let read = fs::File::open(script).and_then(|mut f| f.read(&mut head)).ok()?;
    let head = &head[..read];
    let line = head.strip_prefix(b"#!")?;
    let line = line.split(|b| *b == b'\n').next().unwrap_or_default();
    let line = String::from_utf8_lossy(line);

    let mut tokens = line.split_whitespace();
    let interpreter = PathBuf::from(tokens.next()?);
    if interpreter.file_name().and_then(|n| n.to_str()) == Some("env") {
        return tokens.find(|t| !t.starts_with('-')).map(PathBuf::from);
    }
    Some(interpreter)
}

/// `exe` runs `interpreter`: same path after resolving symlinks, or the same
/// program name with an optional version suffix (`python3` runs as `python3.12`).
fn is_interpreter(exe: &Path, interpreter: &Path) -> bool {
    if exe == interpreter || fs::canonicalize(interpreter).ok().as_deref() == Some(exe) {
        return true;
    }
    match (
        exe.file_name().and_then(|n| n.to_str()),
        interpreter.file_name().and_then(|n| n.to_str()),
    ) {
        (Some(exe_name), Some(name)) => {
            exe_name == name
                || exe_name
                    .strip_prefix(name)
                    .map_or(false, |rest| rest.starts_with('.') || rest.starts_with('-'))
        }
        _ => false,
    }
}

fn signal_alive(pid: u32) -> bool {
    let Ok(raw) = i32::try_from(pid) else {
        return false;
    };
    if raw <= 0 {
        return false;
    }
    match kill(Pid::from_raw(raw), None) {
        Ok(()) => true,
        // Exists, but owned by someone else.
        Err(Errno::EPERM) => true,
        Err(_) => false,
    }
}

impl ProcessProbe for ProcfsProbe {
    fn is_running(&self, pid: u32, identity: &ExecutableIdentity) -> bool {
        if !signal_alive(pid) {
            tracing::debug!(executable = %identity, pid, "Process no longer exists");
            return false;
        }
        if self.is_zombie(pid) {
            tracing::debug!(executable = %identity, pid, "Process is a zombie");
            return false;
        }
        let matches = self.matches_identity(pid, identity);
        if !matches {
            tracing::debug!(executable = %identity, pid, "Pid was reused by another executable");
        }
        matches
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::fs::symlink;
    use tempfile::TempDir;

    struct FakeProc {
        root: TempDir,
    }

    impl FakeProc {
        fn new() -> Self {
            Self {
                root: TempDir::new().unwrap(),
            }
        }

        fn add(&self, pid: u32, exe: Option<&Path>, argv: &[&str], state: &str) {
            let dir = self.root.path().join(pid.to_string());
            fs::create_dir_all(&dir).unwrap();
            if let Some(exe) = exe {
                symlink(exe, dir.join("exe")).unwrap();
            }
            let mut cmdline = argv.join("\0");
            cmdline.push('\0');
            fs::write(dir.join("cmdline"), cmdline).unwrap();
            fs::write(dir.join("stat"), format!("{} (my (odd) app) {} 1 1 1", pid, state)).unwrap();
        }

        fn probe(&self) -> ProcfsProbe {
            ProcfsProbe::with_proc_root(self.root.path())
        }
    }

    fn id(raw: &str) -> ExecutableIdentity {
        ExecutableIdentity::parse(raw).unwrap()
    }

    #[test]
    fn exe_link_matches_identity() {
        let fake = FakeProc::new();
        fake.add(10, Some(Path::new("/usr/bin/foo")), &["foo"], "S");
        assert!(fake.probe().matches_identity(10, &id("/usr/bin/foo")));
        assert!(!fake.probe().matches_identity(10, &id("/usr/bin/bar")));
    }

    #[test]
    fn deleted_binary_still_matches() {
        let fake = FakeProc::new();
        fake.add(11, Some(Path::new("/usr/bin/foo (deleted)")), &["x"], "S");
        assert!(fake.probe().matches_identity(11, &id("/usr/bin/foo")));
    }

    #[test]
    fn bare_command_matches_exe_file_name() {
        let fake = FakeProc::new();
        fake.add(12, Some(Path::new("/usr/lib/firefox/firefox")), &["/usr/lib/firefox/firefox"], "S");
        assert!(fake.probe().matches_identity(12, &id("firefox")));
    }

    fn write_script(dir: &Path, name: &str, shebang: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, format!("{}\nexit 0\n", shebang)).unwrap();
        path
    }

    #[test]
    fn script_matches_through_interpreter_argv() {
        let fake = FakeProc::new();
        let scripts = TempDir::new().unwrap();
        let script = write_script(scripts.path(), "run.py", "#!/usr/bin/python3");
        let script_str = script.to_str().unwrap();

        fake.add(13, Some(Path::new("/usr/bin/python3")), &["/usr/bin/python3", script_str, "--x"], "S");
        assert!(fake.probe().matches_identity(13, &id(script_str)));

        // Interpreter options come before the script.
        fake.add(17, Some(Path::new("/usr/bin/python3")), &["/usr/bin/python3", "-E", script_str], "S");
        assert!(fake.probe().matches_identity(17, &id(script_str)));
    }

    #[test]
    fn env_shebang_accepts_versioned_interpreter() {
        let fake = FakeProc::new();
        let scripts = TempDir::new().unwrap();
        let script = write_script(scripts.path(), "tool", "#!/usr/bin/env -S python3");
        let script_str = script.to_str().unwrap();

        fake.add(18, Some(Path::new("/usr/bin/python3.12")), &["python3", script_str], "S");
        assert!(fake.probe().matches_identity(18, &id(script_str)));
    }

    #[test]
    fn interpreter_running_another_script_does_not_match() {
        let fake = FakeProc::new();
        let scripts = TempDir::new().unwrap();
        let script = write_script(scripts.path(), "run.py", "#!/usr/bin/python3");
        let other = write_script(scripts.path(), "other.py", "#!/usr/bin/python3");

        fake.add(19, Some(Path::new("/usr/bin/python3")), &["/usr/bin/python3", other.to_str().unwrap()], "S");
        assert!(!fake.probe().matches_identity(19, &id(script.to_str().unwrap())));
    }

    #[test]
    fn script_path_under_a_different_interpreter_does_not_match() {
        let fake = FakeProc::new();
        let scripts = TempDir::new().unwrap();
        let script = write_script(scripts.path(), "run.py", "#!/usr/bin/python3");
        let script_str = script.to_str().unwrap();

        // e.g. a reused pid now running `less run.py`
        fake.add(20, Some(Path::new("/usr/bin/less")), &["less", script_str], "S");
        assert!(!fake.probe().matches_identity(20, &id(script_str)));
    }

    #[test]
    fn binary_without_shebang_is_not_a_script() {
        let scripts = TempDir::new().unwrap();
        let binary = scripts.path().join("app");
        fs::write(&binary, b"\x7fELF\x02\x01").unwrap();
        assert_eq!(shebang_interpreter(&binary), None);
        assert_eq!(
            shebang_interpreter(&write_script(scripts.path(), "sh", "#! /bin/sh -e")),
            Some(PathBuf::from("/bin/sh"))
        );
    }

    #[test]
    fn zombie_state_is_detected() {
        let fake = FakeProc::new();
        fake.add(14, None, &["foo"], "Z");
        fake.add(15, None, &["foo"], "R");
        assert!(fake.probe().is_zombie(14));
        assert!(!fake.probe().is_zombie(15));
        assert!(!fake.probe().is_zombie(16));
    }

    #[test]
    fn missing_pid_dir_defers_to_signal_check() {
        let fake = FakeProc::new();
        assert!(fake.probe().matches_identity(99, &id("/usr/bin/foo")));
    }

    #[test]
    fn invalid_pids_are_never_alive() {
        assert!(!signal_alive(0));
        assert!(!signal_alive(u32::MAX));
    }

    #[test]
    fn own_process_is_running() {
        let exe = std::env::current_exe().unwrap();
        let identity = id(exe.to_str().unwrap());
        assert!(ProcfsProbe::new().is_running(std::process::id(), &identity));
    }
}
