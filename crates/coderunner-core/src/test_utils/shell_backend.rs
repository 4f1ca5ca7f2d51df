// src/test_utils/shell_backend.rs
use std::path::PathBuf;
use std::sync::Mutex;
use tempfile::TempDir;
use tokio::process::Command;

use crate::executors::ExecBackend;

/// [`ExecBackend`] running local `sh` in a scratch directory that plays the
/// part of the container filesystem. The entrypoint is `script.sh` in that
/// directory; injected code lands in `input.txt`.
pub struct ShellBackend {
    dir: TempDir,
    injection_script: String,
    containers: Mutex<Vec<String>>,
}

impl ShellBackend {
    pub fn new(entrypoint_script: &str) -> Self {
        let dir = tempfile::Builder::new().prefix("coderunner-").tempdir().unwrap();
        std::fs::write(dir.path().join("script.sh"), entrypoint_script).unwrap();
        Self {
            dir,
            injection_script: "cat > input.txt".to_string(),
            containers: Mutex::new(Vec::new()),
        }
    }

    /// Make the injection session print `stderr` and exit 1 without reading stdin.
    pub fn with_failing_injection(self, stderr: &str) -> Self {
        self.with_injection_script(&format!("echo '{}' >&2; exit 1", stderr))
    }

    /// Replace the script run by the injection session.
    pub fn with_injection_script(mut self, script: &str) -> Self {
        self.injection_script = script.to_string();
        self
    }

    pub fn input_path(&self) -> PathBuf {
        self.dir.path().join("input.txt")
    }

    pub fn read_input(&self) -> std::io::Result<String> {
        std::fs::read_to_string(self.input_path())
    }

    /// Container IDs the exec sessions were opened against, in order.
    pub fn containers(&self) -> Vec<String> {
        self.containers.lock().unwrap().clone()
    }

    fn shell(&self, container_id: &str, script: &str) -> Command {
        self.containers.lock().unwrap().push(container_id.to_string());
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(script).current_dir(self.dir.path());
        cmd
    }
}

impl ExecBackend for ShellBackend {
    fn inject_command(&self, container_id: &str) -> Command {
        self.shell(container_id, &self.injection_script)
    }

    fn entrypoint_command(&self, container_id: &str) -> Command {
        self.shell(container_id, "sh script.sh")
    }
}
