//! Shared test infrastructure for CLI integration tests.

use std::env;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

fn manifest_dir() -> PathBuf {
    PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".into()))
}

/// Result of one `rackmatch` invocation.
#[derive(Debug)]
pub struct RunOutput {
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl From<Output> for RunOutput {
    fn from(output: Output) -> Self {
        Self {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }
}

/// A fixture copied into a scratch directory so reports land outside the repo.
pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp dir"),
        }
    }

    /// Copy every file of tests/fixtures/{name}/ into the workspace.
    pub fn from_fixture(name: &str) -> Self {
        let workspace = Self::new();
        let fixture_dir = manifest_dir().join("tests/fixtures").join(name);
        for entry in std::fs::read_dir(&fixture_dir).expect("read fixture dir") {
            let entry = entry.expect("fixture entry");
            std::fs::copy(entry.path(), workspace.path().join(entry.file_name()))
                .expect("copy fixture file");
        }
        workspace
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.path().join(name);
        std::fs::write(&path, contents.as_bytes()).expect("write workspace file");
        path
    }

    pub fn read(&self, name: &str) -> String {
        std::fs::read_to_string(self.path().join(name)).expect("read workspace file")
    }
}

/// Run the built binary with a scrubbed environment.
pub fn rackmatch<I, S>(args: I) -> RunOutput
where
    I: IntoIterator<Item = S>,
    S: AsRef<std::ffi::OsStr>,
{
    rackmatch_with_env(args, &[])
}

/// Run the built binary with a scrubbed environment plus `envs`.
pub fn rackmatch_with_env<I, S>(args: I, envs: &[(&str, &str)]) -> RunOutput
where
    I: IntoIterator<Item = S>,
    S: AsRef<std::ffi::OsStr>,
{
    Command::new(env!("CARGO_BIN_EXE_rackmatch"))
        .args(args)
        .env_remove("RUST_LOG")
        .env_remove("RACKMATCH_URL")
        .env_remove("RACKMATCH_TIMEOUT")
        .env_remove("RACKMATCH_BACKEND")
        .envs(envs.iter().copied())
        .output()
        .expect("run rackmatch")
        .into()
}
