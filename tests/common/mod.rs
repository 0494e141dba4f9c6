#![allow(dead_code)]

pub mod server;

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

pub use server::FixtureServer;

/// Helper struct to run steward commands against an isolated home directory
pub struct StewardTest {
    pub home: TempDir,
    base_url: String,
}

impl StewardTest {
    pub fn new(server: &FixtureServer) -> Self {
        let home = TempDir::new().expect("Failed to create temp directory");
        StewardTest {
            home,
            base_url: server.base_url(),
        }
    }

    /// Same as [`StewardTest::new`], already signed in.
    pub fn signed_in(server: &FixtureServer) -> Self {
        let test = Self::new(server);
        test.run_success(&["login", "tester"]);
        test
    }

    pub fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_steward"))
            .args(args)
            .env("STEWARD_HOME", self.home.path())
            .env("STEWARD_BASE_URL", &self.base_url)
            .env_remove("RUST_LOG")
            .current_dir(self.home.path())
            .output()
            .expect("Failed to execute steward command")
    }

    pub fn run_success(&self, args: &[&str]) -> String {
        let output = self.run(args);
        if !output.status.success() {
            panic!(
                "Command {:?} failed with status {:?}\nstdout: {}\nstderr: {}",
                args,
                output.status,
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            );
        }
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    pub fn run_failure(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            !output.status.success(),
            "Expected command {:?} to fail, but it succeeded",
            args
        );
        String::from_utf8_lossy(&output.stderr).to_string()
    }

    /// Run with `--json` appended and parse stdout.
    pub fn run_json(&self, args: &[&str]) -> serde_json::Value {
        let mut args = args.to_vec();
        args.push("--json");
        let stdout = self.run_success(&args);
        serde_json::from_str(&stdout).unwrap_or_else(|e| {
            panic!("Command {args:?} printed invalid JSON ({e}):\n{stdout}")
        })
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.home.path().join(name)
    }

    pub fn read(&self, name: &str) -> String {
        fs::read_to_string(self.path(name)).expect("Failed to read state file")
    }

    pub fn write(&self, name: &str, content: &str) {
        fs::write(self.path(name), content).expect("Failed to write state file");
    }
}
