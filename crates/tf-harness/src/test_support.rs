//! Shared helpers for exercising the driver against a stub binary.
//!
//! The stub is a small shell script standing in for the real external tool.
//! It appends each subcommand to `calls.log` in its working directory and
//! reacts to marker files:
//!
//! - `fail_<cmd>` — fail `<cmd>` once per invocation, emitting the file's
//!   contents on stderr.
//! - `fail_<cmd>_times` / `fail_<cmd>_message` — fail `<cmd>` while the
//!   counter is positive, decrementing it each time.
//! - `sleep_<cmd>` — sleep that many seconds before responding.
//! - `output.json` — document printed by the `output` subcommand.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const STUB_SCRIPT: &str = r#"#!/bin/sh
cmd="$1"
echo "$cmd" >> calls.log
printf '%s\n' "${TF_STUB_MARKER:-}" > env.log
if [ -f "sleep_$cmd" ]; then
  sleep "$(cat "sleep_$cmd")"
fi
if [ -f "fail_${cmd}_times" ]; then
  n=$(cat "fail_${cmd}_times")
  if [ "$n" -gt 0 ]; then
    echo $((n - 1)) > "fail_${cmd}_times"
    if [ -f "fail_${cmd}_message" ]; then
      cat "fail_${cmd}_message" >&2
    fi
    exit 1
  fi
fi
if [ -f "fail_$cmd" ]; then
  cat "fail_$cmd" >&2
  exit 1
fi
if [ "$cmd" = "output" ]; then
  cat output.json
fi
exit 0
"#;

pub(crate) struct StubBinary {
    dir: TempDir,
}

impl StubBinary {
    pub(crate) fn new() -> Self {
        let dir = tempfile::tempdir().expect("create stub tempdir");
        let path = dir.path().join("terraform-stub");
        fs::write(&path, STUB_SCRIPT).expect("write stub script");
        let mut perms = fs::metadata(&path).expect("stat stub script").permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&path, perms).expect("chmod stub script");
        Self { dir }
    }

    /// Path to the stub executable.
    pub(crate) fn path(&self) -> PathBuf {
        self.dir.path().join("terraform-stub")
    }

    /// Working directory the stub logs into; use it as `terraform_dir`.
    pub(crate) fn dir(&self) -> &Path {
        self.dir.path()
    }

    pub(crate) fn write(&self, name: &str, contents: &str) {
        fs::write(self.dir.path().join(name), contents).expect("write stub marker");
    }

    pub(crate) fn read(&self, name: &str) -> String {
        fs::read_to_string(self.dir.path().join(name)).unwrap_or_default()
    }

    /// Subcommands invoked so far, in order.
    pub(crate) fn calls(&self) -> Vec<String> {
        self.read("calls.log")
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// Number of times one subcommand was invoked.
    pub(crate) fn count(&self, command: &str) -> usize {
        self.calls().iter().filter(|c| *c == command).count()
    }
}
