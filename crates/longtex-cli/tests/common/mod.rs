#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;
use tempfile::TempDir;

#[allow(dead_code)]
pub const CMD_TIMEOUT: Duration = Duration::from_secs(15);

fn home_dir() -> &'static Path {
    static HOME_DIR: OnceLock<TempDir> = OnceLock::new();
    HOME_DIR
        .get_or_init(|| tempfile::tempdir().expect("failed to create home dir for tests"))
        .path()
}

/// Create a configured `longtex` command suitable for integration tests.
/// The user's own config is never picked up.
#[allow(dead_code)]
pub fn longtex_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("longtex"));
    cmd.timeout(CMD_TIMEOUT);
    cmd.env_remove("LONGTEX_CONFIG");
    let home = home_dir();
    cmd.env("HOME", home);
    cmd.env("XDG_CONFIG_HOME", home);
    cmd.env("NO_COLOR", "1");
    cmd
}

/// Write `files` (vault-relative path, contents) into a fresh vault.
#[allow(dead_code)]
pub fn vault_with(files: &[(&str, &str)]) -> TempDir {
    let vault = tempfile::tempdir().expect("failed to create vault");
    for (path, contents) in files {
        let path = vault.path().join(path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, contents).unwrap();
    }
    vault
}
