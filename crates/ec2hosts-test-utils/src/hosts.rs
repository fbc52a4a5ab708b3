//! [`TestHosts`] fixture: a hosts file inside a temporary directory.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary directory holding one hosts file, plus helpers to inspect
/// the file and any backups written next to it.
///
/// # Example
///
/// ```rust,no_run
/// use ec2hosts_test_utils::hosts::TestHosts;
///
/// let hosts = TestHosts::with_content("127.0.0.1 localhost\n");
/// hosts.assert_contains("localhost");
/// assert!(hosts.backups().is_empty());
/// ```
pub struct TestHosts {
    temp_dir: TempDir,
    path: PathBuf,
}

impl TestHosts {
    /// Create a hosts file with the given content.
    pub fn with_content(content: &str) -> Self {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("hosts");
        fs::write(&path, content).unwrap();
        Self { temp_dir, path }
    }

    /// Root of the temporary directory.
    pub fn dir(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Path of the hosts file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write an additional file into the temp directory and return its path.
    pub fn write_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    pub fn read(&self) -> String {
        fs::read_to_string(&self.path).unwrap()
    }

    pub fn overwrite(&self, content: &str) {
        fs::write(&self.path, content).unwrap();
    }

    /// File names of `hosts.<digits>` backups, sorted by name.
    pub fn backups(&self) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(self.dir())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|n| {
                n.strip_prefix("hosts.")
                    .is_some_and(|s| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()))
            })
            .collect();
        names.sort();
        names
    }

    /// Assert that the hosts file contains `needle`.
    ///
    /// # Panics
    /// Panics with the full file content when it does not.
    pub fn assert_contains(&self, needle: &str) {
        let content = self.read();
        assert!(
            content.contains(needle),
            "hosts file does not contain expected content.\nExpected: {}\nActual: {}",
            needle,
            content
        );
    }
}
