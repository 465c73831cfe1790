// Shared test helpers for integration tests
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use suite2md::config::{Configuration, TocStyle};
use suite2md::models::{Suite, Test, TestError};
use tempfile::{TempDir, tempdir};

/// A test file with one passing, one failing and one pending test.
pub const MIXED_SUITE: &str = r#"
lang = "sh"

[[suite]]
title = "Shell"

[[suite.test]]
title = "true succeeds"
run = "true"

[[suite.test]]
title = "false fails"
run = "false"

[[suite.suite]]
title = "Nested"

[[suite.suite.test]]
title = "is not written yet"
"#;

/// A test file whose tests all pass.
pub const PASSING_SUITE: &str = r#"
[[suite]]
title = "Echo"

[[suite.test]]
title = "prints hello"
run = "echo hello"

[[suite.test]]
title = "exits cleanly"
run = "true"
"#;

/// Creates a temporary directory holding the given test files.
pub fn setup_test_dir(files: &[(&str, &str)]) -> TempDir {
    let temp_dir = tempdir().expect("Failed to create temporary directory");
    for (name, content) in files {
        write_file(temp_dir.path(), name, content);
    }
    temp_dir
}

pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("Failed to write test file");
    path
}

/// A configuration that never prints or writes.
pub fn quiet_config(toc: TocStyle) -> Configuration {
    Configuration {
        quiet: true,
        toc,
        ..Configuration::default()
    }
}

/// `A` with a passing test, containing `B` with a failing one.
pub fn nested_tree() -> Suite {
    Suite::root().with_suite("A", |a| {
        a.add_test(Test::new("t1", "true").passed(50));
        a.add_suite("B").add_test(
            Test::new("t2", "false")
                .failed(1500, TestError::new("Command exited with exit status: 1", "")),
        );
    })
}
