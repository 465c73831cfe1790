//! # Test File Loader Module / 测试文件加载模块
//!
//! Test files declare suites and tests in TOML or JSON. All loaded files are
//! merged into a single root suite in the order they are given.
//!
//! 测试文件以 TOML 或 JSON 声明套件和测试。所有加载的文件按给定顺序合并到单个根套件中。
//!
//! ```toml
//! lang = "sh"
//!
//! [[suite]]
//! title = "Greeting"
//!
//! [[suite.test]]
//! title = "says hello"
//! run = "echo hello"
//!
//! [[suite.suite]]
//! title = "Farewell"
//!
//! [[suite.suite.test]]
//! title = "not written yet"
//! ```

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::core::models::{Suite, Test};

/// One test as declared in a test file.
/// 测试文件中声明的单个测试。
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TestDef {
    pub title: String,
    /// The command line to execute. A test without one is pending.
    /// 要执行的命令行。没有命令的测试为待定状态。
    #[serde(default)]
    pub run: Option<String>,
    #[serde(default)]
    pub pending: bool,
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

/// One suite as declared in a test file.
/// 测试文件中声明的单个套件。
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SuiteDef {
    pub title: String,
    #[serde(default, rename = "test")]
    pub tests: Vec<TestDef>,
    #[serde(default, rename = "suite")]
    pub suites: Vec<SuiteDef>,
}

/// The top level of a test file.
/// 测试文件的顶层结构。
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TestFile {
    /// Fence language for test bodies in this file.
    /// 此文件中测试主体的围栏语言。
    #[serde(default = "default_lang")]
    pub lang: String,
    #[serde(default, rename = "test")]
    pub tests: Vec<TestDef>,
    #[serde(default, rename = "suite")]
    pub suites: Vec<SuiteDef>,
}

fn default_lang() -> String {
    "sh".to_string()
}

impl TestFile {
    /// Parses a test file, choosing the format by extension (`.toml` or `.json`).
    /// 解析测试文件，根据扩展名（`.toml` 或 `.json`）选择格式。
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read test file: {}", path.display()))?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => toml::from_str(&content)
                .with_context(|| format!("Failed to parse test file: {}", path.display())),
            Some("json") => serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse test file: {}", path.display())),
            _ => bail!("Unsupported test file format: {}", path.display()),
        }
    }

    /// Adds this file's suites and tests to `root`.
    /// 将此文件的套件和测试添加到 `root`。
    pub fn register(&self, root: &mut Suite) {
        for test in &self.tests {
            root.add_test(to_test(test, &self.lang));
        }
        for suite in &self.suites {
            register_suite(suite, root, &self.lang);
        }
    }
}

fn register_suite(def: &SuiteDef, parent: &mut Suite, lang: &str) {
    let suite = parent.add_suite(def.title.clone());
    for test in &def.tests {
        suite.add_test(to_test(test, lang));
    }
    for child in &def.suites {
        register_suite(child, suite, lang);
    }
}

fn to_test(def: &TestDef, lang: &str) -> Test {
    let timeout = def.timeout_ms.map(Duration::from_millis);
    let test = match &def.run {
        Some(command) if !def.pending => Test::new(def.title.clone(), command.clone()),
        Some(command) => Test::pending(def.title.clone(), command.clone()),
        None => Test::pending(def.title.clone(), String::new()),
    };
    test.with_language(lang).with_timeout(timeout)
}

/// Loads every file in `paths` and merges them into one root suite.
/// 加载 `paths` 中的每个文件并将它们合并为一个根套件。
pub fn load_suite<P: AsRef<Path>>(paths: &[P]) -> Result<Suite> {
    let mut root = Suite::root();
    for path in paths {
        TestFile::load(path.as_ref())?.register(&mut root);
    }
    Ok(root)
}
