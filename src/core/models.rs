//! # Data Models Module / 数据模型模块
//!
//! This module defines the core data structures used throughout suite2md:
//! the suite tree, test records, run statistics and the outcome of a run.
//!
//! 此模块定义了整个 suite2md 中使用的核心数据结构：
//! 套件树、测试记录、运行统计和运行结果。

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// The final state of a test after the engine has processed it.
/// 测试在引擎处理之后的最终状态。
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestState {
    /// The test body ran and succeeded.
    /// 测试主体运行并成功。
    Passed,
    /// The test body ran and failed, timed out or could not be started.
    /// 测试主体运行失败、超时或无法启动。
    Failed,
    /// The test was declared without a body or explicitly marked pending.
    /// 测试在声明时没有主体或被显式标记为待定。
    Pending,
}

/// The error object attached to a failed test.
/// 附加到失败测试上的错误对象。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestError {
    /// A one-line description of why the test failed.
    /// 测试失败原因的单行描述。
    pub message: String,
    /// Captured stdout and stderr of the test command, if any.
    /// 测试命令捕获的 stdout 和 stderr（如果有）。
    #[serde(default)]
    pub output: String,
}

impl TestError {
    pub fn new(message: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            output: output.into(),
        }
    }
}

impl fmt::Display for TestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for TestError {}

/// A single test. The definition fields come from a test file; `state`,
/// `duration` and `error` are filled in by the engine.
///
/// 单个测试。定义字段来自测试文件；`state`、`duration` 和 `error`
/// 由引擎填写。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Test {
    pub title: String,
    /// Titles of all non-root ancestors and this test, joined by spaces.
    /// 所有非根祖先和此测试的标题，以空格连接。
    pub full_title: String,
    /// The source text of the test. For command tests this is the command line.
    /// 测试的源文本。对于命令测试，这是命令行。
    pub body: String,
    /// Info string used for the fenced code block that renders `body`.
    /// 渲染 `body` 的围栏代码块所使用的信息字符串。
    pub language: String,
    pub pending: bool,
    pub timeout: Option<Duration>,
    pub state: Option<TestState>,
    /// Wall-clock duration in milliseconds.
    /// 以毫秒为单位的实际耗时。
    pub duration: Option<u64>,
    pub error: Option<TestError>,
}

impl Test {
    /// Creates a runnable test with the given command body.
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        let title = title.into();
        Self {
            full_title: title.clone(),
            title,
            body: body.into(),
            language: "sh".to_string(),
            pending: false,
            timeout: None,
            state: None,
            duration: None,
            error: None,
        }
    }

    /// Creates a test that will be reported as pending without being run.
    pub fn pending(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            pending: true,
            ..Self::new(title, body)
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Marks the test as passed after `duration_ms` milliseconds.
    pub fn passed(mut self, duration_ms: u64) -> Self {
        self.state = Some(TestState::Passed);
        self.duration = Some(duration_ms);
        self.error = None;
        self
    }

    /// Marks the test as failed after `duration_ms` milliseconds.
    pub fn failed(mut self, duration_ms: u64, error: TestError) -> Self {
        self.state = Some(TestState::Failed);
        self.duration = Some(duration_ms);
        self.error = Some(error);
        self
    }

    pub fn is_passed(&self) -> bool {
        self.state == Some(TestState::Passed)
    }

    pub fn is_failed(&self) -> bool {
        self.state == Some(TestState::Failed)
    }
}

/// A named group of tests and child suites. The root suite has an empty
/// title and holds every top-level suite and test of a run.
///
/// 测试和子套件的命名分组。根套件标题为空，
/// 包含一次运行中所有顶层套件和测试。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suite {
    pub title: String,
    pub full_title: String,
    root: bool,
    pub tests: Vec<Test>,
    pub suites: Vec<Suite>,
}

impl Suite {
    /// Creates an empty root suite.
    /// 创建一个空的根套件。
    pub fn root() -> Self {
        Self {
            title: String::new(),
            full_title: String::new(),
            root: true,
            tests: Vec::new(),
            suites: Vec::new(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.root
    }

    /// Appends a child suite and returns it for further population.
    /// Its full title is derived from this suite's full title.
    ///
    /// 追加一个子套件并返回它以便继续填充。
    /// 它的完整标题由此套件的完整标题派生。
    pub fn add_suite(&mut self, title: impl Into<String>) -> &mut Suite {
        let title = title.into();
        let full_title = join_title(&self.full_title, &title);
        self.suites.push(Suite {
            title,
            full_title,
            root: false,
            tests: Vec::new(),
            suites: Vec::new(),
        });
        let last = self.suites.len() - 1;
        &mut self.suites[last]
    }

    /// Appends a test, rewriting its full title to include this suite.
    /// 追加一个测试，并重写其完整标题以包含此套件。
    pub fn add_test(&mut self, mut test: Test) -> &mut Test {
        test.full_title = join_title(&self.full_title, &test.title);
        self.tests.push(test);
        let last = self.tests.len() - 1;
        &mut self.tests[last]
    }

    /// Builder-style variant of [`Suite::add_suite`] for assembling trees in place.
    pub fn with_suite(mut self, title: impl Into<String>, build: impl FnOnce(&mut Suite)) -> Self {
        build(self.add_suite(title));
        self
    }

    /// Builder-style variant of [`Suite::add_test`].
    pub fn with_test(mut self, test: Test) -> Self {
        self.add_test(test);
        self
    }

    /// Number of tests in this suite and all of its descendants.
    /// 此套件及其所有后代中的测试数量。
    pub fn total_tests(&self) -> usize {
        self.tests.len() + self.suites.iter().map(Suite::total_tests).sum::<usize>()
    }

    /// Number of non-root suites in this subtree, including `self` unless it is the root.
    pub fn total_suites(&self) -> usize {
        let own = usize::from(!self.root);
        own + self.suites.iter().map(Suite::total_suites).sum::<usize>()
    }

    /// Keeps only the tests for which `keep` returns true and drops every
    /// non-root suite whose subtree ends up without tests.
    ///
    /// 仅保留 `keep` 返回 true 的测试，并删除子树中没有剩余测试的所有非根套件。
    pub fn retain_tests(&mut self, keep: &dyn Fn(&Test) -> bool) {
        self.tests.retain(|test| keep(test));
        for suite in &mut self.suites {
            suite.retain_tests(keep);
        }
        self.suites.retain(|suite| suite.total_tests() > 0);
    }
}

fn join_title(parent: &str, title: &str) -> String {
    if parent.is_empty() {
        title.to_string()
    } else {
        format!("{parent} {title}")
    }
}

/// Statistics collected over one run.
/// 一次运行中收集的统计信息。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunStats {
    pub suites: usize,
    pub tests: usize,
    pub passes: usize,
    pub failures: usize,
    pub pending: usize,
    pub start: DateTime<Local>,
    pub end: Option<DateTime<Local>>,
    pub duration_ms: u64,
}

impl RunStats {
    pub fn started_now() -> Self {
        Self {
            suites: 0,
            tests: 0,
            passes: 0,
            failures: 0,
            pending: 0,
            start: Local::now(),
            end: None,
            duration_ms: 0,
        }
    }

    /// Stamps the end time and derives the total duration from the start time.
    pub fn finish(&mut self) {
        let end = Local::now();
        self.duration_ms = u64::try_from((end - self.start).num_milliseconds()).unwrap_or(0);
        self.end = Some(end);
    }

    /// Counts a test that reached a final state.
    pub fn record(&mut self, test: &Test) {
        self.tests += 1;
        match test.state {
            Some(TestState::Passed) => self.passes += 1,
            Some(TestState::Failed) => self.failures += 1,
            Some(TestState::Pending) | None => self.pending += 1,
        }
    }

    pub fn has_failures(&self) -> bool {
        self.failures > 0
    }
}

/// A failed test as remembered for the run epilogue.
/// 为运行尾声记录的失败测试。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureRecord {
    pub full_title: String,
    pub error: TestError,
}

/// What a run hands back to its caller.
/// 一次运行返回给调用者的内容。
#[derive(Debug, Clone, Serialize)]
pub struct RunOutcome {
    pub stats: RunStats,
    pub failures: Vec<FailureRecord>,
    /// The document produced by the reporter, if it produces one.
    /// 报告器生成的文档（如果有）。
    pub markdown: Option<String>,
}

impl RunOutcome {
    /// Process exit code for the run: 0 without failures, 1 otherwise.
    pub fn exit_code(&self) -> u8 {
        u8::from(self.stats.has_failures())
    }
}
