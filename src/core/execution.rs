//! # Test Execution Engine Module / 测试执行引擎模块
//!
//! This module walks a suite tree, runs every test's command one at a time
//! and reports the run to a [`Reporter`] as a sequence of lifecycle events.
//!
//! 此模块遍历套件树，逐个运行每个测试的命令，
//! 并以生命周期事件序列的形式向 [`Reporter`] 报告运行情况。

use anyhow::{Context, Result};
use regex::Regex;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

use crate::core::events::{Reporter, RunnerEvent};
use crate::core::models::{
    FailureRecord, RunOutcome, RunStats, Suite, Test, TestError, TestState,
};
use crate::infra::command::{self, CommandStatus};

/// Options controlling how the engine runs tests.
/// 控制引擎如何运行测试的选项。
#[derive(Debug, Clone)]
pub struct RunnerOptions {
    /// Working directory for test commands.
    /// 测试命令的工作目录。
    pub cwd: PathBuf,
    /// Timeout applied to tests that do not declare their own.
    /// 应用于未声明自身超时的测试的超时时间。
    pub timeout: Option<Duration>,
    /// Stop running tests after the first failure.
    /// 在第一次失败后停止运行测试。
    pub bail: bool,
    /// Only tests whose full title matches are run and reported.
    /// 仅运行和报告完整标题匹配的测试。
    pub grep: Option<Regex>,
}

impl Default for RunnerOptions {
    fn default() -> Self {
        Self {
            cwd: PathBuf::from("."),
            timeout: None,
            bail: false,
            grep: None,
        }
    }
}

impl RunnerOptions {
    /// Compiles `pattern` into the grep filter.
    pub fn with_grep(mut self, pattern: &str) -> Result<Self> {
        let regex =
            Regex::new(pattern).with_context(|| format!("Invalid grep pattern: {pattern}"))?;
        self.grep = Some(regex);
        Ok(self)
    }
}

/// Runs one suite tree. The tree is updated in place with each test's
/// state, duration and error.
///
/// 运行一棵套件树。树中每个测试的状态、耗时和错误会被原地更新。
#[derive(Debug)]
pub struct Runner {
    root: Suite,
    options: RunnerOptions,
    stats: RunStats,
    failures: Vec<FailureRecord>,
    bailed: bool,
}

impl Runner {
    pub fn new(mut root: Suite, options: RunnerOptions) -> Self {
        if let Some(grep) = &options.grep {
            root.retain_tests(&|test: &Test| grep.is_match(&test.full_title));
        }
        Self {
            root,
            options,
            stats: RunStats::started_now(),
            failures: Vec::new(),
            bailed: false,
        }
    }

    /// The suite tree, with results of the tests that have run.
    pub fn suite(&self) -> &Suite {
        &self.root
    }

    /// Runs every test and emits the events to `reporter`.
    ///
    /// # Errors / 错误
    /// Only reporter errors abort the run; failing tests are recorded as data.
    /// 只有报告器错误会中止运行；失败的测试被记录为数据。
    pub async fn run(&mut self, reporter: &mut dyn Reporter) -> Result<RunOutcome> {
        self.stats = RunStats::started_now();
        self.failures.clear();
        self.bailed = false;

        let mut root = std::mem::replace(&mut self.root, Suite::root());
        let walked = self.run_suite(&mut root, reporter).await;
        self.root = root;
        walked?;

        self.stats.finish();
        reporter.on_event(&RunnerEvent::RunEnd {
            root: &self.root,
            stats: &self.stats,
        })?;

        Ok(RunOutcome {
            stats: self.stats.clone(),
            failures: self.failures.clone(),
            markdown: reporter.document().map(str::to_owned),
        })
    }

    async fn run_suite(&mut self, suite: &mut Suite, reporter: &mut dyn Reporter) -> Result<()> {
        if !suite.is_root() {
            self.stats.suites += 1;
        }
        debug!(suite = %suite.full_title, "suite begin");
        reporter.on_event(&RunnerEvent::SuiteBegin(suite))?;

        for test in suite.tests.iter_mut() {
            if self.bailed {
                break;
            }
            self.run_test(test).await;
            self.stats.record(test);
            let event = match (&test.state, &test.error) {
                (Some(TestState::Failed), Some(error)) => {
                    self.failures.push(FailureRecord {
                        full_title: test.full_title.clone(),
                        error: error.clone(),
                    });
                    if self.options.bail {
                        self.bailed = true;
                    }
                    RunnerEvent::TestFail(test, error)
                }
                (Some(TestState::Passed), _) => RunnerEvent::TestPass(test),
                _ => RunnerEvent::TestPending(test),
            };
            reporter.on_event(&event)?;
        }

        for child in suite.suites.iter_mut() {
            if self.bailed {
                break;
            }
            Box::pin(self.run_suite(child, reporter)).await?;
        }

        debug!(suite = %suite.full_title, "suite end");
        reporter.on_event(&RunnerEvent::SuiteEnd(suite))
    }

    /// Runs a single test and stores its result on it.
    async fn run_test(&self, test: &mut Test) {
        if test.pending {
            test.state = Some(TestState::Pending);
            return;
        }

        let timeout = test.timeout.or(self.options.timeout);
        debug!(test = %test.full_title, "test begin");

        match command::run_command(&test.body, &self.options.cwd, timeout).await {
            Ok(outcome) => {
                let elapsed = millis(outcome.elapsed);
                match outcome.status {
                    CommandStatus::Exited(status) if status.success() => {
                        test.state = Some(TestState::Passed);
                        test.duration = Some(elapsed);
                        test.error = None;
                    }
                    CommandStatus::Exited(status) => {
                        test.state = Some(TestState::Failed);
                        test.duration = Some(elapsed);
                        test.error = Some(TestError::new(
                            format!("Command exited with {status}"),
                            outcome.output,
                        ));
                    }
                    CommandStatus::TimedOut(limit) => {
                        test.state = Some(TestState::Failed);
                        test.duration = Some(elapsed);
                        test.error = Some(TestError::new(
                            format!("Timeout of {}ms exceeded", millis(limit)),
                            outcome.output,
                        ));
                    }
                }
            }
            Err(e) => {
                test.state = Some(TestState::Failed);
                test.duration = Some(0);
                test.error = Some(TestError::new(format!("{e:#}"), String::new()));
            }
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
