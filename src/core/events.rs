//! # Lifecycle Events Module / 生命周期事件模块
//!
//! The engine reports a run as a sequence of [`RunnerEvent`]s. Every listener
//! implements [`Reporter`] and receives the events synchronously, in order.
//!
//! 引擎将一次运行报告为一系列 [`RunnerEvent`]。每个监听器都实现
//! [`Reporter`]，并按顺序同步接收事件。

use anyhow::Result;

use crate::core::models::{RunStats, Suite, Test, TestError, TestState};

/// A lifecycle event of a test run.
/// 测试运行的生命周期事件。
#[derive(Debug, Clone, Copy)]
pub enum RunnerEvent<'a> {
    /// A suite is about to run. Emitted for the root suite too.
    SuiteBegin(&'a Suite),
    /// A suite and all of its descendants have finished.
    SuiteEnd(&'a Suite),
    TestPass(&'a Test),
    TestFail(&'a Test, &'a TestError),
    TestPending(&'a Test),
    /// Emitted exactly once, after the root suite has ended.
    RunEnd {
        root: &'a Suite,
        stats: &'a RunStats,
    },
}

/// A listener bound to one run.
/// 绑定到一次运行的监听器。
pub trait Reporter {
    /// Handles one event. Returning an error aborts the run.
    /// 处理一个事件。返回错误将中止运行。
    fn on_event(&mut self, event: &RunnerEvent<'_>) -> Result<()>;

    /// The finished document, for reporters that produce one.
    /// 已完成的文档（对于会生成文档的报告器）。
    fn document(&self) -> Option<&str> {
        None
    }
}

/// Drives `reporter` from a suite tree whose tests already carry their
/// results, emitting the same event sequence a live run would.
/// Tests that never reached a state are not reported.
///
/// 从测试已经带有结果的套件树驱动 `reporter`，
/// 发出与实时运行相同的事件序列。未达到任何状态的测试不会被报告。
pub fn replay(root: &Suite, stats: &RunStats, reporter: &mut dyn Reporter) -> Result<()> {
    replay_suite(root, reporter)?;
    reporter.on_event(&RunnerEvent::RunEnd { root, stats })
}

fn replay_suite(suite: &Suite, reporter: &mut dyn Reporter) -> Result<()> {
    reporter.on_event(&RunnerEvent::SuiteBegin(suite))?;
    for test in &suite.tests {
        if let Some(event) = test_event(test) {
            reporter.on_event(&event)?;
        }
    }
    for child in &suite.suites {
        replay_suite(child, reporter)?;
    }
    reporter.on_event(&RunnerEvent::SuiteEnd(suite))
}

/// The event announcing `test`'s result, if it has one.
/// 宣布 `test` 结果的事件（如果有结果）。
pub fn test_event(test: &Test) -> Option<RunnerEvent<'_>> {
    match (&test.state, &test.error) {
        (Some(TestState::Failed), Some(error)) => Some(RunnerEvent::TestFail(test, error)),
        (Some(TestState::Passed), _) => Some(RunnerEvent::TestPass(test)),
        (Some(TestState::Pending), _) => Some(RunnerEvent::TestPending(test)),
        _ if test.pending => Some(RunnerEvent::TestPending(test)),
        _ => None,
    }
}
