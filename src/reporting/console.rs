//! # Console Reporting Module / 控制台报告模块
//!
//! This module prints test progress and summaries to the console.
//! [`SpecReporter`] writes an indented, colored line per suite and test as
//! the run progresses; [`write_epilogue`] prints the final counts and the
//! details of every failure.
//!
//! 此模块将测试进度和摘要打印到控制台。
//! [`SpecReporter`] 在运行过程中为每个套件和测试输出一行带缩进和颜色的信息；
//! [`write_epilogue`] 打印最终计数以及每个失败的详细信息。

use anyhow::Result;
use colored::*;
use std::io::{self, Stdout, Write};

use crate::core::events::{Reporter, RunnerEvent};
use crate::core::models::{FailureRecord, RunStats};
use crate::infra::t;
use crate::reporting::format::{format_duration, symbols};

/// Tests slower than this are shown with their duration.
/// 慢于此值的测试会显示其耗时。
pub const SLOW_MS: u64 = 75;

/// A mocha "spec"-style console reporter.
/// mocha "spec" 风格的控制台报告器。
#[derive(Debug)]
pub struct SpecReporter<W: Write = Stdout> {
    out: W,
    indent: usize,
    failures: Vec<FailureRecord>,
    locale: String,
}

impl SpecReporter<Stdout> {
    pub fn new(locale: &str) -> Self {
        Self::with_writer(io::stdout(), locale)
    }
}

impl<W: Write> SpecReporter<W> {
    pub fn with_writer(out: W, locale: &str) -> Self {
        Self {
            out,
            indent: 0,
            failures: Vec::new(),
            locale: locale.to_string(),
        }
    }

    pub fn into_writer(self) -> W {
        self.out
    }

    /// Leading spaces for the current nesting depth; top-level suites are
    /// indented once.
    fn pad(&self) -> String {
        "  ".repeat(self.indent.saturating_sub(1))
    }
}

impl<W: Write> Reporter for SpecReporter<W> {
    fn on_event(&mut self, event: &RunnerEvent<'_>) -> Result<()> {
        let pad = self.pad();
        match *event {
            RunnerEvent::SuiteBegin(suite) => {
                self.indent += 1;
                if !suite.is_root() {
                    let pad = self.pad();
                    writeln!(self.out, "{pad}{}", suite.title)?;
                }
            }
            RunnerEvent::SuiteEnd(_) => {
                self.indent = self.indent.saturating_sub(1);
                if self.indent == 1 {
                    writeln!(self.out)?;
                }
            }
            RunnerEvent::TestPass(test) => {
                let timing = match test.duration {
                    Some(ms) if ms > SLOW_MS => format!(" ({})", format_duration(ms)).yellow(),
                    _ => "".normal(),
                };
                writeln!(
                    self.out,
                    "{pad}  {} {}{}",
                    symbols::OK.green(),
                    test.title.dimmed(),
                    timing
                )?;
            }
            RunnerEvent::TestFail(test, error) => {
                self.failures.push(FailureRecord {
                    full_title: test.full_title.clone(),
                    error: error.clone(),
                });
                let line = format!("{}) {}", self.failures.len(), test.title);
                writeln!(self.out, "{pad}  {}", line.red())?;
            }
            RunnerEvent::TestPending(test) => {
                writeln!(self.out, "{pad}  {}", format!("- {}", test.title).cyan())?;
            }
            RunnerEvent::RunEnd { stats, .. } => {
                write_epilogue(&mut self.out, stats, &self.failures, &self.locale)?;
            }
        }
        Ok(())
    }
}

/// Writes the run summary: passing, failing and pending counts, followed by
/// the output of every failed test.
///
/// # Output Format / 输出格式
/// ```text
///   3 passing (120ms)
///   1 failing
///   1 pending
///
///   1) Greeting says hello:
///      Command exited with exit status: 1
///      <captured output>
/// ```
///
/// 写入运行摘要：通过、失败和待定的计数，然后是每个失败测试的输出。
pub fn write_epilogue(
    out: &mut dyn Write,
    stats: &RunStats,
    failures: &[FailureRecord],
    locale: &str,
) -> io::Result<()> {
    writeln!(out)?;
    writeln!(
        out,
        "  {} {}",
        t!("console.passing", locale = locale, count = stats.passes).green(),
        format!("({})", format_duration(stats.duration_ms)).dimmed()
    )?;
    if stats.failures > 0 {
        writeln!(
            out,
            "  {}",
            t!("console.failing", locale = locale, count = stats.failures).red()
        )?;
    }
    if stats.pending > 0 {
        writeln!(
            out,
            "  {}",
            t!("console.pending", locale = locale, count = stats.pending).cyan()
        )?;
    }
    writeln!(out)?;

    for (i, failure) in failures.iter().enumerate() {
        writeln!(out, "  {}) {}:", i + 1, failure.full_title)?;
        writeln!(out, "     {}", failure.error.message.red())?;
        for line in failure.error.output.lines() {
            writeln!(out, "     {}", line.dimmed())?;
        }
        writeln!(out)?;
    }
    Ok(())
}
