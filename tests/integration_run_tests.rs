//! # Engine Integration Tests / 引擎集成测试
//!
//! Runs real commands through [`Runner`] and checks the recorded results,
//! the emitted event order and the document handed back in the outcome.
//!
//! 通过 [`Runner`] 运行真实命令，检查记录的结果、发出的事件顺序以及结果中返回的文档。

mod common;

use anyhow::Result;
use std::time::Duration;
use suite2md::config::TocStyle;
use suite2md::core::execution::{Runner, RunnerOptions};
use suite2md::core::loader::load_suite;
use suite2md::events::{Reporter, RunnerEvent};
use suite2md::models::{Suite, Test, TestState};
use suite2md::reporting::MarkdownReporter;
use tempfile::TempDir;

/// Records a compact trace of the events it receives.
#[derive(Default)]
struct Recorder {
    trace: Vec<String>,
}

impl Reporter for Recorder {
    fn on_event(&mut self, event: &RunnerEvent<'_>) -> Result<()> {
        let entry = match event {
            RunnerEvent::SuiteBegin(suite) => format!("begin:{}", suite.title),
            RunnerEvent::SuiteEnd(suite) => format!("end:{}", suite.title),
            RunnerEvent::TestPass(test) => format!("pass:{}", test.title),
            RunnerEvent::TestFail(test, _) => format!("fail:{}", test.title),
            RunnerEvent::TestPending(test) => format!("pending:{}", test.title),
            RunnerEvent::RunEnd { .. } => "run-end".to_string(),
        };
        self.trace.push(entry);
        Ok(())
    }
}

fn options_in(dir: &TempDir) -> RunnerOptions {
    RunnerOptions {
        cwd: dir.path().to_path_buf(),
        ..RunnerOptions::default()
    }
}

#[cfg(test)]
mod engine_tests {
    use super::*;

    #[tokio::test]
    async fn test_mixed_suite_results_and_event_order() {
        let dir = common::setup_test_dir(&[("mixed.toml", common::MIXED_SUITE)]);
        let root = load_suite(&[dir.path().join("mixed.toml")]).unwrap();
        let mut runner = Runner::new(root, options_in(&dir));
        let mut recorder = Recorder::default();

        let outcome = runner.run(&mut recorder).await.unwrap();

        assert_eq!(
            recorder.trace,
            [
                "begin:",
                "begin:Shell",
                "pass:true succeeds",
                "fail:false fails",
                "begin:Nested",
                "pending:is not written yet",
                "end:Nested",
                "end:Shell",
                "end:",
                "run-end",
            ]
        );
        assert_eq!(outcome.stats.suites, 2);
        assert_eq!(outcome.stats.tests, 3);
        assert_eq!(outcome.stats.passes, 1);
        assert_eq!(outcome.stats.failures, 1);
        assert_eq!(outcome.stats.pending, 1);
        assert!(outcome.stats.end.is_some());
        assert_eq!(outcome.exit_code(), 1);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].full_title, "Shell false fails");
        assert!(outcome.failures[0].error.message.starts_with("Command exited with"));
        assert!(outcome.markdown.is_none());

        let shell = &runner.suite().suites[0];
        assert_eq!(shell.tests[0].state, Some(TestState::Passed));
        assert!(shell.tests[0].duration.is_some());
        assert_eq!(shell.suites[0].tests[0].state, Some(TestState::Pending));
        assert_eq!(shell.suites[0].tests[0].duration, None);
    }

    #[tokio::test]
    async fn test_passing_run_exits_zero_and_exposes_markdown() {
        let dir = common::setup_test_dir(&[("pass.toml", common::PASSING_SUITE)]);
        let root = load_suite(&[dir.path().join("pass.toml")]).unwrap();
        let mut runner = Runner::new(root, options_in(&dir));
        let mut reporter =
            MarkdownReporter::with_writer(common::quiet_config(TocStyle::Default), Vec::new());

        let outcome = runner.run(&mut reporter).await.unwrap();

        assert_eq!(outcome.exit_code(), 0);
        let markdown = outcome.markdown.unwrap();
        assert!(markdown.starts_with("\n- [Echo](#echo)\n\n"));
        assert!(markdown.contains("<a name=\"echo\"></a>\n# Echo\n"));
        assert!(markdown.contains("```sh\necho hello\n```"));
    }

    #[tokio::test]
    async fn test_failure_output_is_captured() {
        let dir = common::setup_test_dir(&[]);
        let root = Suite::root().with_suite("Output", |s| {
            s.add_test(Test::new("complains", "sh -c 'echo broken >&2; exit 3'"));
        });
        let mut runner = Runner::new(root, options_in(&dir));
        let outcome = runner.run(&mut Recorder::default()).await.unwrap();

        let failure = &outcome.failures[0];
        assert!(failure.error.message.contains('3'));
        assert!(failure.error.output.contains("broken"));
    }

    #[tokio::test]
    async fn test_bail_stops_after_first_failure() {
        let dir = common::setup_test_dir(&[]);
        let root = Suite::root()
            .with_suite("First", |s| {
                s.add_test(Test::new("fails", "false"));
                s.add_test(Test::new("skipped by bail", "true"));
            })
            .with_suite("Second", |s| {
                s.add_test(Test::new("never runs", "true"));
            });
        let options = RunnerOptions {
            bail: true,
            ..options_in(&dir)
        };
        let mut runner = Runner::new(root, options);
        let mut recorder = Recorder::default();
        let outcome = runner.run(&mut recorder).await.unwrap();

        assert_eq!(outcome.stats.tests, 1);
        assert_eq!(outcome.stats.failures, 1);
        assert!(!recorder.trace.iter().any(|e| e.contains("never runs")));
        assert!(!recorder.trace.iter().any(|e| e.contains("skipped by bail")));
        assert_eq!(recorder.trace.last().map(String::as_str), Some("run-end"));
    }

    #[tokio::test]
    async fn test_bail_leaves_unreported_suites_out_of_the_toc() {
        let dir = common::setup_test_dir(&[]);
        let root = Suite::root()
            .with_suite("A", |s| {
                s.add_test(Test::new("fails", "false"));
            })
            .with_suite("B", |s| {
                s.add_test(Test::new("ok", "true"));
            });
        let options = RunnerOptions {
            bail: true,
            ..options_in(&dir)
        };
        let mut runner = Runner::new(root, options);
        let mut reporter =
            MarkdownReporter::with_writer(common::quiet_config(TocStyle::Default), Vec::new());

        let markdown = runner.run(&mut reporter).await.unwrap().markdown.unwrap();

        assert!(markdown.starts_with("\n- [A](#a)\n\n<a name=\"a\"></a>\n# A\n"));
        assert!(!markdown.contains("(#b)"));
        assert!(!markdown.contains("<a name=\"b\">"));
    }

    #[tokio::test]
    async fn test_grep_prunes_unmatched_tests_and_empty_suites() {
        let dir = common::setup_test_dir(&[]);
        let root = Suite::root()
            .with_suite("Parser", |s| {
                s.add_test(Test::new("reads numbers", "true"));
                s.add_test(Test::new("reads strings", "true"));
            })
            .with_suite("Writer", |s| {
                s.add_test(Test::new("writes numbers", "true"));
            });
        let options = options_in(&dir).with_grep("^Parser").unwrap();
        let mut runner = Runner::new(root, options);
        let outcome = runner.run(&mut Recorder::default()).await.unwrap();

        assert_eq!(outcome.stats.tests, 2);
        assert_eq!(runner.suite().suites.len(), 1);
        assert_eq!(runner.suite().suites[0].title, "Parser");
    }

    #[tokio::test]
    async fn test_invalid_grep_pattern_is_an_error() {
        assert!(RunnerOptions::default().with_grep("(unclosed").is_err());
    }

    #[tokio::test]
    async fn test_timeout_fails_the_test() {
        let dir = common::setup_test_dir(&[]);
        let root = Suite::root().with_suite("Slow", |s| {
            s.add_test(Test::new("sleeps", "sleep 5").with_timeout(Some(Duration::from_millis(100))));
        });
        let mut runner = Runner::new(root, options_in(&dir));
        let outcome = runner.run(&mut Recorder::default()).await.unwrap();

        assert_eq!(outcome.stats.failures, 1);
        assert_eq!(outcome.failures[0].error.message, "Timeout of 100ms exceeded");
    }

    #[tokio::test]
    async fn test_timeout_keeps_output_printed_before_the_kill() {
        let dir = common::setup_test_dir(&[]);
        let root = Suite::root().with_suite("Slow", |s| {
            s.add_test(
                Test::new("talks then hangs", "sh -c 'echo started; exec sleep 5'")
                    .with_timeout(Some(Duration::from_millis(500))),
            );
        });
        let mut runner = Runner::new(root, options_in(&dir));
        let outcome = runner.run(&mut Recorder::default()).await.unwrap();

        let failure = &outcome.failures[0];
        assert_eq!(failure.error.message, "Timeout of 500ms exceeded");
        assert!(failure.error.output.contains("started"));
    }

    #[tokio::test]
    async fn test_missing_program_is_a_test_failure() {
        let dir = common::setup_test_dir(&[]);
        let root = Suite::root().with_suite("Missing", |s| {
            s.add_test(Test::new("spawns nothing", "suite2md-no-such-program --flag"));
        });
        let mut runner = Runner::new(root, options_in(&dir));
        let outcome = runner.run(&mut Recorder::default()).await.unwrap();

        assert_eq!(outcome.exit_code(), 1);
        assert_eq!(runner.suite().suites[0].tests[0].duration, Some(0));
    }

    #[tokio::test]
    async fn test_commands_run_in_the_configured_directory() {
        let dir = common::setup_test_dir(&[("marker.txt", "here")]);
        let root = Suite::root().with_suite("Cwd", |s| {
            s.add_test(Test::new("finds marker", "test -f marker.txt"));
        });
        let mut runner = Runner::new(root, options_in(&dir));
        let outcome = runner.run(&mut Recorder::default()).await.unwrap();
        assert_eq!(outcome.stats.passes, 1);
    }
}
