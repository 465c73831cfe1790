//! # Run Command Module / 运行命令模块
//!
//! This module implements the `run` command of the suite2md CLI, which
//! discovers test files, runs them and reports through the chosen reporter.
//!
//! 此模块实现了 suite2md CLI 的 `run` 命令，
//! 它发现测试文件、运行它们并通过所选的报告器进行报告。

use anyhow::{Context, Result, bail};
use colored::*;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::{
    cli::{ReporterKind, RunArgs},
    core::{
        config::{self, ProcessEnv, ProjectConfig, ReporterOptions},
        execution::{Runner, RunnerOptions},
        loader,
        models::RunOutcome,
    },
    infra::{fs, t},
    reporting::{MarkdownReporter, SpecReporter, write_epilogue},
};

/// Directory searched for test files when neither the CLI nor the config file names one.
/// 当 CLI 和配置文件都未指定时搜索测试文件的目录。
pub const DEFAULT_TEST_DIR: &str = "./test/";

/// Executes the run command with the provided arguments.
///
/// # Arguments
/// * `args` - Arguments shared with the `docs` command
/// * `reporter` - Which reporter receives the events
///
/// # Returns
/// The process exit code: 0 when no test failed, 1 otherwise
pub async fn execute(args: RunArgs, reporter: ReporterKind) -> Result<u8> {
    let project = ProjectConfig::load_or_default(args.config.as_deref())?;
    let locale = select_locale(&args, &project);

    let explicit = explicit_options(&project, args.reporter_options.as_deref())?;
    let configuration = config::resolve(&explicit, &args.argv, &ProcessEnv);

    let mut runner = prepare_runner(&args, &project, &locale)?;

    let outcome = match reporter {
        ReporterKind::Markdown => {
            let mut markdown = MarkdownReporter::new(configuration);
            let outcome = runner.run(&mut markdown).await?;
            print_epilogue(&outcome, &locale)?;
            outcome
        }
        ReporterKind::Spec => {
            let mut spec = SpecReporter::new(&locale);
            runner.run(&mut spec).await?
        }
    };

    Ok(outcome.exit_code())
}

/// The locale for console messages: `--lang`, then the config file, then
/// the one already detected from the system.
///
/// 控制台消息的语言环境：`--lang`，其次是配置文件，最后是从系统检测到的语言环境。
pub(crate) fn select_locale(args: &RunArgs, project: &ProjectConfig) -> String {
    let locale = match (&project.language, args.lang_explicit) {
        (Some(language), false) => crate::match_locale(language),
        _ => args.locale.clone(),
    };
    rust_i18n::set_locale(&locale);
    locale
}

/// Config-file reporter options overlaid by the `--reporter-options` pairs.
/// 配置文件中的报告器选项，由 `--reporter-options` 键值对覆盖。
pub(crate) fn explicit_options(
    project: &ProjectConfig,
    pairs: Option<&str>,
) -> Result<ReporterOptions> {
    let from_cli = match pairs {
        Some(pairs) => ReporterOptions::parse_pairs(pairs)?,
        None => ReporterOptions::default(),
    };
    Ok(project.reporter_options.clone().overlay(from_cli))
}

/// Discovers and loads the test files, then builds the runner.
/// 发现并加载测试文件，然后构建运行器。
pub(crate) fn prepare_runner(
    args: &RunArgs,
    project: &ProjectConfig,
    locale: &str,
) -> Result<Runner> {
    let dir = args
        .dir
        .clone()
        .or_else(|| project.dir.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_TEST_DIR));

    let files = discover(&dir, &args.files, locale)?;
    let root = loader::load_suite(&files)?;

    let timeout_ms = args.timeout_ms.or(project.timeout_ms);
    let mut options = RunnerOptions {
        cwd: args.project_dir.clone(),
        timeout: timeout_ms.map(Duration::from_millis),
        bail: args.bail || project.bail,
        grep: None,
    };
    if let Some(pattern) = &args.grep {
        options = options.with_grep(pattern)?;
    }

    Ok(Runner::new(root, options))
}

fn discover(dir: &Path, selected: &[String], locale: &str) -> Result<Vec<PathBuf>> {
    if !fs::is_directory(dir) {
        bail!(
            "{}",
            t!("run.dir_not_found", locale = locale, dir = dir.display())
        );
    }

    if selected.is_empty() {
        eprintln!(
            "{}",
            t!("run.testing_dir", locale = locale, dir = dir.display()).cyan()
        );
    } else {
        let names: Vec<String> = selected
            .iter()
            .map(|name| dir.join(name).display().to_string())
            .collect();
        eprintln!(
            "{}",
            t!("run.selected_files", locale = locale, files = names.join(", ")).cyan()
        );
    }

    let files = fs::discover_test_files(dir, selected)
        .with_context(|| t!("run.discovery_failed", locale = locale).to_string())?;
    if files.is_empty() {
        eprintln!(
            "{}",
            t!("run.no_test_files", locale = locale, dir = dir.display()).yellow()
        );
    }
    Ok(files)
}

/// Prints the run summary to stderr so stdout carries only the document.
/// 将运行摘要打印到 stderr，使 stdout 只包含文档。
pub(crate) fn print_epilogue(outcome: &RunOutcome, locale: &str) -> Result<()> {
    let mut stderr = io::stderr();
    write_epilogue(&mut stderr, &outcome.stats, &outcome.failures, locale)?;
    Ok(())
}
