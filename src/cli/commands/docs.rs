//! # Docs Command Module / 文档命令模块
//!
//! Runs the test files with a documentation preset: a quiet run whose
//! Markdown lands in `tests.md` with Jekyll front matter and a kramdown TOC.
//!
//! 使用文档预设运行测试文件：一次安静的运行，
//! 其 Markdown 写入带有 Jekyll front matter 和 kramdown 目录的 `tests.md`。

use anyhow::Result;
use colored::*;

use crate::{
    cli::RunArgs,
    core::config::{self, OptionValue, ProcessEnv, ProjectConfig, ReporterOptions},
    infra::t,
    reporting::MarkdownReporter,
};

use super::run::{explicit_options, prepare_runner, print_epilogue, select_locale};

/// Front matter placed before the generated document.
/// 放在生成文档之前的 front matter。
pub const FRONT_MATTER: &str = "---\nlayout: default\ntitle: Test Results\nnav_order: 3\npermalink: /tests\n---\n";

/// The reporter options of a documentation run.
/// 文档运行的报告器选项。
pub fn preset() -> ReporterOptions {
    ReporterOptions {
        quiet: Some(OptionValue::Bool(true)),
        title: Some("Unit Test Results".to_string()),
        toc: Some("kramdown".to_string()),
        filename: Some("tests.md".to_string()),
        prepend: Some(FRONT_MATTER.to_string()),
        ..ReporterOptions::default()
    }
}

/// Executes the docs command and returns the process exit code.
/// 执行 docs 命令并返回进程退出码。
pub async fn execute(args: RunArgs) -> Result<u8> {
    let project = ProjectConfig::load_or_default(args.config.as_deref())?;
    let locale = select_locale(&args, &project);

    // config file < preset < -O pairs
    let base = ProjectConfig {
        reporter_options: project.reporter_options.clone().overlay(preset()),
        ..project.clone()
    };
    let explicit = explicit_options(&base, args.reporter_options.as_deref())?;
    let configuration = config::resolve(&explicit, &args.argv, &ProcessEnv);
    let target = configuration.output_path();

    let mut runner = prepare_runner(&args, &project, &locale)?;
    let mut markdown = MarkdownReporter::new(configuration);
    let outcome = runner.run(&mut markdown).await?;

    if let Some(target) = target {
        eprintln!(
            "{}",
            t!("docs.created", locale = locale, path = target.display()).green()
        );
    }
    print_epilogue(&outcome, &locale)?;

    Ok(outcome.exit_code())
}
