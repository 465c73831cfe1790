// src/cli.rs
use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::{env, path::PathBuf};

use crate::infra::t;

pub mod commands;

/// Pre-parses the command line arguments to find the language setting.
/// This allows i18n to be initialized before the full CLI is built.
/// It looks for a `--lang <VALUE>` or `--lang=<VALUE>` argument.
pub fn pre_parse_language(args: &[String]) -> Option<String> {
    args.iter().enumerate().find_map(|(pos, arg)| {
        if arg == "--lang" {
            args.get(pos + 1).cloned()
        } else {
            arg.strip_prefix("--lang=").map(str::to_string)
        }
    })
}

/// Arguments shared by every command that runs tests.
/// 所有运行测试的命令共享的参数。
fn run_args(command: Command, locale: &str) -> Command {
    command
        .arg(
            Arg::new("dir")
                .long("dir")
                .help(t!("arg.dir", locale = locale).to_string())
                .value_name("DIR")
                .value_parser(clap::value_parser!(PathBuf))
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help(t!("arg.config", locale = locale).to_string())
                .value_name("CONFIG")
                .value_parser(clap::value_parser!(PathBuf))
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("project-dir")
                .long("project-dir")
                .help(t!("arg.project_dir", locale = locale).to_string())
                .value_name("PROJECT_DIR")
                .default_value(".")
                .value_parser(clap::value_parser!(PathBuf))
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("reporter-options")
                .short('O')
                .long("reporter-options")
                .help(t!("arg.reporter_options", locale = locale).to_string())
                .value_name("KEY=VALUE,...")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("grep")
                .short('g')
                .long("grep")
                .help(t!("arg.grep", locale = locale).to_string())
                .value_name("PATTERN")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("bail")
                .long("bail")
                .help(t!("arg.bail", locale = locale).to_string())
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("timeout")
                .long("timeout")
                .help(t!("arg.timeout", locale = locale).to_string())
                .value_name("MS")
                .value_parser(clap::value_parser!(u64))
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("files")
                .help(t!("arg.files", locale = locale).to_string())
                .value_name("FILES")
                .num_args(0..)
                .action(ArgAction::Append),
        )
}

/// Reporter flags. Their values are resolved from the raw argument list by
/// [`crate::config::resolve`]; declaring them here lets clap accept and
/// document them.
///
/// 报告器标志。它们的值由 [`crate::config::resolve`] 从原始参数列表中解析；
/// 在这里声明是为了让 clap 接受并记录它们。
fn reporter_flags(command: Command, locale: &str) -> Command {
    let valued = [
        ("report-path", Some('p'), t!("arg.report_path", locale = locale), "FILE"),
        ("toc", None, t!("arg.toc", locale = locale), "STYLE"),
        ("level", None, t!("arg.level", locale = locale), "LEVEL"),
        ("title", Some('t'), t!("arg.title", locale = locale), "TITLE"),
        ("append", Some('a'), t!("arg.append", locale = locale), "TEXT"),
        ("prepend", Some('b'), t!("arg.prepend", locale = locale), "TEXT"),
    ];
    let command = valued
        .into_iter()
        .fold(command, |command, (name, short, help, value_name)| {
            let mut arg = Arg::new(name)
                .long(name)
                .help(help.to_string())
                .value_name(value_name)
                .action(ArgAction::Set);
            if let Some(short) = short {
                arg = arg.short(short);
            }
            command.arg(arg)
        });
    command.arg(
        Arg::new("quiet")
            .long("quiet")
            .help(t!("arg.quiet", locale = locale).to_string())
            .action(ArgAction::SetTrue),
    )
}

fn build_cli(locale: &str) -> Command {
    Command::new("suite2md")
        .version(env!("CARGO_PKG_VERSION"))
        .about(t!("cli.about", locale = locale).to_string())
        .arg(
            Arg::new("lang")
                .long("lang")
                .help(t!("cli.lang", locale = locale).to_string())
                .value_name("LANGUAGE")
                .global(true)
                .action(ArgAction::Set),
        )
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(reporter_flags(
            run_args(
                Command::new("run").about(t!("cmd.run_about", locale = locale).to_string()),
                locale,
            )
            .arg(
                Arg::new("reporter")
                    .short('R')
                    .long("reporter")
                    .help(t!("arg.reporter", locale = locale).to_string())
                    .value_name("REPORTER")
                    .value_parser(["markdown", "spec"])
                    .default_value("markdown")
                    .action(ArgAction::Set),
            ),
            locale,
        ))
        .subcommand(run_args(
            Command::new("docs").about(t!("cmd.docs_about", locale = locale).to_string()),
            locale,
        ))
}

/// Which listener receives the run's events.
/// 哪个监听器接收运行事件。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReporterKind {
    Markdown,
    Spec,
}

/// Values common to `run` and `docs`, taken from clap matches.
/// `run` 和 `docs` 共有的值，取自 clap 的匹配结果。
#[derive(Debug, Clone)]
pub struct RunArgs {
    pub dir: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub project_dir: PathBuf,
    pub reporter_options: Option<String>,
    pub grep: Option<String>,
    pub bail: bool,
    pub timeout_ms: Option<u64>,
    pub files: Vec<String>,
    /// The full process argument list, scanned for reporter flags.
    /// 完整的进程参数列表，用于扫描报告器标志。
    pub argv: Vec<String>,
    pub locale: String,
    pub lang_explicit: bool,
}

impl RunArgs {
    fn from_matches(
        matches: &ArgMatches,
        argv: &[String],
        locale: &str,
        lang_explicit: bool,
    ) -> Self {
        Self {
            dir: matches.get_one::<PathBuf>("dir").cloned(),
            config: matches.get_one::<PathBuf>("config").cloned(),
            project_dir: matches
                .get_one::<PathBuf>("project-dir")
                .cloned()
                .unwrap_or_else(|| PathBuf::from(".")),
            reporter_options: matches.get_one::<String>("reporter-options").cloned(),
            grep: matches.get_one::<String>("grep").cloned(),
            bail: matches.get_flag("bail"),
            timeout_ms: matches.get_one::<u64>("timeout").copied(),
            files: matches
                .get_many::<String>("files")
                .map(|files| files.cloned().collect())
                .unwrap_or_default(),
            argv: argv.to_vec(),
            locale: locale.to_string(),
            lang_explicit,
        }
    }
}

/// Parses the process arguments, runs the chosen command and returns the
/// process exit code: 0 when every test passed, 1 otherwise.
///
/// 解析进程参数，运行所选命令并返回进程退出码：所有测试通过时为 0，否则为 1。
pub async fn run() -> Result<u8> {
    let argv: Vec<String> = env::args().collect();

    // Pre-parse language and initialize i18n first.
    let explicit_lang = pre_parse_language(&argv);
    let language = match &explicit_lang {
        Some(lang) => crate::match_locale(lang),
        None => {
            crate::init();
            rust_i18n::locale().to_string()
        }
    };
    rust_i18n::set_locale(&language);

    let matches = build_cli(&language).get_matches_from(&argv);

    match matches.subcommand() {
        Some(("run", run_matches)) => {
            let args =
                RunArgs::from_matches(run_matches, &argv, &language, explicit_lang.is_some());
            let reporter = match run_matches.get_one::<String>("reporter").map(String::as_str) {
                Some("spec") => ReporterKind::Spec,
                _ => ReporterKind::Markdown,
            };
            commands::run::execute(args, reporter).await
        }
        Some(("docs", docs_matches)) => {
            let args =
                RunArgs::from_matches(docs_matches, &argv, &language, explicit_lang.is_some());
            commands::docs::execute(args).await
        }
        // `subcommand_required` makes clap exit before this point.
        _ => Ok(0),
    }
}
