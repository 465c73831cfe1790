//! # Configuration Module / 配置模块
//!
//! Resolves the reporter [`Configuration`] from its sources. Precedence, from
//! strongest to weakest:
//!
//! 1. explicit call-site options ([`ReporterOptions`]),
//! 2. command-line flags, which only fill options left unset by (1),
//! 3. `MOCHA_*` environment variables,
//! 4. built-in defaults.
//!
//! Every source is an explicit argument of [`resolve`]; nothing here reads
//! global state.
//!
//! 从各个来源解析报告器 [`Configuration`]。优先级从强到弱：
//! 显式调用选项、命令行标志（仅填充未设置的选项）、`MOCHA_*` 环境变量、内置默认值。
//! 每个来源都是 [`resolve`] 的显式参数；这里不读取任何全局状态。

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::warn;

/// Prefix of the environment variables consulted by [`resolve`].
/// [`resolve`] 查询的环境变量的前缀。
pub const ENV_PREFIX: &str = "MOCHA_";

pub const DEFAULT_PATH: &str = "./docs/";
pub const DEFAULT_LEVEL: usize = 1;

/// How the document's table of contents is produced.
/// 文档目录的生成方式。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TocStyle {
    /// No table of contents; suite headings are marked `{:.no_toc}`.
    None,
    /// A kramdown `{:toc}` directive, expanded by the Markdown processor.
    Kramdown,
    /// A bullet list of anchor links generated from the suite tree.
    #[default]
    Default,
}

impl FromStr for TocStyle {
    type Err = std::convert::Infallible;

    /// Unrecognized styles select [`TocStyle::Default`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "none" => TocStyle::None,
            "kramdown" => TocStyle::Kramdown,
            "default" => TocStyle::Default,
            other => {
                warn!(toc = other, "unknown toc style, using default");
                TocStyle::Default
            }
        })
    }
}

impl fmt::Display for TocStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TocStyle::None => "none",
            TocStyle::Kramdown => "kramdown",
            TocStyle::Default => "default",
        })
    }
}

/// A loosely typed option value as it arrives from a config file or a
/// `key=value` list: native booleans and integers, or text.
///
/// 从配置文件或 `key=value` 列表传入的弱类型选项值：原生布尔值和整数，或文本。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl OptionValue {
    /// Booleans pass through; only the text `"true"` is true.
    /// 布尔值原样传递；只有文本 `"true"` 为真。
    pub fn as_bool(&self) -> bool {
        match self {
            OptionValue::Bool(b) => *b,
            OptionValue::Int(n) => *n != 0,
            OptionValue::Text(s) => s == "true",
        }
    }

    pub fn as_text(&self) -> String {
        match self {
            OptionValue::Bool(b) => b.to_string(),
            OptionValue::Int(n) => n.to_string(),
            OptionValue::Text(s) => s.clone(),
        }
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        OptionValue::Bool(value)
    }
}

impl From<i64> for OptionValue {
    fn from(value: i64) -> Self {
        OptionValue::Int(value)
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        OptionValue::Text(value.to_string())
    }
}

/// Explicit call-site options. Every field is optional; unset fields fall
/// through to the lower precedence tiers.
///
/// 显式调用选项。每个字段都是可选的；未设置的字段会回退到较低优先级的层级。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReporterOptions {
    pub quiet: Option<OptionValue>,
    pub toc: Option<String>,
    pub path: Option<String>,
    pub filename: Option<String>,
    pub prepend: Option<String>,
    pub append: Option<String>,
    pub title: Option<String>,
    pub level: Option<OptionValue>,
}

impl ReporterOptions {
    /// Parses a `key=value,key=value` list, as given to `--reporter-options`.
    /// Values are kept as text. Unknown keys are skipped with a warning.
    ///
    /// 解析 `key=value,key=value` 列表（即传给 `--reporter-options` 的格式）。
    /// 值保留为文本。未知键会被跳过并发出警告。
    pub fn parse_pairs(input: &str) -> Result<Self> {
        let mut options = Self::default();
        for pair in input.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let Some((key, value)) = pair.split_once('=') else {
                bail!("Invalid reporter option '{pair}', expected key=value");
            };
            let value = value.to_string();
            match key.trim() {
                "quiet" => options.quiet = Some(OptionValue::Text(value)),
                "toc" => options.toc = Some(value),
                "path" => options.path = Some(value),
                "filename" => options.filename = Some(value),
                "prepend" => options.prepend = Some(value),
                "append" => options.append = Some(value),
                "title" => options.title = Some(value),
                "level" => options.level = Some(OptionValue::Text(value)),
                unknown => warn!(option = unknown, "ignoring unknown reporter option"),
            }
        }
        Ok(options)
    }

    /// Returns `self` with every option set in `other` replaced by `other`'s value.
    /// 返回 `self`，其中 `other` 中设置的每个选项都被替换为 `other` 的值。
    pub fn overlay(mut self, other: ReporterOptions) -> Self {
        macro_rules! take {
            ($($field:ident),*) => {
                $(if other.$field.is_some() { self.$field = other.$field; })*
            };
        }
        take!(quiet, toc, path, filename, prepend, append, title, level);
        self
    }

    /// Fills options that are still unset from command-line flags.
    ///
    /// Recognized: `--report-path`/`-p`, `--quiet`, `--toc`, `--level`,
    /// `--title`/`-t`, `--append`/`-a`, `--prepend`/`-b`, in the
    /// `--flag value` and `--flag=value` forms; short flags also accept an
    /// attached value (`-tTitle`), as clap does.
    ///
    /// 用命令行标志填充仍未设置的选项。
    pub fn fill_from_args(mut self, argv: &[String]) -> Self {
        let mut i = 0;
        while i < argv.len() {
            let (flag, inline) = split_flag(&argv[i]);
            let takes_value = matches!(
                flag,
                "--report-path" | "-p" | "--toc" | "--level" | "--title" | "-t" | "--append"
                    | "-a" | "--prepend" | "-b"
            );
            let value = if takes_value {
                match inline {
                    Some(value) => Some(value),
                    None => {
                        i += 1;
                        argv.get(i).cloned()
                    }
                }
            } else {
                None
            };

            match (flag, value) {
                ("--report-path" | "-p", Some(value)) => {
                    let (dir, file) = split_report_path(&value);
                    self.filename.get_or_insert(file);
                    self.path.get_or_insert(dir);
                }
                ("--quiet", _) => {
                    self.quiet.get_or_insert(OptionValue::Bool(true));
                }
                ("--toc", Some(value)) => {
                    self.toc.get_or_insert(value);
                }
                ("--level", Some(value)) => {
                    self.level.get_or_insert(OptionValue::Text(value));
                }
                ("--title" | "-t", Some(value)) => {
                    self.title.get_or_insert(value);
                }
                ("--append" | "-a", Some(value)) => {
                    self.append.get_or_insert(value);
                }
                ("--prepend" | "-b", Some(value)) => {
                    self.prepend.get_or_insert(value);
                }
                _ => {}
            }
            i += 1;
        }
        self
    }
}

/// Short flags that take a value, which may be attached (`-tTitle`).
const VALUED_SHORTS: [&str; 4] = ["-p", "-t", "-a", "-b"];

/// Separates a flag from an inline value: `--flag=value`, `-t=value` and
/// the attached short form `-tvalue`.
///
/// 将标志与内联值分开：`--flag=value`、`-t=value` 以及附加的短格式 `-tvalue`。
fn split_flag(arg: &str) -> (&str, Option<String>) {
    if !arg.starts_with("--") {
        if let Some(short) = VALUED_SHORTS
            .iter()
            .find(|short| arg.len() > short.len() && arg.starts_with(*short))
        {
            let rest = &arg[short.len()..];
            let value = rest.strip_prefix('=').unwrap_or(rest);
            return (*short, Some(value.to_string()));
        }
    }
    match arg.split_once('=') {
        Some((flag, value)) if flag.starts_with('-') => (flag, Some(value.to_string())),
        _ => (arg, None),
    }
}

/// Splits `dir/sub/report.md` into `("dir/sub/", "report.md")`.
/// A path without `/` has an empty directory part.
///
/// 将 `dir/sub/report.md` 拆分为 `("dir/sub/", "report.md")`。
/// 不含 `/` 的路径的目录部分为空。
pub fn split_report_path(value: &str) -> (String, String) {
    match value.rsplit_once('/') {
        Some((dir, file)) => (format!("{dir}/"), file.to_string()),
        None => (String::new(), value.to_string()),
    }
}

/// Read access to environment variables.
/// 对环境变量的读取访问。
pub trait EnvSource {
    fn var(&self, key: &str) -> Option<String>;
}

/// The environment of the current process.
/// 当前进程的环境。
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// The resolved reporter configuration. Immutable once built.
/// 解析后的报告器配置。一旦构建就不可变。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Configuration {
    pub quiet: bool,
    pub toc: TocStyle,
    pub path: String,
    pub filename: Option<String>,
    pub prepend: Option<String>,
    pub append: Option<String>,
    pub title: Option<String>,
    /// Base heading level, always at least 1.
    /// 基础标题级别，至少为 1。
    pub level: usize,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            quiet: false,
            toc: TocStyle::Default,
            path: DEFAULT_PATH.to_string(),
            filename: None,
            prepend: None,
            append: None,
            title: None,
            level: DEFAULT_LEVEL,
        }
    }
}

impl Configuration {
    /// Location the document is persisted to, when a filename is configured.
    /// 配置了文件名时文档的持久化位置。
    pub fn output_path(&self) -> Option<PathBuf> {
        self.filename
            .as_ref()
            .map(|filename| Path::new(&self.path).join(filename))
    }
}

/// Merges all configuration tiers into one [`Configuration`]. Never fails.
///
/// # Arguments / 参数
/// * `explicit` - Call-site options / 调用选项
/// * `argv` - Command-line arguments scanned for reporter flags / 扫描报告器标志的命令行参数
/// * `env` - Environment variable source / 环境变量来源
pub fn resolve(explicit: &ReporterOptions, argv: &[String], env: &dyn EnvSource) -> Configuration {
    let call_site = explicit.clone().fill_from_args(argv);
    let lookup = Lookup { env };

    let level_text = lookup.text("level", call_site.level.as_ref().map(OptionValue::as_text));
    let level = match level_text {
        None => DEFAULT_LEVEL,
        Some(text) => match parse_leading_int(&text) {
            Some(n) => usize::try_from(n).unwrap_or(0).max(DEFAULT_LEVEL),
            None => {
                warn!(level = %text, "unparsable heading level, using {DEFAULT_LEVEL}");
                DEFAULT_LEVEL
            }
        },
    };

    Configuration {
        quiet: lookup.boolean("quiet", call_site.quiet.as_ref(), false),
        toc: lookup
            .text("toc", call_site.toc.clone())
            .map(|s| s.parse::<TocStyle>().unwrap_or_default())
            .unwrap_or_default(),
        path: lookup
            .text("path", call_site.path.clone())
            .unwrap_or_else(|| DEFAULT_PATH.to_string()),
        filename: non_empty(lookup.text("filename", call_site.filename.clone())),
        prepend: non_empty(lookup.text("prepend", call_site.prepend.clone())),
        append: non_empty(lookup.text("append", call_site.append.clone())),
        title: non_empty(lookup.text("title", call_site.title.clone())),
        level,
    }
}

/// Falls back from a call-site value to the `MOCHA_*` variable of the same option.
struct Lookup<'a> {
    env: &'a dyn EnvSource,
}

impl Lookup<'_> {
    fn env_var(&self, name: &str) -> Option<String> {
        self.env.var(&format!("{ENV_PREFIX}{}", name.to_uppercase()))
    }

    fn text(&self, name: &str, explicit: Option<String>) -> Option<String> {
        explicit.or_else(|| self.env_var(name))
    }

    fn boolean(&self, name: &str, explicit: Option<&OptionValue>, default: bool) -> bool {
        if let Some(value) = explicit {
            return value.as_bool();
        }
        match self.env_var(name) {
            Some(value) => value == "true",
            None => default,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

/// Parses an optionally signed integer prefix, ignoring leading whitespace
/// and anything after the digits. `"3rd"` is 3; `"abc"` is `None`.
///
/// 解析可带符号的整数前缀，忽略前导空白和数字之后的内容。
pub fn parse_leading_int(input: &str) -> Option<i64> {
    let trimmed = input.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    let value: i64 = digits.parse().ok()?;
    Some(if negative { -value } else { value })
}

/// Settings read from an optional `Suite2md.toml` file.
/// 从可选的 `Suite2md.toml` 文件读取的设置。
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ProjectConfig {
    /// The language for the runner's output messages (e.g., "en", "zh-CN").
    /// Unset means the system locale.
    /// 运行器输出消息的语言（例如 "en", "zh-CN"）。未设置时使用系统语言环境。
    #[serde(default)]
    pub language: Option<String>,
    /// Directory searched for test files.
    /// 搜索测试文件的目录。
    #[serde(default)]
    pub dir: Option<PathBuf>,
    /// Default per-test timeout in milliseconds.
    /// 默认的单个测试超时时间（毫秒）。
    #[serde(default)]
    pub timeout_ms: Option<u64>,
    #[serde(default)]
    pub bail: bool,
    #[serde(default)]
    pub reporter_options: ReporterOptions,
}

pub const DEFAULT_CONFIG_FILE: &str = "Suite2md.toml";

impl ProjectConfig {
    /// Loads the config file at `path`.
    /// 加载 `path` 处的配置文件。
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Loads `path` when given; otherwise loads [`DEFAULT_CONFIG_FILE`] if it
    /// exists in the current directory, or falls back to defaults.
    ///
    /// 如果给定 `path` 则加载它；否则如果当前目录存在 [`DEFAULT_CONFIG_FILE`] 则加载，
    /// 否则使用默认值。
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.is_file() {
                    Self::load(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}
