//! # Formatting Utilities / 格式化工具
//!
//! Small helpers shared by every reporter: status glyphs, slugs, durations,
//! headings and test body cleanup.
//!
//! 所有报告器共享的小工具：状态符号、slug、耗时、标题和测试主体清理。

use once_cell::sync::Lazy;
use regex::Regex;

/// Status glyphs for passed and failed tests.
/// 通过和失败测试的状态符号。
pub mod symbols {
    #[cfg(not(windows))]
    pub const OK: &str = "✓";
    #[cfg(not(windows))]
    pub const ERR: &str = "✖";

    #[cfg(windows)]
    pub const OK: &str = "\u{221A}";
    #[cfg(windows)]
    pub const ERR: &str = "\u{00D7}";
}

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static NON_SLUG: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^-A-Za-z0-9_]").unwrap());
static DASHES: Lazy<Regex> = Lazy::new(|| Regex::new(r"-{2,}").unwrap());

/// Turns a title into a URL-safe anchor name.
///
/// Lowercases, turns whitespace runs into `-`, drops everything except
/// ASCII letters, digits, `_` and `-`, then collapses repeated `-`.
///
/// 将标题转换为 URL 安全的锚点名称。
///
/// ```
/// assert_eq!(suite2md::reporting::format::slug("Array #indexOf()"), "array-indexof");
/// ```
pub fn slug(title: &str) -> String {
    let lower = title.to_lowercase();
    let hyphenated = WHITESPACE.replace_all(&lower, "-");
    let stripped = NON_SLUG.replace_all(&hyphenated, "");
    DASHES.replace_all(&stripped, "-").into_owned()
}

/// Formats a duration in milliseconds: `"<n>ms"` below one second,
/// otherwise seconds with as many decimals as needed (`1500` → `"1.5s"`).
///
/// 格式化以毫秒为单位的耗时：不足一秒时为 `"<n>ms"`，否则为秒。
pub fn format_duration(ms: u64) -> String {
    if ms < 1000 {
        format!("{ms}ms")
    } else {
        format!("{}s", ms as f64 / 1000.0)
    }
}

/// A Markdown heading of `level - 1` hashes; level 1 yields a bare title line.
/// `level - 1` 个井号的 Markdown 标题；级别 1 生成不带井号的标题行。
pub fn heading(title: &str, level: usize) -> String {
    format!("{} {}\n", "#".repeat(level.saturating_sub(1)), title)
}

/// Normalizes a test body for display: LF line endings, no BOM, common
/// indentation removed, surrounding blank lines and trailing spaces trimmed.
///
/// 规范化测试主体以便显示：LF 换行、无 BOM、去除公共缩进、修剪首尾空行和行尾空格。
pub fn clean_body(body: &str) -> String {
    let normalized = body.trim_start_matches('\u{feff}').replace("\r\n", "\n");

    let indent = normalized
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);

    let lines: Vec<&str> = normalized
        .lines()
        .map(|line| {
            let line = line.trim_end();
            line.get(indent..).unwrap_or_else(|| line.trim_start())
        })
        .collect();

    lines.join("\n").trim_matches('\n').to_string()
}
