//! # suite2md Library / suite2md 库
//!
//! This library turns the lifecycle events of a test run into a structured
//! Markdown document: a heading per suite, a table of contents, fenced code
//! blocks per test body, pass/fail symbols and timings.
//!
//! 此库将测试运行的生命周期事件转换为结构化的 Markdown 文档：
//! 每个套件一个标题、目录、每个测试主体的围栏代码块、通过/失败符号和耗时。
//!
//! ## Modules / 模块
//!
//! - `core` - Configuration, data models, events, test file loading and the execution engine
//! - `infra` - Infrastructure services like command execution and file system operations
//! - `reporting` - Markdown and console reporters
//! - `cli` - Command-line interface and commands
//!
//! - `core` - 配置、数据模型、事件、测试文件加载和执行引擎
//! - `infra` - 基础设施服务，如命令执行和文件系统操作
//! - `reporting` - Markdown 和控制台报告器
//! - `cli` - 命令行接口和命令

pub mod cli;
pub mod core;
pub mod infra;
pub mod reporting;

// Re-export commonly used items
pub use core::config;
pub use core::events;
pub use core::models;

/// Initializes the application's internationalization (i18n) based on the system locale.
///
/// This function detects the user's system locale and sets the appropriate
/// language for the application's user interface. It attempts to match the full
/// locale (e.g., "zh-CN"), then just the language code (e.g., "en"), and
/// finally falls back to the default language ("en").
pub fn init() {
    let locale = sys_locale::get_locale().unwrap_or_else(|| "en".to_string());
    rust_i18n::set_locale(&match_locale(&locale));
}

/// Picks the best available locale for `requested`: the full tag, then its
/// language part, then "en".
///
/// 为 `requested` 选择最合适的可用语言环境：完整标签、语言部分，最后是 "en"。
pub fn match_locale(requested: &str) -> String {
    let available_locales = rust_i18n::available_locales!();

    if available_locales.contains(&requested) {
        return requested.to_string();
    }
    requested
        .split(['-', '_'])
        .next()
        .filter(|lang_code| available_locales.contains(lang_code))
        .unwrap_or("en")
        .to_string()
}

// Initialize i18n
rust_i18n::i18n!("locales", fallback = "en");
