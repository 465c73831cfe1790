//! # Reporting Module / 报告模块
//!
//! This module turns the events of a run into output: the Markdown document
//! with its table of contents, and colorful console progress and summaries
//! with internationalization support.
//!
//! 此模块将运行事件转换为输出：带目录的 Markdown 文档，
//! 以及支持国际化的彩色控制台进度和摘要。

pub mod console;
pub mod format;
pub mod markdown;
pub mod toc;

// Re-export common reporting items
pub use console::{SpecReporter, write_epilogue};
pub use markdown::MarkdownReporter;
