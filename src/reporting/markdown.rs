//! # Markdown Reporting Module / Markdown 报告模块
//!
//! [`MarkdownReporter`] turns the events of one run into a Markdown
//! document: a heading per suite, a fenced code block per test, pass/fail
//! glyphs and timings, and a table of contents chosen by [`TocStyle`].
//!
//! [`MarkdownReporter`] 将一次运行的事件转换为 Markdown 文档：
//! 每个套件一个标题，每个测试一个围栏代码块，通过/失败符号和耗时，
//! 以及由 [`TocStyle`] 选择的目录。

use anyhow::Result;
use std::collections::HashSet;
use std::io::{self, Stdout, Write};
use tracing::{debug, info};

use crate::core::config::{Configuration, TocStyle};
use crate::core::events::{Reporter, RunnerEvent};
use crate::core::models::{Suite, Test};
use crate::infra::fs::write_document;
use crate::reporting::format::{clean_body, format_duration, heading, slug, symbols};
use crate::reporting::toc;

/// Marker that keeps a heading out of kramdown's generated TOC.
/// 使标题不出现在 kramdown 生成的目录中的标记。
pub const NO_TOC: &str = "{:.no_toc}\n";

/// Placeholder expanded into a TOC by kramdown.
/// 由 kramdown 展开为目录的占位符。
pub const KRAMDOWN_TOC: &str = "- TOC\n{:toc}\n\n";

/// Accumulates one run into a Markdown document.
///
/// The document is written to `out` (stdout by default) unless the
/// configuration is quiet, and persisted to `path/filename` when a filename
/// is configured.
///
/// 将一次运行累积为 Markdown 文档。
/// 除非配置为安静模式，文档会写入 `out`（默认为 stdout）；
/// 配置了文件名时会持久化到 `path/filename`。
#[derive(Debug)]
pub struct MarkdownReporter<W: Write = Stdout> {
    config: Configuration,
    level: usize,
    buf: String,
    /// Full titles of the suites that got a heading; only these are linked.
    begun: HashSet<String>,
    document: Option<String>,
    out: W,
}

impl MarkdownReporter<Stdout> {
    pub fn new(config: Configuration) -> Self {
        Self::with_writer(config, io::stdout())
    }
}

impl<W: Write> MarkdownReporter<W> {
    pub fn with_writer(config: Configuration, out: W) -> Self {
        let level = config.level.max(1);
        Self {
            config,
            level,
            buf: String::new(),
            begun: HashSet::new(),
            document: None,
            out,
        }
    }

    /// Current nesting level: the configured base plus the open suites.
    /// 当前嵌套级别：配置的基础级别加上已打开的套件数。
    pub fn level(&self) -> usize {
        self.level
    }

    /// Consumes the reporter and hands back its writer.
    pub fn into_writer(self) -> W {
        self.out
    }

    fn suite_begin(&mut self, suite: &Suite) {
        if suite.is_root() {
            return;
        }
        self.level += 1;
        self.begun.insert(suite.full_title.clone());
        if self.config.toc == TocStyle::Default {
            self.buf
                .push_str(&format!("<a name=\"{}\"></a>\n", slug(&suite.full_title)));
        }
        self.buf.push_str(&heading(&suite.title, self.level));
        if self.config.toc == TocStyle::None {
            self.buf.push_str(NO_TOC);
        }
    }

    fn suite_end(&mut self, suite: &Suite) {
        if suite.is_root() {
            return;
        }
        let floor = self.config.level.max(1);
        debug_assert!(self.level > floor, "unbalanced suite end");
        self.level = self.level.saturating_sub(1).max(floor);
    }

    fn test_entry(&mut self, test: &Test, status: &str) {
        self.buf.push_str(&format!("{}{}.\n", test.title, status));
        if let Some(duration) = test.duration {
            self.buf.push_str(&format!("{}.\n", format_duration(duration)));
        }
        self.buf.push_str(&format!(
            "\n```{}\n{}\n```\n\n",
            test.language,
            clean_body(&test.body)
        ));
    }

    /// Puts the document together: prepend, title, TOC, body, append.
    /// 组装文档：前置内容、标题、目录、正文、附加内容。
    fn assemble(&self, root: &Suite) -> String {
        let mut markdown = String::new();
        if let Some(prepend) = &self.config.prepend {
            markdown.push_str(prepend);
            markdown.push('\n');
        }
        if let Some(title) = &self.config.title {
            markdown.push_str(&heading(title, self.config.level.max(1) + 1));
            markdown.push_str(NO_TOC);
        }
        match self.config.toc {
            TocStyle::None => {}
            TocStyle::Kramdown => markdown.push_str(KRAMDOWN_TOC),
            TocStyle::Default => {
                let begun = |suite: &Suite| self.begun.contains(&suite.full_title);
                markdown.push_str(&toc::build_where(root, &begun));
            }
        }
        markdown.push_str(&self.buf);
        markdown.push('\n');
        if let Some(append) = &self.config.append {
            markdown.push_str(append);
            markdown.push('\n');
        }
        markdown
    }

    fn run_end(&mut self, root: &Suite) -> Result<()> {
        if self.document.is_some() {
            return Ok(());
        }
        let markdown = self.assemble(root);
        self.document = Some(markdown);
        let markdown = self.document.as_deref().unwrap_or_default();

        if !self.config.quiet {
            self.out.write_all(markdown.as_bytes())?;
            self.out.flush()?;
        }
        if let Some(path) = self.config.output_path() {
            write_document(&path, markdown)?;
            info!(path = %path.display(), "markdown report written");
        }
        Ok(())
    }
}

impl<W: Write> Reporter for MarkdownReporter<W> {
    fn on_event(&mut self, event: &RunnerEvent<'_>) -> Result<()> {
        match *event {
            RunnerEvent::SuiteBegin(suite) => self.suite_begin(suite),
            RunnerEvent::SuiteEnd(suite) => self.suite_end(suite),
            RunnerEvent::TestPass(test) => {
                self.test_entry(test, &format!(" {}", symbols::OK))
            }
            RunnerEvent::TestFail(test, _) => {
                self.test_entry(test, &format!(" {}", symbols::ERR))
            }
            RunnerEvent::TestPending(test) => self.test_entry(test, " - skipped"),
            RunnerEvent::RunEnd { root, .. } => {
                debug!(bytes = self.buf.len(), "assembling markdown document");
                return self.run_end(root);
            }
        }
        Ok(())
    }

    fn document(&self) -> Option<&str> {
        self.document.as_deref()
    }
}
