//! # Table of Contents Module / 目录模块
//!
//! Builds the `default` style table of contents from a suite tree in two
//! passes: an index of suites keyed by title, then a nested bullet list of
//! links whose anchors match the ones [`MarkdownReporter`] emits.
//!
//! 分两步从套件树构建 `default` 样式的目录：先建立以标题为键的套件索引，
//! 再生成嵌套的链接列表，其锚点与 [`MarkdownReporter`] 输出的锚点一致。
//!
//! [`MarkdownReporter`]: crate::reporting::markdown::MarkdownReporter

use crate::core::models::Suite;
use crate::reporting::format::slug;

const INDENT: &str = "    ";

/// One suite in the index together with its children, in source order.
/// 索引中的一个套件及其子项（按源顺序）。
#[derive(Debug, Clone, PartialEq)]
pub struct TocNode<'a> {
    pub suite: &'a Suite,
    pub children: Vec<(String, TocNode<'a>)>,
}

impl<'a> TocNode<'a> {
    fn new(suite: &'a Suite) -> Self {
        Self {
            suite,
            children: Vec::new(),
        }
    }

    /// The child keyed by `title`, created if missing. Siblings sharing a
    /// title share one node and therefore one link.
    fn child_mut(&mut self, title: &str, suite: &'a Suite) -> &mut TocNode<'a> {
        let position = match self.children.iter().position(|(key, _)| key == title) {
            Some(position) => position,
            None => {
                self.children.push((title.to_string(), TocNode::new(suite)));
                self.children.len() - 1
            }
        };
        &mut self.children[position].1
    }
}

/// Index phase: mirrors the suite tree, keyed by title.
/// 索引阶段：以标题为键镜像套件树。
pub fn index(root: &Suite) -> TocNode<'_> {
    index_where(root, &|_: &Suite| true)
}

/// Like [`index`], but leaves out every suite for which `keep` is false,
/// together with its subtree.
///
/// 与 [`index`] 相同，但会省略 `keep` 返回 false 的套件及其子树。
pub fn index_where<'a>(root: &'a Suite, keep: &dyn Fn(&Suite) -> bool) -> TocNode<'a> {
    let mut node = TocNode::new(root);
    index_children(root, &mut node, keep);
    node
}

fn index_children<'a>(suite: &'a Suite, node: &mut TocNode<'a>, keep: &dyn Fn(&Suite) -> bool) {
    for child in suite.suites.iter().filter(|child| keep(child)) {
        let entry = node.child_mut(&child.title, child);
        index_children(child, entry, keep);
    }
}

/// Serialize phase: one `- [title](#slug)` line per titled suite, indented
/// four spaces per level below the top.
///
/// 序列化阶段：每个有标题的套件一行 `- [title](#slug)`，顶层以下每级缩进四个空格。
pub fn stringify(node: &TocNode<'_>, depth: usize) -> String {
    let mut buf = String::new();
    for (title, child) in &node.children {
        if !title.is_empty() {
            buf.push_str(&INDENT.repeat(depth));
            buf.push_str(&format!(
                "- [{}](#{})\n",
                title,
                slug(&child.suite.full_title)
            ));
        }
        buf.push_str(&stringify(child, depth + 1));
    }
    buf
}

/// Builds the table of contents for `root`, wrapped in blank lines.
///
/// The root suite never gets an entry; empty suites do.
///
/// 为 `root` 构建目录，前后各有一个空行。根套件从不生成条目；空套件会生成条目。
pub fn build(root: &Suite) -> String {
    build_where(root, &|_: &Suite| true)
}

/// Builds the table of contents over the suites accepted by `keep`.
/// A run that stopped early passes the suites it actually reported.
///
/// 仅对 `keep` 接受的套件构建目录。提前停止的运行会传入实际报告过的套件。
pub fn build_where(root: &Suite, keep: &dyn Fn(&Suite) -> bool) -> String {
    format!("\n{}\n", stringify(&index_where(root, keep), 0))
}
