//! # File System Operations Module / 文件系统操作模块
//!
//! This module provides utilities for file system operations,
//! such as discovering test files and persisting the finished document.
//!
//! 此模块提供文件系统操作的实用功能，
//! 如发现测试文件和持久化完成的文档。

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// File extensions recognized as test files.
/// 被识别为测试文件的文件扩展名。
pub const TEST_FILE_EXTENSIONS: [&str; 2] = ["toml", "json"];

/// Lists the test files directly inside `dir`, sorted by file name.
///
/// When `selected` is non-empty only files whose name (relative to `dir`)
/// appears in it are returned.
///
/// # Arguments
/// * `dir` - Directory to search (not recursive)
/// * `selected` - File names to restrict the result to
///
/// # Returns
/// The matching test file paths
///
/// 列出 `dir` 中直接包含的测试文件，按文件名排序。
/// 当 `selected` 非空时，只返回名称出现在其中的文件。
pub fn discover_test_files(dir: &Path, selected: &[String]) -> Result<Vec<PathBuf>> {
    let wanted: Vec<PathBuf> = selected.iter().map(|name| dir.join(name)).collect();

    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("Failed to read test directory: {}", dir.display()))?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_test_file(path))
        .filter(|path| wanted.is_empty() || wanted.contains(path))
        .collect();

    files.sort();
    Ok(files)
}

fn is_test_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| TEST_FILE_EXTENSIONS.contains(&ext))
}

/// Writes `content` to `path`, creating missing parent directories.
///
/// 将 `content` 写入 `path`，并创建缺失的父目录。
pub fn write_document(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    fs::write(path, content)
        .with_context(|| format!("Failed to write document: {}", path.display()))
}

/// Checks if a path exists and is a directory.
///
/// # Arguments
/// * `path` - Path to check
///
/// # Returns
/// `true` if the path exists and is a directory, `false` otherwise
pub fn is_directory(path: &Path) -> bool {
    path.exists() && path.is_dir()
}
