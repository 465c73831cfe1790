//! # CLI Commands / 命令行命令
//!
//! - `run` - Discover test files, run them and report
//! - `docs` - Render the test report as a documentation page
//!
//! - `run` - 发现测试文件、运行并报告
//! - `docs` - 将测试报告渲染为文档页面

pub mod docs;
pub mod run;
