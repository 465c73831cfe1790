//! # Core Module / 核心模块
//!
//! This module contains the core functionality of suite2md,
//! including data models, configuration, lifecycle events, test file
//! loading and the execution engine.
//!
//! 此模块包含 suite2md 的核心功能，
//! 包括数据模型、配置、生命周期事件、测试文件加载和执行引擎。

pub mod config;
pub mod events;
pub mod execution;
pub mod loader;
pub mod models;

// Re-exports
pub use config::{Configuration, ReporterOptions, TocStyle};
pub use events::{Reporter, RunnerEvent};
pub use execution::{Runner, RunnerOptions};
pub use models::{Suite, Test};
