//! # CIF 批处理
//!
//! `batch` 命令的文件收集与逐个执行：
//! - 多个文件和/或目录作为输入，按 glob 模式筛选 CIF
//! - 按输入顺序串行写出输入文件，统计成功/跳过/失败
//!
//! ## 依赖关系
//! - 被 `commands/batch.rs` 使用
//! - 子模块: collector, runner

pub mod collector;
pub mod runner;

pub use collector::FileCollector;
pub use runner::{BatchResult, BatchRunner, ProcessResult};
