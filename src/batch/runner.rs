//! # 批量执行器
//!
//! 逐个处理文件并汇总结果。处理按输入顺序串行进行，
//! 成功项的输出按同一顺序保存（清单顺序与输入一致）。
//!
//! ## 依赖关系
//! - 被 `commands/batch.rs` 调用
//! - 使用 `utils/progress.rs` 创建进度条

use crate::utils::{output, progress};

use std::path::{Path, PathBuf};

/// 单个文件处理结果
#[derive(Debug, Clone)]
pub enum ProcessResult {
    /// 处理成功，附带输出路径
    Success(String),
    /// 跳过
    Skipped(String),
    /// 处理失败
    Failed(String, String), // (文件路径, 错误信息)
}

/// 批量处理结果统计
#[derive(Debug, Default)]
pub struct BatchResult {
    pub success: usize,
    pub skipped: usize,
    pub failed: usize,
    /// 成功项的输出（按处理顺序）
    pub outputs: Vec<String>,
    /// 跳过的文件
    pub skipped_files: Vec<String>,
    /// 失败详情
    pub failures: Vec<(String, String)>,
}

impl BatchResult {
    /// 合并处理结果
    pub fn merge(&mut self, result: ProcessResult) {
        match result {
            ProcessResult::Success(out) => {
                self.success += 1;
                self.outputs.push(out);
            }
            ProcessResult::Skipped(path) => {
                self.skipped += 1;
                self.skipped_files.push(path);
            }
            ProcessResult::Failed(path, err) => {
                self.failed += 1;
                self.failures.push((path, err));
            }
        }
    }

    /// 总处理数量
    pub fn total(&self) -> usize {
        self.success + self.skipped + self.failed
    }
}

/// 批量执行器
pub struct BatchRunner {
    message: String,
    show_progress: bool,
}

impl BatchRunner {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
            show_progress: true,
        }
    }

    /// 关闭进度条（测试或逐项交互输出时）
    pub fn quiet(mut self) -> Self {
        self.show_progress = false;
        self
    }

    /// 依次处理文件列表
    pub fn run<F>(&self, files: &[PathBuf], mut processor: F) -> BatchResult
    where
        F: FnMut(&Path) -> ProcessResult,
    {
        let pb = self
            .show_progress
            .then(|| progress::create_progress_bar(files.len() as u64, &self.message));

        let mut batch_result = BatchResult::default();
        for file in files {
            let result = processor(file);

            if let ProcessResult::Failed(path, err) = &result {
                let msg = format!("{}: {}", path, err);
                match &pb {
                    Some(pb) => pb.suspend(|| output::print_error(&msg)),
                    None => output::print_error(&msg),
                }
            }

            batch_result.merge(result);
            if let Some(pb) = &pb {
                pb.inc(1);
            }
        }

        if let Some(pb) = pb {
            pb.finish_and_clear();
        }
        batch_result
    }
}
