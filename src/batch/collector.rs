//! # 文件收集器
//!
//! 根据输入路径和模式收集待处理的结构文件。
//!
//! ## 功能
//! - 输入可以是多个文件和/或目录
//! - glob 模式匹配（逗号分隔多个模式）
//! - 可选递归搜索
//!
//! ## 依赖关系
//! - 被 `commands/batch.rs` 调用
//! - 使用 `walkdir` 遍历目录，`glob` 匹配文件名

use crate::error::{Result, XasError};

use glob::Pattern;
use std::path::PathBuf;
use walkdir::WalkDir;

/// 文件收集器
pub struct FileCollector {
    /// 输入路径
    inputs: Vec<PathBuf>,
    /// 匹配模式列表
    patterns: Vec<Pattern>,
    /// 是否递归
    recursive: bool,
}

impl FileCollector {
    pub fn new(inputs: Vec<PathBuf>) -> Self {
        Self {
            inputs,
            patterns: Vec::new(),
            recursive: false,
        }
    }

    /// 设置匹配模式（逗号分隔的多模式），只作用于目录中的文件
    pub fn with_pattern(mut self, pattern: &str) -> Result<Self> {
        self.patterns = pattern
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|p| {
                Pattern::new(p).map_err(|e| {
                    XasError::InvalidArgument(format!("Invalid pattern '{}': {}", p, e))
                })
            })
            .collect::<Result<_>>()?;
        Ok(self)
    }

    /// 设置是否递归搜索
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// 收集所有匹配的文件（去重、排序）
    ///
    /// 直接给出的文件总会被收集；不存在的路径报 `FileNotFound`。
    pub fn collect(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for input in &self.inputs {
            if input.is_file() {
                files.push(input.clone());
                continue;
            }
            if !input.is_dir() {
                return Err(XasError::FileNotFound {
                    path: input.display().to_string(),
                });
            }

            let max_depth = if self.recursive { usize::MAX } else { 1 };
            let walker = WalkDir::new(input)
                .max_depth(max_depth)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file());

            for entry in walker {
                if let Some(name) = entry.file_name().to_str() {
                    if self.matches(name) {
                        files.push(entry.path().to_path_buf());
                    }
                }
            }
        }

        files.sort();
        files.dedup();
        Ok(files)
    }

    fn matches(&self, name: &str) -> bool {
        self.patterns.is_empty() || self.patterns.iter().any(|p| p.matches(name))
    }
}
