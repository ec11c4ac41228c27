//! # 输入文件写出模块
//!
//! 将吸收位点会话写成 FDMNES / FEFF 输入文件、团簇 XYZ 与批处理清单。
//!
//! ## 依赖关系
//! - 被 `commands/` 使用
//! - 使用 `xas/`, `models/`
//! - 子模块: template, fdmnes, feff, fdmgen, manifest, xyz

pub mod fdmgen;
pub mod fdmnes;
pub mod feff;
pub mod manifest;
pub mod template;
pub mod xyz;

use crate::error::{Result, XasError};

use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};

/// 写入注释与 TITLE 的时间戳，如 `2024-03-01_1530`
pub fn timestamp() -> String {
    Local::now().format("%Y-%m-%d_%H%M").to_string()
}

/// 默认输出目录：`<tmp>/xasgen-<时间>-<pid>/<code>/<结构名>/<元素>/site<i>`
pub fn default_output_dir(code: &str, name: &str, absorber: &str, site: usize) -> PathBuf {
    let session_dir = format!(
        "xasgen-{}-{}",
        Local::now().format("%Y%m%d%H%M%S"),
        std::process::id()
    );
    std::env::temp_dir()
        .join(session_dir)
        .join(code)
        .join(name)
        .join(absorber)
        .join(format!("site{}", site))
}

/// 创建目录（含父目录）
pub fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| XasError::FileWriteError {
        path: dir.display().to_string(),
        source: e,
    })
}

/// 写文本文件，必要时创建父目录
pub fn write_text(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_dir(parent)?;
        }
    }
    fs::write(path, content).map_err(|e| XasError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    })
}
