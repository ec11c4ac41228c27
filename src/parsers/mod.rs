//! # 解析器模块
//!
//! 提供结构文件 (CIF, XYZ) 与 FDMNES 输出的解析器。
//!
//! ## 依赖关系
//! - 被 `xas/session.rs` 和 `commands/` 模块使用
//! - 使用 `models/` 数据模型
//! - 子模块: cif, xyz, fdmnes_out

pub mod cif;
pub mod fdmnes_out;
pub mod xyz;

use crate::error::{Result, XasError};
use crate::models::{Molecule, Structure};
use std::path::Path;

/// 读入的结构输入
#[derive(Debug, Clone)]
pub enum StructureInput {
    /// 周期性晶体（单帧）
    Crystal(Structure),
    /// 分子轨迹（一帧或多帧）
    Molecules(Vec<Molecule>),
}

impl StructureInput {
    pub fn frame_count(&self) -> usize {
        match self {
            StructureInput::Crystal(_) => 1,
            StructureInput::Molecules(frames) => frames.len(),
        }
    }
}

/// 从文件路径推断格式并解析
pub fn parse_structure_file(path: &Path) -> Result<StructureInput> {
    if !path.is_file() {
        return Err(XasError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "cif" => cif::parse_cif_file(path).map(StructureInput::Crystal),
        "xyz" => xyz::parse_xyz_file(path).map(StructureInput::Molecules),
        _ => Err(XasError::UnsupportedExtension(path.display().to_string())),
    }
}
