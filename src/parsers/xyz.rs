//! # XYZ 格式解析器
//!
//! 支持多帧 XYZ 文件，每帧格式：
//! ```text
//! <原子数>
//! <注释行>
//! El x y z
//! ...
//! ```
//! 元素可以是符号或原子序数。
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs` 使用
//! - 使用 `models/structure.rs`, `models/elements.rs`

use crate::error::{Result, XasError};
use crate::models::elements::{element_from_label, symbol};
use crate::models::{Molecule, MoleculeAtom};

use std::fs;
use std::path::Path;

/// 解析 .xyz 文件，返回所有帧
pub fn parse_xyz_file(path: &Path) -> Result<Vec<Molecule>> {
    let content = fs::read_to_string(path).map_err(|e| XasError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_xyz_content(
        &content,
        path.file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown"),
    )
}

/// 从字符串内容解析 XYZ
pub fn parse_xyz_content(content: &str, name: &str) -> Result<Vec<Molecule>> {
    let parse_err = |reason: String| XasError::ParseError {
        format: "xyz".to_string(),
        path: name.to_string(),
        reason,
    };

    let lines: Vec<&str> = content.lines().collect();
    let mut frames = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let header = lines[i].trim();
        if header.is_empty() {
            i += 1;
            continue;
        }

        let n_atoms: usize = header.parse().map_err(|_| {
            parse_err(format!("Invalid atom count '{}' at line {}", header, i + 1))
        })?;

        if i + 2 + n_atoms > lines.len() {
            return Err(parse_err(format!(
                "Frame {} is truncated (expected {} atoms)",
                frames.len(),
                n_atoms
            )));
        }

        let comment = lines[i + 1].trim().to_string();
        let mut atoms = Vec::with_capacity(n_atoms);

        for (offset, line) in lines[i + 2..i + 2 + n_atoms].iter().enumerate() {
            let lineno = i + 3 + offset;
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() < 4 {
                return Err(parse_err(format!("Too few columns at line {}", lineno)));
            }

            let element = match parts[0].parse::<u32>() {
                Ok(z) => symbol(z),
                Err(_) => element_from_label(parts[0]),
            }
            .ok_or_else(|| XasError::UnknownElement(parts[0].to_string()))?;

            let mut position = [0.0; 3];
            for k in 0..3 {
                position[k] = parts[k + 1].parse().map_err(|_| {
                    parse_err(format!("Invalid coordinate '{}' at line {}", parts[k + 1], lineno))
                })?;
            }

            atoms.push(MoleculeAtom {
                element: element.to_string(),
                position,
            });
        }

        frames.push(Molecule {
            name: name.to_string(),
            comment,
            atoms,
        });
        i += 2 + n_atoms;
    }

    if frames.is_empty() {
        return Err(parse_err("No frames found".to_string()));
    }

    Ok(frames)
}
