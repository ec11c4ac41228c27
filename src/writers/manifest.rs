//! # FDMNES 批处理清单 (fdmfile.txt)
//!
//! ## 格式说明
//! ```text
//! 3
//! path/to/job1.txt
//! path/to/job2.txt
//! path/to/job3.txt
//! ```
//! 第一行为任务数，其后每行一个输入文件路径。
//!
//! ## 依赖关系
//! - 被 `writers/fdmnes.rs` 与 `commands/batch.rs` 使用

use crate::error::{Result, XasError};

use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};

/// 清单默认文件名
pub const MANIFEST_NAME: &str = "fdmfile.txt";

/// FDMNES 清单
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    pub paths: Vec<String>,
}

impl Manifest {
    pub fn new(paths: Vec<String>) -> Self {
        Manifest { paths }
    }

    /// 添加路径，已存在则跳过；返回是否添加
    pub fn push(&mut self, path: impl Into<String>) -> bool {
        let path = path.into();
        if self.paths.contains(&path) {
            return false;
        }
        self.paths.push(path);
        true
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// 渲染为 fdmfile 文本
    pub fn render(&self) -> String {
        let mut out = format!("{}\n", self.paths.len());
        for path in &self.paths {
            out.push_str(path);
            out.push('\n');
        }
        out
    }

    /// 解析 fdmfile 文本，任务数与路径数不一致时报错
    pub fn parse(content: &str, name: &str) -> Result<Self> {
        let parse_err = |reason: String| XasError::ParseError {
            format: "fdmfile".to_string(),
            path: name.to_string(),
            reason,
        };

        let mut lines = content.lines().map(str::trim).filter(|l| !l.is_empty());

        let count: usize = match lines.next() {
            Some(first) => first
                .parse()
                .map_err(|_| parse_err(format!("Invalid job count '{}'", first)))?,
            None => return Ok(Manifest::default()),
        };

        let paths: Vec<String> = lines.map(str::to_string).collect();
        if paths.len() != count {
            return Err(parse_err(format!(
                "Job count is {} but {} paths are listed",
                count,
                paths.len()
            )));
        }

        Ok(Manifest { paths })
    }

    pub fn read(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| XasError::FileReadError {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::parse(&content, &path.display().to_string())
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        fs::write(path, self.render()).map_err(|e| XasError::FileWriteError {
            path: path.display().to_string(),
            source: e,
        })
    }
}

/// 将一个任务路径加入已有清单（不存在则新建），并重写任务数
pub fn append_entry(manifest_path: &Path, entry: &str) -> Result<Manifest> {
    let mut manifest = if manifest_path.is_file() {
        Manifest::read(manifest_path)?
    } else {
        Manifest::default()
    };

    if !manifest.push(entry) {
        log::debug!("{} already listed in {}", entry, manifest_path.display());
    }
    manifest.write(manifest_path)?;
    Ok(manifest)
}

/// 按最后修改时间重命名已有清单：`fdmfile.txt` -> `fdmfile<unix秒>.txt`
///
/// 清单不存在时返回 `Ok(None)`。
pub fn archive_existing(path: &Path) -> Result<Option<PathBuf>> {
    if !path.is_file() {
        return Ok(None);
    }

    let io_err = |e: std::io::Error| XasError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    };

    let modified = fs::metadata(path).and_then(|m| m.modified()).map_err(io_err)?;
    let stamp = DateTime::<Utc>::from(modified).timestamp();

    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("fdmfile");
    let archived_name = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{}{}.{}", stem, stamp, ext),
        None => format!("{}{}", stem, stamp),
    };
    let archived = path.with_file_name(archived_name);

    fs::rename(path, &archived).map_err(io_err)?;
    log::info!("Archived {} -> {}", path.display(), archived.display());
    Ok(Some(archived))
}
