//! # 光谱数据导出
//!
//! 导出 FDMNES 光谱到 CSV。
//!
//! ## 依赖关系
//! - 被 `commands/info.rs` 调用
//! - 使用 `csv` 库写入 CSV 文件

use crate::error::{Result, XasError};
use crate::spectrum::Spectrum;

use std::path::Path;

/// 导出 (energy, mu) 为 CSV
pub fn to_csv(spectrum: &Spectrum, output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path)?;

    wtr.write_record(["energy", "mu"])?;
    for (energy, mu) in &spectrum.data {
        wtr.write_record(&[format!("{:.4}", energy), format!("{:.6e}", mu)])?;
    }

    wtr.flush().map_err(|e| XasError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;

    Ok(())
}
