//! # FDMNES 输出文件解析器
//!
//! 读取 FDMNES 输出（输入文件需包含 `Header` 关键字）的头部信息与光谱数据。
//!
//! ## 格式说明
//! ```text
//! 第 4 行:  E_edge  Z  ...  ...  ...  ...  E_fermi ...
//! 之后:     列名行 + "energy  mu ..." 数值行
//! ```
//!
//! ## 依赖关系
//! - 被 `commands/info.rs` 使用
//! - 构造 `spectrum::Spectrum`

use crate::error::{Result, XasError};
use crate::spectrum::Spectrum;

use std::fs;
use std::path::Path;

/// 头部数值所在行（0 起）
const HEADER_LINE: usize = 3;

/// 解析 FDMNES 输出文件
pub fn parse_fdmnes_output(path: &Path) -> Result<Spectrum> {
    let content = fs::read_to_string(path).map_err(|e| XasError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_fdmnes_content(
        &content,
        path.file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown"),
    )
}

/// 从字符串内容解析 FDMNES 输出
pub fn parse_fdmnes_content(content: &str, name: &str) -> Result<Spectrum> {
    let parse_err = |reason: String| XasError::ParseError {
        format: "fdmnes output".to_string(),
        path: name.to_string(),
        reason,
    };

    let lines: Vec<&str> = content.lines().collect();
    let header = lines
        .get(HEADER_LINE)
        .ok_or_else(|| parse_err("File too short, missing header line".to_string()))?;

    let values: Vec<&str> = header.split_whitespace().collect();
    if values.len() < 7 {
        return Err(parse_err(format!(
            "Header line has {} values, expected at least 7 (was the input written with 'Header'?)",
            values.len()
        )));
    }

    let number = |s: &str| -> Result<f64> {
        s.parse::<f64>()
            .map_err(|_| parse_err(format!("Invalid header value '{}'", s)))
    };

    let e_edge = number(values[0])?;
    let z = number(values[1])?.round() as u32;
    let e_fermi = number(values[6])?;

    let data: Vec<(f64, f64)> = lines
        .iter()
        .skip(HEADER_LINE + 1)
        .filter_map(|line| {
            let cols: Vec<f64> = line
                .split_whitespace()
                .map(|t| t.parse::<f64>())
                .collect::<std::result::Result<_, _>>()
                .ok()?;
            if cols.len() >= 2 {
                Some((cols[0], cols[1]))
            } else {
                None
            }
        })
        .collect();

    Ok(Spectrum {
        name: name.to_string(),
        e_edge,
        z,
        e_fermi,
        data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const OUTPUT: &str = "\
 FDMNES
 Fe K-edge
 energy shift
  7112.000  26  1  0.5  0.0  0.0  -4.321  1
    Energy    <xanes>
  -10.0   0.012
   -9.5   0.015
    0.0   1.400
";

    #[test]
    fn test_parse_header_and_data() {
        let s = parse_fdmnes_content(OUTPUT, "job_inp").unwrap();
        assert_eq!(s.e_edge, 7112.0);
        assert_eq!(s.z, 26);
        assert_eq!(s.e_fermi, -4.321);
        assert_eq!(s.data.len(), 3);
        assert_eq!(s.data[2], (0.0, 1.4));
    }

    #[test]
    fn test_short_header() {
        let content = "a\nb\nc\n 1 2 3\n";
        assert!(matches!(
            parse_fdmnes_content(content, "bad"),
            Err(XasError::ParseError { .. })
        ));
        assert!(parse_fdmnes_content("a\n", "bad").is_err());
    }
}
