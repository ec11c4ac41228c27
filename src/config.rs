//! # 批处理配置
//!
//! 读取 `fdmgen-config.txt`：每行 `KEY VALUE`，`#` 开头为注释。
//!
//! ## 格式说明
//! ```text
//! UNIX        True
//! INPUT_DIR   inputs
//! OUTPUT_DIR  outputs
//! RADIUS      6.0
//! GREEN       True
//! SCF         True
//! QUADRUPOLE  False
//! DENSITY     False
//! OXIDE       False
//! ```
//! 布尔值只有 `True` 为真。
//!
//! ## 依赖关系
//! - 被 `commands/batch.rs` 和 `writers/fdmgen.rs` 使用

use crate::error::{Result, XasError};

use std::fs;
use std::path::{Path, PathBuf};

/// 默认配置文件名
pub const CONFIG_FILE_NAME: &str = "fdmgen-config.txt";

/// 必需的配置键
pub const CONFIG_KEYS: [&str; 9] = [
    "UNIX",
    "INPUT_DIR",
    "OUTPUT_DIR",
    "RADIUS",
    "GREEN",
    "SCF",
    "QUADRUPOLE",
    "DENSITY",
    "OXIDE",
];

/// FDMNES 批处理配置
#[derive(Debug, Clone, PartialEq)]
pub struct BatchConfig {
    /// 目标机器为 Unix：路径统一写成 `/`
    pub unix: bool,

    /// 输入文件写入目录
    pub input_dir: PathBuf,

    /// FDMNES 输出目录（写入 `filout`，可以是计算机器上的路径）
    pub output_dir: String,

    /// 计算半径，按原样写入
    pub radius: String,

    pub green: bool,
    pub scf: bool,
    pub quadrupole: bool,
    pub density: bool,

    /// 氧化物：加入 `Rpotmax 15` 与 `Full_atom`
    pub oxide: bool,
}

impl BatchConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| XasError::FileReadError {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::parse(&content, &path.display().to_string())
    }

    pub fn parse(content: &str, path: &str) -> Result<Self> {
        let mut pairs: Vec<(String, String)> = Vec::new();

        for (i, raw) in content.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let tokens: Vec<&str> = line.split_whitespace().collect();
            if tokens.len() != 2 {
                return Err(XasError::MalformedConfig {
                    path: path.to_string(),
                    line: i + 1,
                    content: line.to_string(),
                });
            }
            let key = tokens[0].to_uppercase();
            match pairs.iter_mut().find(|(k, _)| *k == key) {
                Some(entry) => entry.1 = tokens[1].to_string(),
                None => pairs.push((key, tokens[1].to_string())),
            }
        }

        let get = |key: &str| -> Result<&str> {
            pairs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
                .ok_or_else(|| XasError::MissingConfigKey {
                    key: key.to_string(),
                    path: path.to_string(),
                })
        };
        let flag = |key: &str| -> Result<bool> { get(key).map(|v| v == "True") };

        for key in CONFIG_KEYS {
            get(key)?;
        }

        let radius = get("RADIUS")?;
        if radius.parse::<f64>().map_or(true, |r| !r.is_finite() || r < 0.0) {
            return Err(XasError::InvalidArgument(format!(
                "RADIUS in {} must be a non-negative number, got '{}'",
                path, radius
            )));
        }

        Ok(BatchConfig {
            unix: flag("UNIX")?,
            input_dir: PathBuf::from(get("INPUT_DIR")?),
            output_dir: get("OUTPUT_DIR")?.to_string(),
            radius: radius.to_string(),
            green: flag("GREEN")?,
            scf: flag("SCF")?,
            quadrupole: flag("QUADRUPOLE")?,
            density: flag("DENSITY")?,
            oxide: flag("OXIDE")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = "\
# FDMNES batch settings
UNIX True
INPUT_DIR inputs
OUTPUT_DIR outputs
RADIUS 6.0

GREEN True
SCF False
QUADRUPOLE True
DENSITY no
OXIDE False
";

    #[test]
    fn test_parse_config() {
        let conf = BatchConfig::parse(CONFIG, CONFIG_FILE_NAME).unwrap();
        assert!(conf.unix);
        assert_eq!(conf.input_dir, PathBuf::from("inputs"));
        assert_eq!(conf.output_dir, "outputs");
        assert_eq!(conf.radius, "6.0");
        assert!(conf.green);
        assert!(!conf.scf);
        assert!(conf.quadrupole);
        assert!(!conf.density);
        assert!(!conf.oxide);
    }

    #[test]
    fn test_missing_key() {
        let content = CONFIG.replace("OXIDE False\n", "");
        assert!(matches!(
            BatchConfig::parse(&content, "conf"),
            Err(XasError::MissingConfigKey { key, .. }) if key == "OXIDE"
        ));
    }

    #[test]
    fn test_malformed_line() {
        let content = CONFIG.replace("SCF False", "SCF False extra");
        assert!(matches!(
            BatchConfig::parse(&content, "conf"),
            Err(XasError::MalformedConfig { line: 8, .. })
        ));
    }

    #[test]
    fn test_invalid_radius() {
        let content = CONFIG.replace("RADIUS 6.0", "RADIUS big");
        assert!(matches!(
            BatchConfig::parse(&content, "conf"),
            Err(XasError::InvalidArgument(_))
        ));
    }
}
