//! # 统一错误处理模块
//!
//! 定义 xasgen 的所有错误类型，使用 `thiserror` 派生。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// xasgen 统一错误类型
#[derive(Error, Debug)]
pub enum XasError {
    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ─────────────────────────────────────────────────────────────
    // 解析错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to parse {format} file: {path}\nReason: {reason}")]
    ParseError {
        format: String,
        path: String,
        reason: String,
    },

    #[error("Only CIF and XYZ files are supported, got: {0}")]
    UnsupportedExtension(String),

    #[error("Unknown element: {0}")]
    UnknownElement(String),

    // ─────────────────────────────────────────────────────────────
    // 结构 / 吸收位点错误
    // ─────────────────────────────────────────────────────────────
    #[error("Absorber atom '{absorber}' not found in structure")]
    SiteNotFound { absorber: String },

    #[error("Absorber site index {index} out of range ({count} sites available)")]
    SiteIndexOutOfRange { index: usize, count: usize },

    #[error("Frame index {index} out of range ({count} frames available)")]
    FrameIndexOutOfRange { index: usize, count: usize },

    #[error("Symmetry search failed: {0}")]
    Symmetry(String),

    // ─────────────────────────────────────────────────────────────
    // 配置 / 模板错误
    // ─────────────────────────────────────────────────────────────
    #[error("Malformed config file {path}, line {line}: '{content}'")]
    MalformedConfig {
        path: String,
        line: usize,
        content: String,
    },

    #[error("Missing key '{key}' in config file {path}")]
    MissingConfigKey { key: String, path: String },

    #[error("Template placeholder '{{{key}}}' has no value")]
    MissingTemplateKey { key: String },

    // ─────────────────────────────────────────────────────────────
    // 参数错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // ─────────────────────────────────────────────────────────────
    // CSV 错误
    // ─────────────────────────────────────────────────────────────
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    // ─────────────────────────────────────────────────────────────
    // 其他
    // ─────────────────────────────────────────────────────────────
    #[error("{0}")]
    Other(String),
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, XasError>;
