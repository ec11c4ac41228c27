//! # 输入文件模板
//!
//! 模板中以 `{key}` 作为占位符，`{{` 与 `}}` 输出字面花括号。
//! 默认模板编译进二进制，命令行可用 `--template` 指定外部模板。

use crate::error::{Result, XasError};

use std::fs;
use std::path::Path;

/// 默认 FDMNES 模板
pub const FDMNES_TEMPLATE: &str = include_str!("../../templates/fdmnes.tmpl");

/// 默认 FEFF (EXAFS) 模板
pub const FEFF_TEMPLATE: &str = include_str!("../../templates/feff_exafs.tmpl");

/// 占位符替换表，按插入顺序保存
#[derive(Debug, Default, Clone)]
pub struct Replacements {
    entries: Vec<(String, String)>,
}

impl Replacements {
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置一个值，重复设置时覆盖
    pub fn set(&mut self, key: &str, value: impl ToString) -> &mut Self {
        let value = value.to_string();
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key.to_string(), value)),
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// 读取模板：给定路径则读外部文件，否则使用默认模板
pub fn load_template(path: Option<&Path>, default: &str) -> Result<String> {
    match path {
        Some(p) => fs::read_to_string(p).map_err(|e| XasError::FileReadError {
            path: p.display().to_string(),
            source: e,
        }),
        None => Ok(default.to_string()),
    }
}

/// 用替换表渲染模板
pub fn render(template: &str, values: &Replacements) -> Result<String> {
    let mut out = String::with_capacity(template.len() * 2);
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                out.push('}');
            }
            '{' => {
                let mut key = String::new();
                let mut closed = false;
                for k in chars.by_ref() {
                    if k == '}' {
                        closed = true;
                        break;
                    }
                    key.push(k);
                }
                if !closed {
                    return Err(XasError::Other(format!(
                        "Unterminated placeholder '{{{}' in template",
                        key
                    )));
                }
                let value = values
                    .get(key.trim())
                    .ok_or_else(|| XasError::MissingTemplateKey {
                        key: key.trim().to_string(),
                    })?;
                out.push_str(value);
            }
            _ => out.push(c),
        }
    }

    Ok(out)
}
