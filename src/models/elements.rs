//! # 元素周期表
//!
//! 元素符号与原子序数之间的转换，以及从 CIF 标签 / 类型符号中识别元素。
//!
//! ## 依赖关系
//! - 被 `parsers/`, `xas/`, `writers/` 使用
//! - 无外部模块依赖

use crate::error::{Result, XasError};

/// 元素符号，下标 + 1 即原子序数
const SYMBOLS: [&str; 118] = [
    "H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne", "Na", "Mg", "Al", "Si", "P", "S", "Cl",
    "Ar", "K", "Ca", "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn", "Ga", "Ge", "As",
    "Se", "Br", "Kr", "Rb", "Sr", "Y", "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd", "In",
    "Sn", "Sb", "Te", "I", "Xe", "Cs", "Ba", "La", "Ce", "Pr", "Nd", "Pm", "Sm", "Eu", "Gd", "Tb",
    "Dy", "Ho", "Er", "Tm", "Yb", "Lu", "Hf", "Ta", "W", "Re", "Os", "Ir", "Pt", "Au", "Hg", "Tl",
    "Pb", "Bi", "Po", "At", "Rn", "Fr", "Ra", "Ac", "Th", "Pa", "U", "Np", "Pu", "Am", "Cm", "Bk",
    "Cf", "Es", "Fm", "Md", "No", "Lr", "Rf", "Db", "Sg", "Bh", "Hs", "Mt", "Ds", "Rg", "Cn", "Nh",
    "Fl", "Mc", "Lv", "Ts", "Og",
];

/// 元素符号 -> 原子序数（大小写敏感，如 "Fe"）
pub fn atomic_number(symbol: &str) -> Option<u32> {
    SYMBOLS
        .iter()
        .position(|s| *s == symbol)
        .map(|i| i as u32 + 1)
}

/// 原子序数 -> 元素符号
pub fn symbol(z: u32) -> Option<&'static str> {
    if z == 0 {
        return None;
    }
    SYMBOLS.get(z as usize - 1).copied()
}

/// 规范化大小写后查找符号，返回静态符号
fn canonical(raw: &str) -> Option<&'static str> {
    let mut chars = raw.chars();
    let first = chars.next()?;
    let normalized: String = first
        .to_uppercase()
        .chain(chars.flat_map(|c| c.to_lowercase()))
        .collect();
    SYMBOLS.iter().find(|s| **s == normalized).copied()
}

/// 从 CIF 标签或类型符号中提取元素，如 "Fe3+" -> Fe, "O1" -> O, "Ow" -> O
///
/// 优先尝试两字母符号，失败时退回单字母。
pub fn element_from_label(label: &str) -> Option<&'static str> {
    let letters: String = label
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect();

    if letters.is_empty() {
        return None;
    }

    let bytes = letters.as_bytes();
    if bytes.len() >= 2 && bytes[1].is_ascii_lowercase() {
        if let Some(sym) = canonical(&letters[..2]) {
            return Some(sym);
        }
    }

    // "OW" 识别为 O；单字母不存在时再尝试大写两字母，如 "ZN"
    canonical(&letters[..1]).or_else(|| {
        if bytes.len() >= 2 {
            canonical(&letters[..2])
        } else {
            None
        }
    })
}

/// 解析吸收原子参数：接受原子序数 ("26") 或元素符号 ("Fe", "fe")
pub fn resolve_element(input: &str) -> Result<&'static str> {
    let trimmed = input.trim();
    if let Ok(z) = trimmed.parse::<u32>() {
        return symbol(z).ok_or_else(|| XasError::UnknownElement(trimmed.to_string()));
    }
    canonical(trimmed).ok_or_else(|| XasError::UnknownElement(trimmed.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_round_trip() {
        assert_eq!(atomic_number("Fe"), Some(26));
        assert_eq!(symbol(26), Some("Fe"));
        assert_eq!(symbol(118), Some("Og"));
        assert_eq!(symbol(0), None);
        assert_eq!(symbol(119), None);
        assert_eq!(atomic_number("fe"), None);
    }

    #[test]
    fn test_element_from_label() {
        assert_eq!(element_from_label("Fe3+"), Some("Fe"));
        assert_eq!(element_from_label("Fe1"), Some("Fe"));
        assert_eq!(element_from_label("O2-"), Some("O"));
        assert_eq!(element_from_label("OW"), Some("O"));
        assert_eq!(element_from_label("Cl"), Some("Cl"));
        assert_eq!(element_from_label("C12"), Some("C"));
        assert_eq!(element_from_label("ZN"), Some("Zn"));
        assert_eq!(element_from_label("123"), None);
    }

    #[test]
    fn test_resolve_element() {
        assert_eq!(resolve_element("26").unwrap(), "Fe");
        assert_eq!(resolve_element("ni").unwrap(), "Ni");
        assert_eq!(resolve_element(" Cu ").unwrap(), "Cu");
        assert!(matches!(
            resolve_element("Xx"),
            Err(XasError::UnknownElement(_))
        ));
    }
}
