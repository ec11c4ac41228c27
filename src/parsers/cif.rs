//! # CIF 格式解析器
//!
//! 解析晶体学信息文件 (Crystallographic Information File)，展开对称操作得到完整晶胞。
//!
//! ## 支持的内容
//! ```text
//! data_xxx
//! _cell_length_a      5.431(2)
//! _cell_angle_alpha   90
//! _chemical_formula_sum  'Fe2 O3'
//! loop_
//! _symmetry_equiv_pos_as_xyz
//!   'x, y, z'
//!   '-x+1/2, y, -z'
//! loop_
//! _atom_site_label
//! _atom_site_type_symbol
//! _atom_site_fract_x
//! _atom_site_fract_y
//! _atom_site_fract_z
//! _atom_site_occupancy
//!   Fe1 Fe3+ 0.0 0.0 0.3553 1.0
//! ```
//!
//! 只读取第一个数据块。同一位置上的不同元素合并为一个无序位点。
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs` 使用
//! - 使用 `models/structure.rs`, `models/elements.rs`
//! - 使用 `regex` 解析对称操作

use crate::error::{Result, XasError};
use crate::models::elements::element_from_label;
use crate::models::{Lattice, Periodicity, Site, Species, Structure};

use regex::Regex;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// 分数坐标中判定为同一位置的容差
const SITE_MERGE_TOL: f64 = 1e-3;

/// CIF 词法单元
#[derive(Debug, Clone, PartialEq)]
enum Token {
    Data(String),
    Loop,
    Tag(String),
    Value(String),
}

/// loop_ 块
#[derive(Debug, Default)]
struct CifLoop {
    tags: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl CifLoop {
    fn column(&self, tag: &str) -> Option<usize> {
        self.tags.iter().position(|t| t == tag)
    }

    fn has(&self, tag: &str) -> bool {
        self.column(tag).is_some()
    }
}

/// 一个数据块：单值项 + 若干 loop
#[derive(Debug, Default)]
struct CifBlock {
    items: HashMap<String, String>,
    loops: Vec<CifLoop>,
}

impl CifBlock {
    fn item(&self, tag: &str) -> Option<&str> {
        self.items.get(tag).map(|s| s.as_str())
    }

    fn find_loop(&self, tag: &str) -> Option<&CifLoop> {
        self.loops.iter().find(|l| l.has(tag))
    }
}

/// 对称操作：frac' = rot * frac + trans
#[derive(Debug, Clone, PartialEq)]
pub struct SymOp {
    pub rot: [[f64; 3]; 3],
    pub trans: [f64; 3],
}

impl SymOp {
    pub fn identity() -> Self {
        SymOp {
            rot: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
            trans: [0.0; 3],
        }
    }

    /// 作用于分数坐标并约化到 [0, 1)
    pub fn apply(&self, p: [f64; 3]) -> [f64; 3] {
        let mut out = [0.0; 3];
        for (i, row) in self.rot.iter().enumerate() {
            let v = row[0] * p[0] + row[1] * p[1] + row[2] * p[2] + self.trans[i];
            out[i] = wrap_unit(v);
        }
        out
    }
}

/// 约化到 [0, 1)，并把 1 - ε 归为 0
fn wrap_unit(v: f64) -> f64 {
    let w = v.rem_euclid(1.0);
    if (1.0 - w) < 1e-8 {
        0.0
    } else {
        w
    }
}

/// 解析 .cif 文件
pub fn parse_cif_file(path: &Path) -> Result<Structure> {
    let content = fs::read_to_string(path).map_err(|e| XasError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown");

    parse_cif_content(&content, name)
}

/// 从字符串内容解析 CIF
pub fn parse_cif_content(content: &str, name: &str) -> Result<Structure> {
    let parse_err = |reason: String| XasError::ParseError {
        format: "cif".to_string(),
        path: name.to_string(),
        reason,
    };

    let tokens = tokenize(content).map_err(parse_err)?;
    let block = build_block(tokens).map_err(parse_err)?;

    // 晶胞参数
    let length = |tag: &str| -> Result<f64> {
        block
            .item(tag)
            .and_then(parse_number)
            .ok_or_else(|| parse_err(format!("Missing or invalid {}", tag)))
    };
    let angle = |tag: &str| block.item(tag).and_then(parse_number).unwrap_or(90.0);

    let lattice = Lattice::from_parameters(
        length("_cell_length_a")?,
        length("_cell_length_b")?,
        length("_cell_length_c")?,
        angle("_cell_angle_alpha"),
        angle("_cell_angle_beta"),
        angle("_cell_angle_gamma"),
    );

    let ops = read_symmetry_ops(&block).map_err(parse_err)?;
    let asym = read_atom_sites(&block).map_err(parse_err)?;

    if asym.is_empty() {
        return Err(parse_err("No atom sites found".to_string()));
    }

    let sites = expand_sites(&asym, &ops, &lattice);

    let mut structure = Structure::new(name, lattice, sites, Periodicity::Periodic);
    structure.formula = block
        .item("_chemical_formula_sum")
        .map(|s| s.trim().to_string());
    structure.space_group = block
        .item("_space_group_name_h-m_alt")
        .or_else(|| block.item("_symmetry_space_group_name_h-m"))
        .map(|s| s.trim().to_string());

    log::debug!(
        "CIF '{}': {} asymmetric atoms, {} symmetry operations, {} sites",
        name,
        asym.len(),
        ops.len(),
        structure.sites.len()
    );

    Ok(structure)
}

/// CIF 头部信息（不展开结构）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CifSummary {
    pub formula: Option<String>,
    pub space_group: Option<String>,
}

/// 只读取化学式与空间群符号
pub fn read_cif_summary(path: &Path) -> Result<CifSummary> {
    let content = fs::read_to_string(path).map_err(|e| XasError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    let parse_err = |reason: String| XasError::ParseError {
        format: "cif".to_string(),
        path: path.display().to_string(),
        reason,
    };
    let block = build_block(tokenize(&content).map_err(parse_err)?).map_err(parse_err)?;

    Ok(CifSummary {
        formula: block
            .item("_chemical_formula_sum")
            .map(|s| s.trim().to_string()),
        space_group: block
            .item("_space_group_name_h-m_alt")
            .or_else(|| block.item("_symmetry_space_group_name_h-m"))
            .map(|s| s.trim().to_string()),
    })
}

// ─────────────────────────────────────────────────────────────
// 词法分析
// ─────────────────────────────────────────────────────────────

fn tokenize(content: &str) -> std::result::Result<Vec<Token>, String> {
    let mut tokens = Vec::new();
    let mut lines = content.lines().enumerate();

    while let Some((lineno, line)) = lines.next() {
        // 分号开头的多行文本字段
        if let Some(rest) = line.strip_prefix(';') {
            let mut text = rest.to_string();
            let mut closed = false;
            for (_, inner) in lines.by_ref() {
                if inner.starts_with(';') {
                    closed = true;
                    break;
                }
                text.push('\n');
                text.push_str(inner);
            }
            if !closed {
                return Err(format!("Unterminated text field starting at line {}", lineno + 1));
            }
            tokens.push(Token::Value(text.trim().to_string()));
            continue;
        }

        let chars: Vec<char> = line.chars().collect();
        let mut i = 0;
        while i < chars.len() {
            let c = chars[i];
            if c.is_whitespace() {
                i += 1;
                continue;
            }
            if c == '#' {
                break;
            }

            if c == '\'' || c == '"' {
                // 引号结束须紧跟空白或行尾
                let quote = c;
                let start = i + 1;
                let mut j = start;
                loop {
                    if j >= chars.len() {
                        return Err(format!("Unterminated quoted string at line {}", lineno + 1));
                    }
                    if chars[j] == quote && (j + 1 == chars.len() || chars[j + 1].is_whitespace())
                    {
                        break;
                    }
                    j += 1;
                }
                tokens.push(Token::Value(chars[start..j].iter().collect()));
                i = j + 1;
                continue;
            }

            let start = i;
            while i < chars.len() && !chars[i].is_whitespace() {
                i += 1;
            }
            let word: String = chars[start..i].iter().collect();
            tokens.push(classify(word));
        }
    }

    Ok(tokens)
}

fn classify(word: String) -> Token {
    let lower = word.to_lowercase();
    if lower == "loop_" {
        Token::Loop
    } else if let Some(name) = lower.strip_prefix("data_") {
        Token::Data(name.to_string())
    } else if word.starts_with('_') {
        Token::Tag(lower)
    } else {
        Token::Value(word)
    }
}

fn build_block(tokens: Vec<Token>) -> std::result::Result<CifBlock, String> {
    let mut block = CifBlock::default();
    let mut seen_data = false;
    let mut iter = tokens.into_iter().peekable();

    while let Some(token) = iter.next() {
        match token {
            Token::Data(_) => {
                if seen_data {
                    break;
                }
                seen_data = true;
            }
            Token::Tag(tag) => match iter.next() {
                Some(Token::Value(v)) => {
                    block.items.insert(tag, v);
                }
                _ => return Err(format!("Tag {} has no value", tag)),
            },
            Token::Loop => {
                let mut lp = CifLoop::default();
                while let Some(Token::Tag(_)) = iter.peek() {
                    if let Some(Token::Tag(t)) = iter.next() {
                        lp.tags.push(t);
                    }
                }
                if lp.tags.is_empty() {
                    return Err("loop_ without tags".to_string());
                }

                let mut values = Vec::new();
                while let Some(Token::Value(_)) = iter.peek() {
                    if let Some(Token::Value(v)) = iter.next() {
                        values.push(v);
                    }
                }
                if values.len() % lp.tags.len() != 0 {
                    return Err(format!(
                        "loop with {} tags has {} values",
                        lp.tags.len(),
                        values.len()
                    ));
                }
                lp.rows = values
                    .chunks(lp.tags.len())
                    .map(|chunk| chunk.to_vec())
                    .collect();
                block.loops.push(lp);
            }
            Token::Value(v) => return Err(format!("Unexpected value '{}'", v)),
        }
    }

    Ok(block)
}

// ─────────────────────────────────────────────────────────────
// 数值与对称操作
// ─────────────────────────────────────────────────────────────

/// 解析带不确定度的数值，如 "5.431(2)"；"." 与 "?" 视为缺失
fn parse_number(raw: &str) -> Option<f64> {
    let clean: String = raw.chars().take_while(|c| *c != '(').collect();
    let clean = clean.trim();
    if clean.is_empty() || clean == "." || clean == "?" {
        return None;
    }
    clean.parse().ok()
}

/// 解析对称操作字符串，如 "-x+1/2, y, -z"
pub fn parse_symop(op: &str) -> std::result::Result<SymOp, String> {
    let parts: Vec<String> = op
        .split(',')
        .map(|p| p.replace(' ', "").to_lowercase())
        .collect();
    if parts.len() != 3 {
        return Err(format!("Invalid symmetry operation '{}'", op));
    }

    let term_re = Regex::new(r"([+-]?)(\d*\.?\d*(?:/\d+)?)\*?([xyz]?)")
        .map_err(|e| e.to_string())?;

    let mut rot = [[0.0; 3]; 3];
    let mut trans = [0.0; 3];

    for (row, part) in parts.iter().enumerate() {
        if part.is_empty() {
            return Err(format!("Empty component in symmetry operation '{}'", op));
        }
        let mut consumed = 0;
        for cap in term_re.captures_iter(part) {
            let whole = cap.get(0).map(|m| m.as_str()).unwrap_or("");
            if whole.is_empty() {
                continue;
            }
            consumed += whole.len();

            let sign = if &cap[1] == "-" { -1.0 } else { 1.0 };
            let number = &cap[2];
            let axis = &cap[3];

            let value = if number.is_empty() {
                if axis.is_empty() {
                    return Err(format!("Invalid term in symmetry operation '{}'", op));
                }
                1.0
            } else {
                parse_fraction(number)
                    .ok_or_else(|| format!("Invalid number '{}' in '{}'", number, op))?
            };

            match axis {
                "x" => rot[row][0] += sign * value,
                "y" => rot[row][1] += sign * value,
                "z" => rot[row][2] += sign * value,
                _ => trans[row] += sign * value,
            }
        }
        if consumed != part.len() {
            return Err(format!("Invalid symmetry operation '{}'", op));
        }
    }

    Ok(SymOp { rot, trans })
}

fn parse_fraction(s: &str) -> Option<f64> {
    match s.split_once('/') {
        Some((num, den)) => {
            let num: f64 = num.parse().ok()?;
            let den: f64 = den.parse().ok()?;
            if den == 0.0 {
                None
            } else {
                Some(num / den)
            }
        }
        None => s.parse().ok(),
    }
}

fn read_symmetry_ops(block: &CifBlock) -> std::result::Result<Vec<SymOp>, String> {
    const OP_TAGS: [&str; 2] = [
        "_space_group_symop_operation_xyz",
        "_symmetry_equiv_pos_as_xyz",
    ];

    for tag in OP_TAGS {
        if let Some(lp) = block.find_loop(tag) {
            let col = lp.column(tag).unwrap_or(0);
            return lp.rows.iter().map(|row| parse_symop(&row[col])).collect();
        }
        if let Some(single) = block.item(tag) {
            return Ok(vec![parse_symop(single)?]);
        }
    }

    Ok(vec![SymOp::identity()])
}

// ─────────────────────────────────────────────────────────────
// 原子位点
// ─────────────────────────────────────────────────────────────

/// 不对称单元中的原子
#[derive(Debug, Clone)]
struct AsymAtom {
    label: String,
    element: String,
    frac: [f64; 3],
    occupancy: f64,
}

fn read_atom_sites(block: &CifBlock) -> std::result::Result<Vec<AsymAtom>, String> {
    let lp = match block.find_loop("_atom_site_fract_x") {
        Some(lp) => lp,
        None => return Err("Missing _atom_site_fract_x loop".to_string()),
    };

    let col = |tag: &str| lp.column(tag);
    let (cx, cy, cz) = match (
        col("_atom_site_fract_x"),
        col("_atom_site_fract_y"),
        col("_atom_site_fract_z"),
    ) {
        (Some(x), Some(y), Some(z)) => (x, y, z),
        _ => return Err("Incomplete fractional coordinate columns".to_string()),
    };
    let c_label = col("_atom_site_label");
    let c_type = col("_atom_site_type_symbol");
    let c_occ = col("_atom_site_occupancy");

    let mut atoms = Vec::new();
    for row in &lp.rows {
        let label = c_label.map(|c| row[c].clone()).unwrap_or_default();
        let symbol_source = c_type.map(|c| row[c].as_str()).unwrap_or(label.as_str());
        let element = element_from_label(symbol_source)
            .or_else(|| element_from_label(&label))
            .ok_or_else(|| format!("Cannot determine element for atom '{}'", symbol_source))?;

        let coord = |c: usize| {
            parse_number(&row[c]).ok_or_else(|| format!("Invalid coordinate '{}'", row[c]))
        };
        let frac = [coord(cx)?, coord(cy)?, coord(cz)?];
        let occupancy = c_occ.and_then(|c| parse_number(&row[c])).unwrap_or(1.0);

        atoms.push(AsymAtom {
            label: if label.is_empty() {
                element.to_string()
            } else {
                label
            },
            element: element.to_string(),
            frac,
            occupancy,
        });
    }

    Ok(atoms)
}

fn same_position(a: [f64; 3], b: [f64; 3]) -> bool {
    (0..3).all(|k| {
        let d = a[k] - b[k];
        (d - d.round()).abs() < SITE_MERGE_TOL
    })
}

/// 展开对称操作，合并重合位点
fn expand_sites(asym: &[AsymAtom], ops: &[SymOp], lattice: &Lattice) -> Vec<Site> {
    let mut sites: Vec<Site> = Vec::new();

    for atom in asym {
        let species = Species::new(vec![(atom.element.clone(), atom.occupancy)]);
        let mut orbit: Vec<[f64; 3]> = Vec::new();

        for op in ops {
            let pos = op.apply(atom.frac);
            if orbit.iter().any(|p| same_position(*p, pos)) {
                continue;
            }
            orbit.push(pos);

            match sites.iter_mut().find(|s| same_position(s.frac, pos)) {
                Some(existing) => {
                    // 同一位置的多行（含不同价态的同种元素）占据率相加
                    existing.species.merge(&species);
                    let total: f64 = existing.species.occupancies.iter().map(|(_, o)| o).sum();
                    if total > 1.0 + 1e-3 {
                        log::warn!(
                            "Total occupancy {:.3} > 1 at {:?} ({})",
                            total,
                            pos,
                            existing.species
                        );
                    }
                }
                None => {
                    sites.push(Site::new(species.clone(), pos, lattice).with_label(&atom.label));
                }
            }
        }
    }

    sites
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const NACL_CIF: &str = r#"
data_NaCl
_chemical_formula_sum 'Na Cl'
_space_group_name_H-M_alt 'F m -3 m'
_cell_length_a 5.6402(3)
_cell_length_b 5.6402(3)
_cell_length_c 5.6402(3)
_cell_angle_alpha 90
_cell_angle_beta 90
_cell_angle_gamma 90
loop_
_space_group_symop_operation_xyz
'x, y, z'
'x, y+1/2, z+1/2'
'x+1/2, y, z+1/2'
'x+1/2, y+1/2, z'
loop_
_atom_site_label
_atom_site_type_symbol
_atom_site_fract_x
_atom_site_fract_y
_atom_site_fract_z
_atom_site_occupancy
Na1 Na+ 0.0 0.0 0.0 1.0
Cl1 Cl- 0.5 0.5 0.5 1.0
"#;

    #[test]
    fn test_parse_symop() {
        let op = parse_symop("-x+1/2, y-x, -z+0.25").unwrap();
        assert_eq!(op.rot[0], [-1.0, 0.0, 0.0]);
        assert_eq!(op.rot[1], [-1.0, 1.0, 0.0]);
        assert_eq!(op.rot[2], [0.0, 0.0, -1.0]);
        assert_relative_eq!(op.trans[0], 0.5);
        assert_relative_eq!(op.trans[2], 0.25);

        let p = op.apply([0.1, 0.2, 0.3]);
        assert_relative_eq!(p[0], 0.4, epsilon = 1e-12);
        assert_relative_eq!(p[1], 0.1, epsilon = 1e-12);
        assert_relative_eq!(p[2], 0.95, epsilon = 1e-12);
    }

    #[test]
    fn test_parse_symop_invalid() {
        assert!(parse_symop("x, y").is_err());
        assert!(parse_symop("x, y, w").is_err());
    }

    #[test]
    fn test_parse_nacl_expands_fcc() {
        let s = parse_cif_content(NACL_CIF, "NaCl").unwrap();
        assert_eq!(s.sites.len(), 8);
        assert_eq!(s.sites.iter().filter(|x| x.species.primary() == "Na").count(), 4);
        assert_eq!(s.formula.as_deref(), Some("Na Cl"));
        assert_eq!(s.space_group.as_deref(), Some("F m -3 m"));
        assert!(s.is_periodic());
        assert!(s.is_ordered());

        let (a, _, _, _, _, _) = s.lattice.parameters();
        assert_relative_eq!(a, 5.6402, epsilon = 1e-9);
        assert_eq!(s.sites[0].label.as_deref(), Some("Na1"));
    }

    #[test]
    fn test_parse_without_symmetry_loop() {
        let cif = r#"
data_Fe
_cell_length_a 2.87
_cell_length_b 2.87
_cell_length_c 2.87
loop_
_atom_site_label
_atom_site_fract_x
_atom_site_fract_y
_atom_site_fract_z
Fe1 0 0 0
Fe2 0.5 0.5 0.5
"#;
        let s = parse_cif_content(cif, "Fe").unwrap();
        assert_eq!(s.sites.len(), 2);
        assert_relative_eq!(s.sites[1].cart[0], 1.435, epsilon = 1e-9);
    }

    #[test]
    fn test_partial_occupancy_merged() {
        let cif = r#"
data_FeNi
_cell_length_a 3.6
_cell_length_b 3.6
_cell_length_c 3.6
_cell_angle_alpha 90
_cell_angle_beta 90
_cell_angle_gamma 90
loop_
_atom_site_label
_atom_site_type_symbol
_atom_site_fract_x
_atom_site_fract_y
_atom_site_fract_z
_atom_site_occupancy
Fe1 Fe 0 0 0 0.5
Ni1 Ni 0 0 0 0.5
O1 O 0.5 0.5 0.5 1
"#;
        let s = parse_cif_content(cif, "FeNi").unwrap();
        assert_eq!(s.sites.len(), 2);
        assert!(!s.is_ordered());
        assert_eq!(s.sites[0].species.to_string(), "Fe:0.500, Ni:0.500");
        assert_eq!(s.disordered_species(), vec!["Fe:0.500, Ni:0.500"]);
    }

    #[test]
    fn test_mixed_valence_rows_sum_occupancy() {
        let cif = r#"
data_Fe3O4
_cell_length_a 8.39
_cell_length_b 8.39
_cell_length_c 8.39
_cell_angle_alpha 90
_cell_angle_beta 90
_cell_angle_gamma 90
loop_
_atom_site_label
_atom_site_type_symbol
_atom_site_fract_x
_atom_site_fract_y
_atom_site_fract_z
_atom_site_occupancy
Fe1 Fe2+ 0 0 0 0.5
Fe2 Fe3+ 0 0 0 0.5
O1 O2- 0.25 0.25 0.25 1
"#;
        let s = parse_cif_content(cif, "Fe3O4").unwrap();
        assert_eq!(s.sites.len(), 2);
        assert_eq!(s.sites[0].species.to_string(), "Fe");
        assert!(s.sites[0].species.is_ordered());
        assert!(s.is_ordered());
        assert_relative_eq!(s.sites[0].species.occupancy_of("Fe").unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_text_field_and_comments() {
        let cif = r#"
data_x
# comment line
_publ_section_title
;
 A multi-line
 title
;
_cell_length_a 4.0 # trailing comment
_cell_length_b 4.0
_cell_length_c 4.0
loop_
_atom_site_label
_atom_site_fract_x
_atom_site_fract_y
_atom_site_fract_z
Cu1 0.0 0.0 0.0
"#;
        let s = parse_cif_content(cif, "x").unwrap();
        assert_eq!(s.sites.len(), 1);
        assert_eq!(s.sites[0].species.primary(), "Cu");
    }

    #[test]
    fn test_missing_cell_is_error() {
        let cif = "data_x\nloop_\n_atom_site_label\n_atom_site_fract_x\n_atom_site_fract_y\n_atom_site_fract_z\nCu1 0 0 0\n";
        assert!(matches!(
            parse_cif_content(cif, "x"),
            Err(XasError::ParseError { .. })
        ));
    }

    #[test]
    fn test_loop_value_count_mismatch() {
        let cif = "data_x\n_cell_length_a 1\n_cell_length_b 1\n_cell_length_c 1\nloop_\n_atom_site_label\n_atom_site_fract_x\n_atom_site_fract_y\n_atom_site_fract_z\nCu1 0 0\n";
        assert!(parse_cif_content(cif, "x").is_err());
    }

    #[test]
    fn test_read_summary() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("NaCl.cif");
        std::fs::write(&path, NACL_CIF).unwrap();

        let summary = read_cif_summary(&path).unwrap();
        assert_eq!(summary.formula.as_deref(), Some("Na Cl"));
        assert_eq!(summary.space_group.as_deref(), Some("F m -3 m"));
    }
}
