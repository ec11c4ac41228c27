//! # FEFF 输入文件生成
//!
//! 根据吸收原子周围的团簇生成 `feff.inp`：
//! - POTENTIALS：ipot 0 为吸收原子，其余元素按在团簇中首次出现的顺序编号
//! - ATOMS：相对吸收原子的笛卡尔坐标、ipot、标签与距离
//!
//! 存在部分占据时，每个团簇原子按占据率抽样一次得到写入的元素。
//!
//! ## 依赖关系
//! - 被 `commands/feff.rs` 使用
//! - 使用 `xas/session.rs`, `xas/occupancy.rs`, `writers/template.rs`

use super::template::{self, Replacements, FEFF_TEMPLATE};
use super::{default_output_dir, timestamp, write_text};
use crate::error::{Result, XasError};
use crate::models::elements::atomic_number;
use crate::models::{ClusterAtom, ClusterSpecies};
use crate::xas::{OccupancySampler, SiteSession};

use std::path::PathBuf;

/// SIG2 未指定时写入（并注释掉）的默认值
pub const DEFAULT_SIG2: f64 = 0.005;

/// FEFF 输入选项
#[derive(Debug, Clone)]
pub struct FeffOptions {
    /// RPATH 半径 (Å)
    pub radius: f64,

    /// 吸收边，如 "K", "L3"
    pub edge: String,

    /// 放在 SCF / FMS 行首的注释符，默认 "*"（EXAFS 计算不需要这两张卡）
    pub feff_comment: String,

    /// SIG2 (Å²)，None 时该行被注释
    pub sig2: Option<f64>,

    /// DEBYE (温度, Debye 温度)，None 时该行被注释
    pub debye: Option<(f64, f64)>,

    /// 部分占据抽样的随机种子
    pub seed: Option<u64>,

    /// 输出目录，None 时使用临时目录
    pub parent_dir: Option<PathBuf>,

    /// 外部模板
    pub template: Option<PathBuf>,
}

impl Default for FeffOptions {
    fn default() -> Self {
        FeffOptions {
            radius: 6.0,
            edge: "K".to_string(),
            feff_comment: "*".to_string(),
            sig2: None,
            debye: None,
            seed: None,
            parent_dir: None,
            template: None,
        }
    }
}

/// 元素 -> ipot 的映射，保持编号顺序
#[derive(Debug, Clone)]
pub struct PotentialTable {
    absorber: String,
    entries: Vec<(String, u32)>,
}

impl PotentialTable {
    /// 按团簇中首次出现的顺序为元素编号；无序位点的每个元素都参与编号
    pub fn from_cluster(absorber: &str, cluster: &[ClusterAtom]) -> Result<Self> {
        let mut entries: Vec<(String, u32)> = Vec::new();
        for atom in cluster {
            let elements: Vec<&str> = match &atom.species {
                ClusterSpecies::Absorber(_) => continue,
                ClusterSpecies::Ordered(el) => vec![el.as_str()],
                ClusterSpecies::Disordered(sp) => sp.elements().collect(),
            };
            for el in elements {
                if !entries.iter().any(|(e, _)| e == el) {
                    let z = atomic_number(el).ok_or_else(|| XasError::UnknownElement(el.to_string()))?;
                    entries.push((el.to_string(), z));
                }
            }
        }

        atomic_number(absorber).ok_or_else(|| XasError::UnknownElement(absorber.to_string()))?;
        Ok(PotentialTable {
            absorber: absorber.to_string(),
            entries,
        })
    }

    /// 元素的 ipot（吸收原子以外，从 1 开始）
    pub fn ipot(&self, element: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|(e, _)| e == element)
            .map(|i| i + 1)
    }

    /// POTENTIALS 卡片内容
    pub fn render(&self) -> String {
        let mut out = String::from("* ipot  Z   tag [lmax1 lmax2 xnatph sphinph]");
        let z_abs = atomic_number(&self.absorber).unwrap_or(0);
        out.push_str(&format!(
            "\n{:>5} {:>3} {:>5}",
            0,
            z_abs,
            format!("{}(abs)", self.absorber)
        ));
        for (i, (el, z)) in self.entries.iter().enumerate() {
            out.push_str(&format!("\n{:>5} {:>3} {:>5}", i + 1, z, el));
        }
        out
    }
}

/// 渲染 ATOMS 卡片
///
/// 有序结构的每行以 `*1` 结尾；存在部分占据时写入抽样结果及完整的占据分布。
pub fn render_atoms(
    cluster: &[ClusterAtom],
    potentials: &PotentialTable,
    ordered: bool,
    absorber_species: &str,
    sampler: &mut OccupancySampler,
) -> Result<String> {
    let mut out = String::from("*   x          y          z     ipot   tag    distance   occupancy");

    for atom in cluster {
        let [x, y, z] = atom.position;
        let (ipot, tag) = match &atom.species {
            ClusterSpecies::Absorber(el) => (0, format!("{}(abs)", el)),
            ClusterSpecies::Ordered(el) => (lookup(potentials, el)?, el.clone()),
            ClusterSpecies::Disordered(sp) => {
                let el = sampler.draw(sp);
                (lookup(potentials, el)?, el.to_string())
            }
        };

        if ordered {
            out.push_str(&format!(
                "\n{:10.6} {:10.6} {:10.6} {}  {:>5} {:10.5}         *1 ",
                x, y, z, ipot, tag, atom.distance
            ));
        } else {
            let distribution = match &atom.species {
                ClusterSpecies::Absorber(_) => absorber_species.to_string(),
                ClusterSpecies::Ordered(el) => el.clone(),
                ClusterSpecies::Disordered(sp) => sp.to_string(),
            };
            out.push_str(&format!(
                "\n{:10.6} {:10.6} {:10.6} {}  {:>5} {:10.5} *{}",
                x, y, z, ipot, tag, atom.distance, distribution
            ));
        }
    }

    Ok(out)
}

fn lookup(potentials: &PotentialTable, element: &str) -> Result<usize> {
    potentials
        .ipot(element)
        .ok_or_else(|| XasError::Other(format!("No potential assigned to element {}", element)))
}

/// 渲染 FEFF 输入文本
pub fn render_feff(session: &SiteSession, options: &FeffOptions, template: &str) -> Result<String> {
    let cluster = session.cluster(options.radius)?;
    let potentials = PotentialTable::from_cluster(session.absorber(), &cluster)?;
    let mut sampler = OccupancySampler::new(options.seed);

    let atoms = render_atoms(
        &cluster,
        &potentials,
        session.structure().is_ordered(),
        &session.selected_site().species,
        &mut sampler,
    )?;

    let (use_sig2, sig2) = match options.sig2 {
        Some(v) => ("", v),
        None => ("*", DEFAULT_SIG2),
    };
    let (use_debye, (temperature, debye_temperature)) = match options.debye {
        Some(d) => ("", d),
        None => ("*", (0.0, 0.0)),
    };

    let mut values = Replacements::new();
    values
        .set(
            "title",
            format!(
                "TITLE {}\nTITLE {}\nTITLE site {}",
                session.structure().name,
                timestamp(),
                session.selected_index()
            ),
        )
        .set("feff_comment", &options.feff_comment)
        .set("edge", &options.edge)
        .set("radius", options.radius)
        .set("use_sig2", use_sig2)
        .set("sig2", sig2)
        .set("use_debye", use_debye)
        .set("temperature", temperature)
        .set("debye_temperature", debye_temperature)
        .set("potentials", potentials.render())
        .set("atoms", atoms);

    template::render(template, &values)
}

/// 写出 `feff.inp`，返回文件路径
pub fn write_feff(session: &SiteSession, options: &FeffOptions) -> Result<PathBuf> {
    let template = template::load_template(options.template.as_deref(), FEFF_TEMPLATE)?;
    let content = render_feff(session, options, &template)?;

    let parent = options.parent_dir.clone().unwrap_or_else(|| {
        default_output_dir(
            "feff",
            &session.structure().name,
            session.absorber(),
            session.selected_index(),
        )
    });

    let path = parent.join("feff.inp");
    write_text(&path, &content)?;
    log::info!("Written FEFF input -> {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Lattice, Periodicity, Site, Species, Structure};
    use crate::parsers::StructureInput;
    use tempfile::tempdir;

    fn feo_session() -> SiteSession {
        // 简单立方 FeO：Fe 在原点，O 在棱中点
        let lattice = Lattice::from_parameters(4.0, 4.0, 4.0, 90.0, 90.0, 90.0);
        let sites = vec![
            Site::new(Species::element("Fe"), [0.0, 0.0, 0.0], &lattice),
            Site::new(Species::element("O"), [0.5, 0.0, 0.0], &lattice),
            Site::new(Species::element("O"), [0.0, 0.5, 0.0], &lattice),
            Site::new(Species::element("O"), [0.0, 0.0, 0.5], &lattice),
        ];
        let s = Structure::new("FeO3", lattice, sites, Periodicity::Periodic);
        SiteSession::from_input(StructureInput::Crystal(s), "Fe").unwrap()
    }

    #[test]
    fn test_potentials_first_appearance() {
        let session = feo_session();
        let cluster = session.cluster(4.5).unwrap();
        let pots = PotentialTable::from_cluster("Fe", &cluster).unwrap();

        assert_eq!(pots.ipot("O"), Some(1));
        assert_eq!(pots.ipot("Fe"), Some(2));
        assert_eq!(
            pots.render(),
            "* ipot  Z   tag [lmax1 lmax2 xnatph sphinph]\n    0  26 Fe(abs)\n    1   8     O\n    2  26    Fe"
        );
    }

    #[test]
    fn test_render_ordered() {
        let session = feo_session();
        let options = FeffOptions {
            radius: 2.5,
            ..FeffOptions::default()
        };
        let text = render_feff(&session, &options, FEFF_TEMPLATE).unwrap();

        assert!(text.contains("TITLE FeO3\nTITLE "));
        assert!(text.contains("TITLE site 0"));
        assert!(text.contains(" EDGE      K"));
        assert!(text.contains("*SIG2      0.005"));
        assert!(text.contains("*DEBYE     0 0"));
        assert!(text.contains("*SCF"));
        assert!(text.contains("  0.000000   0.000000   0.000000 0  Fe(abs)    0.00000         *1 "));
        assert!(text.contains("  2.000000   0.000000   0.000000 1      O    2.00000         *1 "));
        // 吸收原子 + 6 个 O
        let atom_lines = text.lines().filter(|l| l.ends_with("*1 ")).count();
        assert_eq!(atom_lines, 7);
    }

    #[test]
    fn test_sig2_and_debye_enabled() {
        let session = feo_session();
        let options = FeffOptions {
            radius: 2.5,
            sig2: Some(0.003),
            debye: Some((300.0, 450.0)),
            feff_comment: String::new(),
            ..FeffOptions::default()
        };
        let text = render_feff(&session, &options, FEFF_TEMPLATE).unwrap();
        assert!(text.contains("\nSIG2      0.003"));
        assert!(text.contains("\nDEBYE     300 450"));
        assert!(text.contains("\nSCF "));
    }

    #[test]
    fn test_disordered_draws_are_seeded() {
        let lattice = Lattice::from_parameters(3.0, 3.0, 3.0, 90.0, 90.0, 90.0);
        let mixed = Species::new(vec![("Fe".to_string(), 0.5), ("Ni".to_string(), 0.5)]);
        let sites = vec![
            Site::new(Species::element("O"), [0.0, 0.0, 0.0], &lattice),
            Site::new(mixed, [0.5, 0.5, 0.5], &lattice),
        ];
        let s = Structure::new("FeNiO", lattice, sites, Periodicity::Periodic);
        let session = SiteSession::from_input(StructureInput::Crystal(s), "O").unwrap();

        let options = FeffOptions {
            radius: 2.7,
            seed: Some(11),
            ..FeffOptions::default()
        };
        let a = render_feff(&session, &options, FEFF_TEMPLATE).unwrap();
        let b = render_feff(&session, &options, FEFF_TEMPLATE).unwrap();

        let atoms = |t: &str| -> Vec<String> {
            t.lines()
                .filter(|l| l.contains("*Fe:0.500, Ni:0.500"))
                .map(str::to_string)
                .collect()
        };
        assert_eq!(atoms(&a).len(), 8);
        assert_eq!(atoms(&a), atoms(&b));
        assert!(a.contains("    1  26    Fe\n    2  28    Ni"));
        assert!(atoms(&a)
            .iter()
            .all(|l| l.contains(" 1     Fe ") || l.contains(" 2     Ni ")));
    }

    #[test]
    fn test_write_feff_file() {
        let dir = tempdir().unwrap();
        let session = feo_session();
        let options = FeffOptions {
            parent_dir: Some(dir.path().join("feff")),
            ..FeffOptions::default()
        };
        let path = write_feff(&session, &options).unwrap();
        assert_eq!(path, dir.path().join("feff").join("feff.inp"));
        assert!(path.is_file());
    }
}
