//! # FDMNES 输入文件生成
//!
//! 晶体：写入空间群、输入晶胞的晶格参数和每个对称轨道的代表位点，
//! 用 `absorber` 关键字指向吸收位点所在轨道。
//! 分子：写入吸收原子周围半径内的团簇（吸收原子位于原点）。
//!
//! 写出输入文件后，将其路径加入同一父目录下的 `fdmfile.txt`。
//!
//! ## 依赖关系
//! - 被 `commands/fdmnes.rs` 使用
//! - 使用 `xas/session.rs`, `writers/template.rs`, `writers/manifest.rs`

use super::manifest::{self, MANIFEST_NAME};
use super::template::{self, Replacements, FDMNES_TEMPLATE};
use super::{default_output_dir, ensure_dir, timestamp, write_text};
use crate::error::{Result, XasError};
use crate::models::elements::atomic_number;
use crate::xas::SiteSession;

use std::path::{Path, PathBuf};

/// 默认任务名
pub const DEFAULT_JOB_NAME: &str = "job_inp";

/// FDMNES 输入选项
#[derive(Debug, Clone)]
pub struct FdmnesOptions {
    /// 计算半径 (Å)
    pub radius: f64,

    /// 是否使用 Green 函数方法（`green` 关键字）
    pub green: bool,

    /// 任务名，输入文件为 `<name>.txt`
    pub name: String,

    /// 清单所在目录，None 时使用临时目录
    pub parent_dir: Option<PathBuf>,

    /// 输入文件目录，None 时与 parent_dir 相同
    pub output_dir: Option<PathBuf>,

    /// 外部模板
    pub template: Option<PathBuf>,
}

impl Default for FdmnesOptions {
    fn default() -> Self {
        FdmnesOptions {
            radius: 6.0,
            green: true,
            name: DEFAULT_JOB_NAME.to_string(),
            parent_dir: None,
            output_dir: None,
            template: None,
        }
    }
}

/// 写出结果
#[derive(Debug, Clone)]
pub struct FdmnesOutput {
    pub input_path: PathBuf,
    pub manifest_path: PathBuf,
}

/// 渲染 FDMNES 输入文本
pub fn render_fdmnes(session: &SiteSession, options: &FdmnesOptions, template: &str) -> Result<String> {
    let mut values = Replacements::new();
    let structure = session.structure();

    let kind = if session.is_molecular() {
        fill_molecule(session, options.radius, &mut values)?;
        "xyz"
    } else {
        fill_crystal(session, &mut values)?;
        "cif"
    };

    values
        .set(
            "comment",
            format!(
                "! {} file name: {}\n! creation date:{}",
                kind,
                structure.name,
                timestamp()
            ),
        )
        .set("jobname", &options.name)
        .set("radius", options.radius)
        .set("method", if options.green { "green" } else { "" });

    template::render(template, &values)
}

fn fill_crystal(session: &SiteSession, values: &mut Replacements) -> Result<()> {
    let structure = session.structure();
    let analysis = session
        .symmetry()
        .ok_or_else(|| XasError::Symmetry("No symmetry data for crystal".to_string()))?;
    let selected = session.selected_site();

    if !selected.is_fully_occupied() {
        log::warn!(
            "Selected site {} ({}) is not fully occupied",
            selected.index,
            selected.species
        );
    }

    // FDMNES 不识别 2 号空间群
    let group = if analysis.number == 2 {
        "P-1".to_string()
    } else {
        analysis.number.to_string()
    };

    let (a, b, c, alpha, beta, gamma) = structure.lattice.parameters();
    let lattice = format!(
        "{:<12.8} {:12.8} {:12.8} {:12.8} {:12.8} {:12.8}",
        a, b, c, alpha, beta, gamma
    );

    let ordered = structure.is_ordered();
    let mut sites = String::new();
    for orbit in &analysis.orbits {
        let site = &structure.sites[orbit.representative];
        let [x, y, z] = site.frac;
        if ordered {
            let el = site.species.primary();
            sites.push_str(&format!(
                "\n{:>2} {:12.8} {:12.8} {:12.8} {:>4}",
                z_of(el)?,
                x,
                y,
                z,
                site.species.to_string()
            ));
        } else {
            for (el, occ) in &site.species.occupancies {
                sites.push_str(&format!(
                    "\n{:>2} {:12.8} {:12.8} {:12.8} {:?} {:>4}",
                    z_of(el)?,
                    x,
                    y,
                    z,
                    occ,
                    el
                ));
            }
        }
    }

    values
        .set("crystal", "crystal")
        .set("occupancy", if ordered { "" } else { "occupancy" })
        .set("group", format!("spgroup\n{}", group))
        .set("lattice", lattice)
        .set("sites", sites)
        .set("absorber", format!("absorber\n{}", selected.orbit + 1));
    Ok(())
}

fn fill_molecule(session: &SiteSession, radius: f64, values: &mut Replacements) -> Result<()> {
    let cluster = session.cluster(radius)?;

    let mut sites = String::new();
    for atom in &cluster {
        let el = atom.species.primary();
        let [x, y, z] = atom.position;
        sites.push_str(&format!(
            "\n{:>2} {:12.8} {:12.8} {:12.8} {}",
            z_of(el)?,
            x,
            y,
            z,
            el
        ));
    }

    let absorber = cluster
        .iter()
        .position(|a| a.species.is_absorber())
        .map(|i| i + 1)
        .unwrap_or(1);

    values
        .set("crystal", "molecule")
        .set("occupancy", "")
        .set("group", "")
        .set(
            "lattice",
            format!(
                "{:<12.8} {:12.8} {:12.8} {:12.8} {:12.8} {:12.8}",
                1.0, 1.0, 1.0, 90.0, 90.0, 90.0
            ),
        )
        .set("sites", sites)
        .set("absorber", format!("absorber\n{}", absorber));
    Ok(())
}

fn z_of(element: &str) -> Result<u32> {
    atomic_number(element).ok_or_else(|| XasError::UnknownElement(element.to_string()))
}

/// 写出 FDMNES 输入文件并更新清单
pub fn write_fdmnes(session: &SiteSession, options: &FdmnesOptions) -> Result<FdmnesOutput> {
    let template = template::load_template(options.template.as_deref(), FDMNES_TEMPLATE)?;
    let content = render_fdmnes(session, options, &template)?;

    let parent = options.parent_dir.clone().unwrap_or_else(|| {
        default_output_dir(
            "fdmnes",
            &session.structure().name,
            session.absorber(),
            session.selected_index(),
        )
    });
    let output_dir = options.output_dir.clone().unwrap_or_else(|| parent.clone());

    ensure_dir(&parent)?;
    let input_path = output_dir.join(format!("{}.txt", options.name));
    write_text(&input_path, &content)?;

    let manifest_path = parent.join(MANIFEST_NAME);
    manifest::append_entry(&manifest_path, &manifest_entry(&input_path))?;

    log::info!("Written FDMNES input -> {}", input_path.display());
    log::info!("Updated FDMNES manifest -> {}", manifest_path.display());

    Ok(FdmnesOutput {
        input_path,
        manifest_path,
    })
}

fn manifest_entry(path: &Path) -> String {
    path.display().to_string()
}
