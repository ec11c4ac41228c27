//! # 吸收位点会话
//!
//! 持有读入的结构、吸收元素、当前帧与当前位点，串联位点枚举和团簇提取。
//! 每条命令创建一个会话，不存在全局状态。
//!
//! ## 依赖关系
//! - 被 `commands/` 中的结构类命令使用
//! - 使用 `parsers/`, `xas/symmetry.rs`, `xas/sites.rs`, `xas/cluster.rs`

use super::cluster::extract_cluster;
use super::sites::{enumerate_with_symmetry, select_site};
use super::symmetry::SymmetryAnalysis;
use crate::error::{Result, XasError};
use crate::models::elements::resolve_element;
use crate::models::{AbsorbingSite, ClusterAtom, Structure};
use crate::parsers::{parse_structure_file, StructureInput};

use std::path::Path;

/// 一个结构文件上的吸收位点会话
#[derive(Debug, Clone)]
pub struct SiteSession {
    input: StructureInput,
    absorber: &'static str,
    frame: usize,
    structure: Structure,
    symmetry: Option<SymmetryAnalysis>,
    sites: Vec<AbsorbingSite>,
    selected: usize,
}

impl SiteSession {
    /// 读入结构文件并枚举吸收位点
    ///
    /// `absorber` 可以是元素符号或原子序数。
    pub fn open(path: &Path, absorber: &str) -> Result<Self> {
        let input = parse_structure_file(path)?;
        Self::from_input(input, absorber)
    }

    pub fn from_input(input: StructureInput, absorber: &str) -> Result<Self> {
        let absorber = resolve_element(absorber)?;
        let structure = structure_for_frame(&input, 0)?;
        let (symmetry, sites) = enumerate_with_symmetry(&structure, absorber)?;

        log::info!(
            "{}: {} frame(s), {} candidate {} site(s)",
            structure.name,
            input.frame_count(),
            sites.len(),
            absorber
        );

        Ok(SiteSession {
            input,
            absorber,
            frame: 0,
            structure,
            symmetry,
            sites,
            selected: 0,
        })
    }

    /// 切换到分子轨迹中的另一帧，重新枚举位点并选中第一个
    pub fn set_frame(&mut self, frame: usize) -> Result<()> {
        if let StructureInput::Crystal(_) = self.input {
            log::error!("{} is a single-frame crystal, cannot select a frame", self.structure.name);
            return Err(XasError::InvalidArgument(
                "Frame selection is only available for XYZ trajectories".to_string(),
            ));
        }

        let structure = structure_for_frame(&self.input, frame)?;
        let (symmetry, sites) = enumerate_with_symmetry(&structure, self.absorber)?;

        log::debug!("Selected frame {} ({} sites)", frame, sites.len());
        self.frame = frame;
        self.structure = structure;
        self.symmetry = symmetry;
        self.sites = sites;
        self.selected = 0;
        Ok(())
    }

    pub fn set_site(&mut self, index: usize) -> Result<()> {
        select_site(&self.sites, index)?;
        log::debug!("Selected site {}: {}", index, self.sites[index].species);
        self.selected = index;
        Ok(())
    }

    pub fn sites(&self) -> &[AbsorbingSite] {
        &self.sites
    }

    pub fn selected_site(&self) -> &AbsorbingSite {
        &self.sites[self.selected]
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    /// 当前位点周围半径内的团簇
    pub fn cluster(&self, radius: f64) -> Result<Vec<ClusterAtom>> {
        extract_cluster(
            &self.structure,
            self.selected_site().structure_index,
            self.absorber,
            radius,
        )
    }

    /// 结构中的元素（首次出现顺序）
    pub fn elements(&self) -> Vec<String> {
        self.structure.elements()
    }

    pub fn structure(&self) -> &Structure {
        &self.structure
    }

    /// 周期性结构的对称性分析；分子为 None
    pub fn symmetry(&self) -> Option<&SymmetryAnalysis> {
        self.symmetry.as_ref()
    }

    pub fn absorber(&self) -> &'static str {
        self.absorber
    }

    pub fn frame(&self) -> usize {
        self.frame
    }

    pub fn frame_count(&self) -> usize {
        self.input.frame_count()
    }

    pub fn is_molecular(&self) -> bool {
        !self.structure.is_periodic()
    }
}

fn structure_for_frame(input: &StructureInput, frame: usize) -> Result<Structure> {
    match input {
        StructureInput::Crystal(s) if frame == 0 => Ok(s.clone()),
        StructureInput::Crystal(_) => Err(XasError::FrameIndexOutOfRange { index: frame, count: 1 }),
        StructureInput::Molecules(frames) => {
            let molecule = frames.get(frame).ok_or(XasError::FrameIndexOutOfRange {
                index: frame,
                count: frames.len(),
            })?;
            log::debug!("Frame {}: '{}'", frame, molecule.comment);
            Ok(molecule.to_structure())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Molecule, MoleculeAtom};
    use std::fs;
    use tempfile::tempdir;

    fn atom(element: &str, x: f64) -> MoleculeAtom {
        MoleculeAtom {
            element: element.to_string(),
            position: [x, 0.0, 0.0],
        }
    }

    fn trajectory() -> StructureInput {
        StructureInput::Molecules(vec![
            Molecule {
                name: "traj".to_string(),
                comment: "f0".to_string(),
                atoms: vec![atom("Fe", 0.0), atom("O", 2.0)],
            },
            Molecule {
                name: "traj".to_string(),
                comment: "f1".to_string(),
                atoms: vec![atom("Fe", 0.0), atom("Fe", 2.5), atom("O", 1.2)],
            },
        ])
    }

    #[test]
    fn test_molecule_session_frames() {
        let mut session = SiteSession::from_input(trajectory(), "26").unwrap();
        assert_eq!(session.absorber(), "Fe");
        assert_eq!(session.frame_count(), 2);
        assert_eq!(session.sites().len(), 1);

        session.set_frame(1).unwrap();
        assert_eq!(session.sites().len(), 2);
        session.set_site(1).unwrap();
        assert_eq!(session.selected_site().structure_index, 1);

        let cluster = session.cluster(3.0).unwrap();
        assert_eq!(cluster.len(), 3);
        assert_eq!(cluster[0].species.tag(), "Fe(abs)");
        assert_eq!(cluster[1].distance, 1.3);

        assert!(matches!(
            session.set_frame(5),
            Err(XasError::FrameIndexOutOfRange { index: 5, count: 2 })
        ));
        assert!(matches!(
            session.set_site(4),
            Err(XasError::SiteIndexOutOfRange { .. })
        ));
        assert_eq!(session.elements(), vec!["Fe", "O"]);
    }

    #[test]
    fn test_open_cif_session() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("NaCl.cif");
        fs::write(
            &path,
            "data_NaCl
_cell_length_a 5.64
_cell_length_b 5.64
_cell_length_c 5.64
_cell_angle_alpha 90
_cell_angle_beta 90
_cell_angle_gamma 90
loop_
_symmetry_equiv_pos_as_xyz
x,y,z
x,y+1/2,z+1/2
x+1/2,y,z+1/2
x+1/2,y+1/2,z
loop_
_atom_site_label
_atom_site_type_symbol
_atom_site_fract_x
_atom_site_fract_y
_atom_site_fract_z
Na1 Na 0 0 0
Cl1 Cl 0.5 0 0
",
        )
        .unwrap();

        let mut session = SiteSession::open(&path, "Cl").unwrap();
        assert!(!session.is_molecular());
        assert_eq!(session.structure().sites.len(), 8);
        assert_eq!(session.sites().len(), 1);
        assert!(session.symmetry().is_some());
        assert!(matches!(
            session.set_frame(0),
            Err(XasError::InvalidArgument(_))
        ));

        let cluster = session.cluster(3.0).unwrap();
        // 6 个 Na 最近邻，距离 a/2
        assert_eq!(cluster.len(), 7);
        assert!(cluster[1..].iter().all(|a| a.species.tag() == "Na"));
    }

    #[test]
    fn test_missing_absorber() {
        assert!(matches!(
            SiteSession::from_input(trajectory(), "Cu"),
            Err(XasError::SiteNotFound { .. })
        ));
    }
}
