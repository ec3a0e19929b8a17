// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Spatial partition model: materials, mesh templates and the Core → CoarseCell hierarchy

use super::grid::{Assembly, Core, Lattice, RectilinearGrid, RegularGrid, Rtm};
use crate::error::{Error, Result};
use crate::geometry::BoundingBox2;
use crate::mesh::{
    FaceMesh, MeshType, MeshValidation, PolytopeSoup, Quad8Mesh, QuadMesh, Tri6Mesh, TriMesh,
};
use crate::utils::math::{approx_eq, is_strictly_increasing};
use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Absolute tolerance used when checking that neighbouring partitions line up
pub const DIMENSION_TOLERANCE: f64 = 1e-6;

/// Index into [`SpatialPartition::materials`]
pub type MaterialId = usize;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Material {
    pub name: String,
}

impl Material {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Reference to a registered mesh template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshRef {
    pub mesh_type: MeshType,
    pub id: usize,
}

/// A single-shape mesh ready to be registered as a template
#[derive(Debug, Clone, PartialEq)]
pub enum MeshTemplate {
    Tri(TriMesh),
    Quad(QuadMesh),
    Tri6(Tri6Mesh),
    Quad8(Quad8Mesh),
}

impl MeshTemplate {
    /// Build from a homogeneous soup, picking the shape from its elements
    pub fn from_soup(soup: &PolytopeSoup) -> Result<Self> {
        match soup.mesh_type() {
            MeshType::Tri => Ok(Self::Tri(TriMesh::from_soup(soup)?)),
            MeshType::Quad => Ok(Self::Quad(QuadMesh::from_soup(soup)?)),
            MeshType::QuadraticTri => Ok(Self::Tri6(Tri6Mesh::from_soup(soup)?)),
            MeshType::QuadraticQuad => Ok(Self::Quad8(Quad8Mesh::from_soup(soup)?)),
            mesh_type => Err(Error::UnsupportedMeshType { mesh_type }),
        }
    }

    pub fn as_face_mesh(&self) -> &dyn FaceMesh {
        match self {
            Self::Tri(m) => m,
            Self::Quad(m) => m,
            Self::Tri6(m) => m,
            Self::Quad8(m) => m,
        }
    }

    pub fn mesh_type(&self) -> MeshType {
        self.as_face_mesh().mesh_type()
    }

    pub fn translate(&mut self, offset: &Vector2<f64>) {
        match self {
            Self::Tri(m) => m.translate(offset),
            Self::Quad(m) => m.translate(offset),
            Self::Tri6(m) => m.translate(offset),
            Self::Quad8(m) => m.translate(offset),
        }
    }

    pub fn validate(&self) -> Result<MeshValidation> {
        match self {
            Self::Tri(m) => m.validate(),
            Self::Quad(m) => m.validate(),
            Self::Tri6(m) => m.validate(),
            Self::Quad8(m) => m.validate(),
        }
    }
}

impl From<TriMesh> for MeshTemplate {
    fn from(mesh: TriMesh) -> Self {
        Self::Tri(mesh)
    }
}

impl From<QuadMesh> for MeshTemplate {
    fn from(mesh: QuadMesh) -> Self {
        Self::Quad(mesh)
    }
}

impl From<Tri6Mesh> for MeshTemplate {
    fn from(mesh: Tri6Mesh) -> Self {
        Self::Tri6(mesh)
    }
}

impl From<Quad8Mesh> for MeshTemplate {
    fn from(mesh: Quad8Mesh) -> Self {
        Self::Quad8(mesh)
    }
}

/// Leaf of the partition: a `dx` by `dy` footprint with an optional mesh and one
/// material per mesh face
#[derive(Debug, Clone, PartialEq)]
pub struct CoarseCell {
    pub dxdy: Vector2<f64>,
    pub mesh: Option<MeshRef>,
    pub material_ids: Vec<MaterialId>,
}

impl CoarseCell {
    pub fn is_assigned(&self) -> bool {
        self.mesh.is_some()
    }
}

/// Owner of every template and partition level, referenced by stable index
#[derive(Debug, Clone, Default)]
pub struct SpatialPartition {
    pub(crate) materials: Vec<Material>,
    pub(crate) tri_meshes: Vec<TriMesh>,
    pub(crate) quad_meshes: Vec<QuadMesh>,
    pub(crate) tri6_meshes: Vec<Tri6Mesh>,
    pub(crate) quad8_meshes: Vec<Quad8Mesh>,
    pub(crate) coarse_cells: Vec<CoarseCell>,
    pub(crate) rtms: Vec<Rtm>,
    pub(crate) lattices: Vec<Lattice>,
    pub(crate) assemblies: Vec<Assembly>,
    pub(crate) core: Option<Core>,
}

impl SpatialPartition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    pub fn tri_meshes(&self) -> &[TriMesh] {
        &self.tri_meshes
    }

    pub fn quad_meshes(&self) -> &[QuadMesh] {
        &self.quad_meshes
    }

    pub fn tri6_meshes(&self) -> &[Tri6Mesh] {
        &self.tri6_meshes
    }

    pub fn quad8_meshes(&self) -> &[Quad8Mesh] {
        &self.quad8_meshes
    }

    pub fn coarse_cells(&self) -> &[CoarseCell] {
        &self.coarse_cells
    }

    pub fn rtms(&self) -> &[Rtm] {
        &self.rtms
    }

    pub fn lattices(&self) -> &[Lattice] {
        &self.lattices
    }

    pub fn assemblies(&self) -> &[Assembly] {
        &self.assemblies
    }

    pub fn core(&self) -> Option<&Core> {
        self.core.as_ref()
    }

    pub fn material_id(&self, name: &str) -> Option<MaterialId> {
        self.materials.iter().position(|m| m.name == name)
    }

    pub fn add_material(&mut self, material: Material) -> Result<MaterialId> {
        if self.material_id(&material.name).is_some() {
            return Err(Error::DuplicateMaterial {
                name: material.name,
            });
        }
        self.materials.push(material);
        Ok(self.materials.len() - 1)
    }

    pub fn add_mesh(&mut self, mesh: impl Into<MeshTemplate>) -> MeshRef {
        fn push<T>(meshes: &mut Vec<T>, mesh: T) -> usize {
            meshes.push(mesh);
            meshes.len() - 1
        }
        let template = mesh.into();
        let mesh_type = template.mesh_type();
        let id = match template {
            MeshTemplate::Tri(m) => push(&mut self.tri_meshes, m),
            MeshTemplate::Quad(m) => push(&mut self.quad_meshes, m),
            MeshTemplate::Tri6(m) => push(&mut self.tri6_meshes, m),
            MeshTemplate::Quad8(m) => push(&mut self.quad8_meshes, m),
        };
        MeshRef { mesh_type, id }
    }

    /// Registered template behind `mesh`
    pub fn mesh(&self, mesh: MeshRef) -> Result<&dyn FaceMesh> {
        fn get<T: FaceMesh>(meshes: &[T], id: usize) -> Result<&dyn FaceMesh> {
            meshes
                .get(id)
                .map(|m| m as &dyn FaceMesh)
                .ok_or_else(|| Error::index("mesh", id, meshes.len()))
        }
        match mesh.mesh_type {
            MeshType::Tri => get(&self.tri_meshes, mesh.id),
            MeshType::Quad => get(&self.quad_meshes, mesh.id),
            MeshType::QuadraticTri => get(&self.tri6_meshes, mesh.id),
            MeshType::QuadraticQuad => get(&self.quad8_meshes, mesh.id),
            mesh_type => Err(Error::UnsupportedMeshType { mesh_type }),
        }
    }

    /// Register a structured `nx` by `ny` quad mesh covering `[0, dx] x [0, dy]`
    pub fn make_rectangular_pin_mesh(
        &mut self,
        dxdy: Vector2<f64>,
        nx: usize,
        ny: usize,
    ) -> Result<MeshRef> {
        check_footprint(&dxdy)?;
        if nx == 0 || ny == 0 {
            return Err(Error::InvalidDimensions {
                detail: format!("pin mesh needs at least one division per axis, got {nx} x {ny}"),
            });
        }
        let (hx, hy) = (dxdy.x / nx as f64, dxdy.y / ny as f64);
        let mut vertices = Vec::with_capacity((nx + 1) * (ny + 1));
        for j in 0..=ny {
            for i in 0..=nx {
                vertices.push(Point2::new(i as f64 * hx, j as f64 * hy));
            }
        }
        let v = |i: usize, j: usize| j * (nx + 1) + i;
        let mut faces = Vec::with_capacity(nx * ny);
        for j in 0..ny {
            for i in 0..nx {
                faces.push([v(i, j), v(i + 1, j), v(i + 1, j + 1), v(i, j + 1)]);
            }
        }
        Ok(self.add_mesh(QuadMesh::new(vertices, faces)?))
    }

    pub fn make_coarse_cell(
        &mut self,
        dxdy: Vector2<f64>,
        mesh: Option<MeshRef>,
        material_ids: Vec<MaterialId>,
    ) -> Result<usize> {
        check_footprint(&dxdy)?;
        let faces = match mesh {
            Some(mesh) => self.mesh(mesh)?.num_faces(),
            None => 0,
        };
        if material_ids.len() != faces {
            return Err(Error::MaterialCountMismatch {
                faces,
                materials: material_ids.len(),
            });
        }
        if let Some(&bad) = material_ids.iter().find(|&&m| m >= self.materials.len()) {
            return Err(Error::index("material", bad, self.materials.len()));
        }
        self.coarse_cells.push(CoarseCell {
            dxdy,
            mesh,
            material_ids,
        });
        Ok(self.coarse_cells.len() - 1)
    }

    /// Tile coarse cells into an RTM; `cell_ids` rows are listed top to bottom
    pub fn make_rtm(&mut self, cell_ids: &[Vec<usize>]) -> Result<usize> {
        let rows = bottom_up_rows("RTM", cell_ids)?;
        for &id in rows.iter().flatten() {
            if id >= self.coarse_cells.len() {
                return Err(Error::index("coarse cell", id, self.coarse_cells.len()));
            }
        }
        let grid = rectilinear_tiling("RTM", &rows, |id| {
            let dxdy = self.coarse_cells[id].dxdy;
            [dxdy.x, dxdy.y]
        })?;
        let rtm = Rtm::new(grid, rows.concat())?;
        debug!(id = self.rtms.len(), cells = rtm.children().len(), "Made RTM");
        self.rtms.push(rtm);
        Ok(self.rtms.len() - 1)
    }

    /// Arrange RTMs on a regular grid; `rtm_ids` rows are listed top to bottom
    pub fn make_lattice(&mut self, rtm_ids: &[Vec<usize>]) -> Result<usize> {
        let rows = bottom_up_rows("lattice", rtm_ids)?;
        for &id in rows.iter().flatten() {
            if id >= self.rtms.len() {
                return Err(Error::index("RTM", id, self.rtms.len()));
            }
        }

        // Every lattice shares the pitch of the first RTM ever placed
        let reference = match self.lattices.first() {
            Some(lattice) => lattice.children()[0],
            None => rows[0][0],
        };
        let pitch = self.rtms[reference].grid().extents();
        for &id in rows.iter().flatten() {
            let other = self.rtms[id].grid().extents();
            if !extents_match(&pitch, &other) {
                return Err(Error::TilingMismatch {
                    level: "RTM",
                    first: reference,
                    other: id,
                    detail: format!(
                        "pitch ({}, {}) vs ({}, {})",
                        pitch[0], pitch[1], other[0], other[1]
                    ),
                });
            }
        }

        let num_cells = [rows[0].len(), rows.len()];
        let grid = RegularGrid::new([0.0, 0.0], pitch, num_cells)?;
        let lattice = Lattice::new(grid, rows.concat())?;
        debug!(id = self.lattices.len(), rtms = lattice.children().len(), "Made lattice");
        self.lattices.push(lattice);
        Ok(self.lattices.len() - 1)
    }

    /// Stack lattices bottom to top between consecutive `z_planes`
    pub fn make_assembly(&mut self, lattice_ids: &[usize], z_planes: &[f64]) -> Result<usize> {
        if lattice_ids.is_empty() {
            return Err(Error::EmptyGrid { level: "assembly" });
        }
        if z_planes.len() != lattice_ids.len() + 1 {
            return Err(Error::InvalidAxialPlanes {
                detail: format!(
                    "{} planes for {} lattices",
                    z_planes.len(),
                    lattice_ids.len()
                ),
            });
        }
        if !is_strictly_increasing(z_planes) {
            return Err(Error::InvalidAxialPlanes {
                detail: format!("{z_planes:?} is not strictly increasing"),
            });
        }
        for &id in lattice_ids {
            if id >= self.lattices.len() {
                return Err(Error::index("lattice", id, self.lattices.len()));
            }
        }
        let first = lattice_ids[0];
        let extents = self.lattices[first].grid().extents();
        for &id in &lattice_ids[1..] {
            let other = self.lattices[id].grid().extents();
            if !extents_match(&extents, &other) {
                return Err(Error::TilingMismatch {
                    level: "lattice",
                    first,
                    other: id,
                    detail: format!("extents {extents:?} vs {other:?}"),
                });
            }
        }

        let grid = RectilinearGrid::new([z_planes.to_vec()])?;
        let assembly = Assembly::new(grid, lattice_ids.to_vec())?;
        self.assemblies.push(assembly);
        Ok(self.assemblies.len() - 1)
    }

    /// Tile assemblies into the core; `assembly_ids` rows are listed top to bottom
    pub fn make_core(&mut self, assembly_ids: &[Vec<usize>]) -> Result<()> {
        if self.core.is_some() {
            return Err(Error::CoreAlreadyBuilt);
        }
        let rows = bottom_up_rows("core", assembly_ids)?;
        for &id in rows.iter().flatten() {
            if id >= self.assemblies.len() {
                return Err(Error::index("assembly", id, self.assemblies.len()));
            }
        }

        let first = rows[0][0];
        let axial = self.assemblies[first].grid().divs(0);
        let axial = [axial[0], axial[axial.len() - 1]];
        for &id in rows.iter().flatten() {
            let divs = self.assemblies[id].grid().divs(0);
            let other = [divs[0], divs[divs.len() - 1]];
            if !extents_match(&axial, &other) {
                return Err(Error::TilingMismatch {
                    level: "assembly",
                    first,
                    other: id,
                    detail: format!("axial extent {axial:?} vs {other:?}"),
                });
            }
        }

        let grid = rectilinear_tiling("core", &rows, |id| self.assembly_extents(id))?;
        let core = Core::new(grid, rows.concat())?;
        debug!(assemblies = core.children().len(), "Made core");
        self.core = Some(core);
        Ok(())
    }

    /// Evenly divide `extents` into `num_cells[0]` by `num_cells[1]` unassigned coarse
    /// cells, with one RTM per cell, one lattice, one assembly on `z` in `[-1, 1]` and the
    /// core
    pub fn add_coarse_grid(&mut self, extents: Vector2<f64>, num_cells: [usize; 2]) -> Result<()> {
        check_footprint(&extents)?;
        let [nx, ny] = num_cells;
        if nx == 0 || ny == 0 {
            return Err(Error::InvalidDimensions {
                detail: format!("coarse grid needs at least one cell per axis, got {nx} x {ny}"),
            });
        }
        if self.core.is_some() {
            return Err(Error::CoreAlreadyBuilt);
        }
        let dxdy = Vector2::new(extents.x / nx as f64, extents.y / ny as f64);
        if let Some(lattice) = self.lattices.first() {
            let pitch = lattice.grid().spacing();
            if !extents_match(&pitch, &[dxdy.x, dxdy.y]) {
                return Err(Error::TilingMismatch {
                    level: "RTM",
                    first: lattice.children()[0],
                    other: self.rtms.len(),
                    detail: format!(
                        "pitch ({}, {}) vs ({}, {})",
                        pitch[0], pitch[1], dxdy.x, dxdy.y
                    ),
                });
            }
        }

        let mut rtm_ids = Vec::with_capacity(nx * ny);
        for _ in 0..nx * ny {
            let cell = self.make_coarse_cell(dxdy, None, Vec::new())?;
            rtm_ids.push(self.make_rtm(&[vec![cell]])?);
        }
        let rows: Vec<Vec<usize>> = (0..ny)
            .rev()
            .map(|j| rtm_ids[j * nx..(j + 1) * nx].to_vec())
            .collect();
        let lattice = self.make_lattice(&rows)?;
        let assembly = self.make_assembly(&[lattice], &[-1.0, 1.0])?;
        self.make_core(&[vec![assembly]])
    }

    /// (x, y) extent of an assembly, taken from its lattices
    fn assembly_extents(&self, id: usize) -> [f64; 2] {
        let lattice = self.assemblies[id].children()[0];
        self.lattices[lattice].grid().extents()
    }

    /// Footprint of the whole core, lower-left corner at the origin
    pub fn bounding_box(&self) -> Option<BoundingBox2> {
        let core = self.core.as_ref()?;
        let [x, y] = core.grid().extents();
        Some(BoundingBox2::new(Point2::origin(), Point2::new(x, y)))
    }
}

fn check_footprint(dxdy: &Vector2<f64>) -> Result<()> {
    if dxdy.iter().any(|&d| !(d > 0.0 && d.is_finite())) {
        return Err(Error::InvalidDimensions {
            detail: format!("footprint ({}, {}) must be positive", dxdy.x, dxdy.y),
        });
    }
    Ok(())
}

fn extents_match<const D: usize>(a: &[f64; D], b: &[f64; D]) -> bool {
    a.iter().zip(b).all(|(&a, &b)| approx_eq(a, b, DIMENSION_TOLERANCE))
}

/// Check the grid is non-empty and rectangular, then flip it so row 0 is the bottom
fn bottom_up_rows(level: &'static str, rows: &[Vec<usize>]) -> Result<Vec<Vec<usize>>> {
    let width = match rows.first() {
        Some(row) if !row.is_empty() => row.len(),
        _ => return Err(Error::EmptyGrid { level }),
    };
    if let Some((row, actual)) = rows
        .iter()
        .map(Vec::len)
        .enumerate()
        .find(|&(_, len)| len != width)
    {
        return Err(Error::RaggedGrid {
            level,
            row,
            expected: width,
            actual,
        });
    }
    Ok(rows.iter().rev().cloned().collect())
}

/// Division planes for children whose sizes must agree along every row and column
fn rectilinear_tiling(
    level: &'static str,
    rows: &[Vec<usize>],
    size_of: impl Fn(usize) -> [f64; 2],
) -> Result<RectilinearGrid<2>> {
    let mut x_divs = vec![0.0];
    for &id in &rows[0] {
        let last = x_divs[x_divs.len() - 1];
        x_divs.push(last + size_of(id)[0]);
    }
    let mut y_divs = vec![0.0];
    for row in rows {
        let last = y_divs[y_divs.len() - 1];
        y_divs.push(last + size_of(row[0])[1]);
    }

    for (j, row) in rows.iter().enumerate() {
        for (i, &id) in row.iter().enumerate() {
            let [dx, dy] = size_of(id);
            let width = x_divs[i + 1] - x_divs[i];
            let height = y_divs[j + 1] - y_divs[j];
            if !approx_eq(dx, width, DIMENSION_TOLERANCE) {
                return Err(Error::TilingMismatch {
                    level,
                    first: rows[0][i],
                    other: id,
                    detail: format!("column {i} widths {width} and {dx}"),
                });
            }
            if !approx_eq(dy, height, DIMENSION_TOLERANCE) {
                return Err(Error::TilingMismatch {
                    level,
                    first: row[0],
                    other: id,
                    detail: format!("row {j} heights {height} and {dy}"),
                });
            }
        }
    }
    RectilinearGrid::new([x_divs, y_divs])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn cell(partition: &mut SpatialPartition, dx: f64, dy: f64) -> usize {
        partition
            .make_coarse_cell(Vector2::new(dx, dy), None, Vec::new())
            .unwrap()
    }

    #[test]
    fn test_add_material() {
        let mut partition = SpatialPartition::new();
        assert_eq!(partition.add_material(Material::new("UO2")).unwrap(), 0);
        assert_eq!(partition.add_material(Material::new("H2O")).unwrap(), 1);
        let err = partition.add_material(Material::new("UO2")).unwrap_err();
        assert!(matches!(err, Error::DuplicateMaterial { .. }));
        assert_eq!(partition.material_id("H2O"), Some(1));
    }

    #[test]
    fn test_pin_mesh_and_coarse_cell() {
        let mut partition = SpatialPartition::new();
        let fuel = partition.add_material(Material::new("UO2")).unwrap();
        let mesh = partition
            .make_rectangular_pin_mesh(Vector2::new(2.0, 1.0), 2, 2)
            .unwrap();
        assert_eq!(mesh.mesh_type, MeshType::Quad);
        let template = partition.mesh(mesh).unwrap();
        assert_eq!(template.num_faces(), 4);
        assert_eq!(template.num_vertices(), 9);
        assert_eq!(template.face_containing(&Point2::new(1.5, 0.75)), Some(3));

        let dxdy = Vector2::new(2.0, 1.0);
        let err = partition
            .make_coarse_cell(dxdy, Some(mesh), vec![fuel; 3])
            .unwrap_err();
        assert!(matches!(
            err,
            Error::MaterialCountMismatch {
                faces: 4,
                materials: 3
            }
        ));
        let err = partition
            .make_coarse_cell(dxdy, Some(mesh), vec![0, 0, 0, 5])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Lookup);
        let missing = MeshRef {
            mesh_type: MeshType::Tri,
            id: 0,
        };
        assert!(partition.make_coarse_cell(dxdy, Some(missing), vec![]).is_err());
        assert!(partition.coarse_cells().is_empty());

        let id = partition
            .make_coarse_cell(dxdy, Some(mesh), vec![fuel; 4])
            .unwrap();
        assert_eq!(id, 0);
        assert!(partition.coarse_cells()[0].is_assigned());
    }

    #[test]
    fn test_make_rtm_divisions() {
        let mut partition = SpatialPartition::new();
        let a = cell(&mut partition, 1.0, 1.0);
        let b = cell(&mut partition, 2.0, 1.0);
        let c = cell(&mut partition, 1.0, 3.0);
        let d = cell(&mut partition, 2.0, 3.0);
        // Top row first
        let rtm = partition.make_rtm(&[vec![c, d], vec![a, b]]).unwrap();
        let rtm = &partition.rtms()[rtm];
        assert_eq!(rtm.grid().divs(0), &[0.0, 1.0, 3.0]);
        assert_eq!(rtm.grid().divs(1), &[0.0, 1.0, 4.0]);
        assert_eq!(rtm.children(), &[a, b, c, d]);
    }

    #[test]
    fn test_make_rtm_rejects_irregular_tiling() {
        let mut partition = SpatialPartition::new();
        let a = cell(&mut partition, 1.0, 1.0);
        let b = cell(&mut partition, 1.0, 2.0);
        let err = partition.make_rtm(&[vec![a, b]]).unwrap_err();
        assert!(matches!(err, Error::TilingMismatch { level: "RTM", .. }));

        let err = partition.make_rtm(&[vec![a, a], vec![a]]).unwrap_err();
        assert!(matches!(err, Error::RaggedGrid { row: 1, .. }));
        assert!(partition.make_rtm(&[]).is_err());
        assert!(partition.make_rtm(&[vec![7]]).is_err());
        assert!(partition.rtms().is_empty());
    }

    #[test]
    fn test_make_lattice_rejects_mixed_pitch() {
        let mut partition = SpatialPartition::new();
        let small = cell(&mut partition, 2.0, 2.0);
        let large = cell(&mut partition, 3.0, 2.0);
        let r0 = partition.make_rtm(&[vec![small]]).unwrap();
        let r1 = partition.make_rtm(&[vec![large]]).unwrap();
        let err = partition.make_lattice(&[vec![r0, r1]]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StructuralInvariant);
        assert!(err.to_string().contains("pitch (2, 2) vs (3, 2)"));

        let lattice = partition.make_lattice(&[vec![r0], vec![r0]]).unwrap();
        assert_eq!(partition.lattices()[lattice].grid().extents(), [2.0, 4.0]);
        assert!(partition.make_lattice(&[vec![r1]]).is_err());
    }

    #[test]
    fn test_make_assembly_checks_planes_and_extents() {
        let mut partition = SpatialPartition::new();
        let c = cell(&mut partition, 1.0, 1.0);
        let rtm = partition.make_rtm(&[vec![c]]).unwrap();
        let one = partition.make_lattice(&[vec![rtm]]).unwrap();
        let two = partition.make_lattice(&[vec![rtm, rtm]]).unwrap();

        let err = partition.make_assembly(&[one, one], &[0.0, 1.0]).unwrap_err();
        assert!(matches!(err, Error::InvalidAxialPlanes { .. }));
        let err = partition.make_assembly(&[one, one], &[0.0, 1.0, 1.0]).unwrap_err();
        assert!(matches!(err, Error::InvalidAxialPlanes { .. }));
        let err = partition.make_assembly(&[one, two], &[0.0, 1.0, 2.0]).unwrap_err();
        assert!(matches!(err, Error::TilingMismatch { level: "lattice", .. }));

        let id = partition.make_assembly(&[one, one], &[0.0, 1.0, 2.0]).unwrap();
        assert_eq!(partition.assemblies()[id].children(), &[one, one]);
    }

    #[test]
    fn test_make_core_once() {
        let mut partition = SpatialPartition::new();
        let c = cell(&mut partition, 1.0, 1.0);
        let rtm = partition.make_rtm(&[vec![c]]).unwrap();
        let lattice = partition.make_lattice(&[vec![rtm]]).unwrap();
        let a = partition.make_assembly(&[lattice], &[0.0, 1.0]).unwrap();
        let short = partition.make_assembly(&[lattice], &[0.0, 0.5]).unwrap();

        let err = partition.make_core(&[vec![a, short]]).unwrap_err();
        assert!(matches!(err, Error::TilingMismatch { level: "assembly", .. }));
        assert!(partition.core().is_none());

        partition.make_core(&[vec![a, a], vec![a, a]]).unwrap();
        assert_eq!(partition.core().unwrap().grid().extents(), [2.0, 2.0]);
        let err = partition.make_core(&[vec![a]]).unwrap_err();
        assert!(matches!(err, Error::CoreAlreadyBuilt));
    }

    #[test]
    fn test_add_coarse_grid() {
        let mut partition = SpatialPartition::new();
        partition
            .add_coarse_grid(Vector2::new(3.0, 2.0), [3, 2])
            .unwrap();
        assert_eq!(partition.coarse_cells().len(), 6);
        assert_eq!(partition.rtms().len(), 6);
        assert_eq!(partition.lattices().len(), 1);
        assert_eq!(partition.assemblies().len(), 1);
        assert!(partition.coarse_cells().iter().all(|c| !c.is_assigned()));

        let lattice = &partition.lattices()[0];
        assert_eq!(lattice.children(), &[0, 1, 2, 3, 4, 5]);
        assert_eq!(lattice.grid().spacing(), [1.0, 1.0]);
        let bbox = partition.bounding_box().unwrap();
        assert_eq!(bbox.max, Point2::new(3.0, 2.0));

        assert!(partition
            .add_coarse_grid(Vector2::new(1.0, 1.0), [1, 1])
            .is_err());
    }
}
