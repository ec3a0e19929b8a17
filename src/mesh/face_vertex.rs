// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Single-shape planar meshes with vertex-to-face adjacency

use super::{Element, MeshType, PolytopeSoup};
use crate::error::{Error, Result};
use crate::geometry::{flip_nodes, BoundingBox2, Polygon};
use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// Planar mesh whose faces all have polynomial order `P` and `N` vertices
///
/// Holds its own copy of vertices and connectivity. The vertex-to-face adjacency
/// (`vf_offsets`, `vf`) is derived data: it is only valid after [`populate_vf`] and is not
/// updated by later edits.
///
/// [`populate_vf`]: FaceVertexMesh::populate_vf
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FaceVertexMesh<const P: usize, const N: usize> {
    vertices: Vec<Point2<f64>>,
    faces: Vec<[usize; N]>,
    vf_offsets: Vec<usize>,
    vf: Vec<usize>,
}

pub type TriMesh = FaceVertexMesh<1, 3>;
pub type QuadMesh = FaceVertexMesh<1, 4>;
pub type Tri6Mesh = FaceVertexMesh<2, 6>;
pub type Quad8Mesh = FaceVertexMesh<2, 8>;

/// Outcome of [`FaceVertexMesh::validate`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshValidation {
    pub num_vertices: usize,
    pub num_faces: usize,
    /// Vertices referenced by no face
    pub orphan_vertices: Vec<usize>,
    pub total_area: f64,
}

impl<const P: usize, const N: usize> FaceVertexMesh<P, N> {
    /// Mesh type this shape builds from
    pub const fn mesh_type() -> MeshType {
        match (P, N) {
            (1, 3) => MeshType::Tri,
            (1, 4) => MeshType::Quad,
            (2, 6) => MeshType::QuadraticTri,
            (2, 8) => MeshType::QuadraticQuad,
            _ => MeshType::None,
        }
    }

    /// Build from explicit arrays; every face must reference existing vertices
    pub fn new(vertices: Vec<Point2<f64>>, faces: Vec<[usize; N]>) -> Result<Self> {
        check_connectivity(vertices.len(), &faces)?;
        Ok(Self {
            vertices,
            faces,
            vf_offsets: Vec::new(),
            vf: Vec::new(),
        })
    }

    /// Copy a homogeneous soup of the matching element type, dropping z
    pub fn from_soup(soup: &PolytopeSoup) -> Result<Self> {
        let mesh_type = soup.mesh_type();
        if mesh_type != Self::mesh_type() {
            return Err(Error::MeshTypeMismatch {
                mesh_type,
                expected: Self::mesh_type(),
            });
        }
        let vertices = soup
            .vertices()
            .iter()
            .map(|v| Point2::new(v.x, v.y))
            .collect();
        let faces = soup
            .elements()
            .iter()
            .map(|element| {
                let mut face = [0; N];
                face.copy_from_slice(element.vertices());
                face
            })
            .collect();
        Self::new(vertices, faces)
    }

    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    pub fn vertices(&self) -> &[Point2<f64>] {
        &self.vertices
    }

    pub fn faces(&self) -> &[[usize; N]] {
        &self.faces
    }

    pub fn face(&self, i: usize) -> Polygon<P, N> {
        Polygon::new(self.faces[i].map(|v| self.vertices[v]))
    }

    pub fn vf_offsets(&self) -> &[usize] {
        &self.vf_offsets
    }

    pub fn vf(&self) -> &[usize] {
        &self.vf
    }

    /// Faces touching vertex `v`, ascending. Empty until [`FaceVertexMesh::populate_vf`].
    pub fn vertex_faces(&self, v: usize) -> &[usize] {
        match (self.vf_offsets.get(v), self.vf_offsets.get(v + 1)) {
            (Some(&start), Some(&end)) => &self.vf[start..end],
            _ => &[],
        }
    }

    /// Rebuild the vertex-to-face adjacency
    pub fn populate_vf(&mut self) {
        let num_vertices = self.vertices.len();
        let mut offsets = vec![0usize; num_vertices + 1];
        for face in &self.faces {
            for &v in face {
                offsets[v + 1] += 1;
            }
        }
        for i in 0..num_vertices {
            offsets[i + 1] += offsets[i];
        }

        let mut cursor = offsets[..num_vertices].to_vec();
        let mut vf = vec![0usize; offsets[num_vertices]];
        for (f, face) in self.faces.iter().enumerate() {
            for &v in face {
                vf[cursor[v]] = f;
                cursor[v] += 1;
            }
        }
        self.vf_offsets = offsets;
        self.vf = vf;
    }

    /// Lowest-numbered face containing `point`, boundaries included
    pub fn face_containing(&self, point: &Point2<f64>) -> Option<usize> {
        (0..self.faces.len()).find(|&i| {
            let face = self.face(i);
            face.bounding_box().contains(point) && face.contains(point)
        })
    }

    /// Union of the face bounding boxes; curved edges are bounded exactly
    pub fn bounding_box(&self) -> BoundingBox2 {
        (0..self.faces.len())
            .map(|i| self.face(i).bounding_box())
            .fold(BoundingBox2::empty(), |acc, b| acc.union(&b))
    }

    /// Reverse the orientation of face `i`
    pub fn flip_face(&mut self, i: usize) {
        flip_nodes::<usize, P, N>(&mut self.faces[i]);
    }

    pub fn translate(&mut self, offset: &Vector2<f64>) {
        for v in &mut self.vertices {
            *v += offset;
        }
    }

    /// Check connectivity and orientation, and report unused vertices
    pub fn validate(&self) -> Result<MeshValidation> {
        check_connectivity(self.vertices.len(), &self.faces)?;

        let mut total_area = 0.0;
        for i in 0..self.faces.len() {
            let area = self.face(i).area();
            if area <= 0.0 {
                return Err(Error::ClockwiseFace { face: i, area });
            }
            total_area += area;
        }

        let mut used = vec![false; self.vertices.len()];
        for face in &self.faces {
            for &v in face {
                used[v] = true;
            }
        }
        let orphan_vertices: Vec<usize> = used
            .iter()
            .enumerate()
            .filter_map(|(v, &u)| (!u).then_some(v))
            .collect();
        if !orphan_vertices.is_empty() {
            warn!(
                count = orphan_vertices.len(),
                first = orphan_vertices[0],
                "Mesh has vertices not used by any face"
            );
        }

        Ok(MeshValidation {
            num_vertices: self.vertices.len(),
            num_faces: self.faces.len(),
            orphan_vertices,
            total_area,
        })
    }
}

/// Face node arrays that map onto a soup element of polynomial order `P`
pub trait FaceNodes<const P: usize> {
    fn into_element(self) -> Element;
}

impl FaceNodes<1> for [usize; 3] {
    fn into_element(self) -> Element {
        Element::Triangle(self)
    }
}

impl FaceNodes<1> for [usize; 4] {
    fn into_element(self) -> Element {
        Element::Quad(self)
    }
}

impl FaceNodes<2> for [usize; 6] {
    fn into_element(self) -> Element {
        Element::QuadraticTriangle(self)
    }
}

impl FaceNodes<2> for [usize; 8] {
    fn into_element(self) -> Element {
        Element::QuadraticQuad(self)
    }
}

impl<const P: usize, const N: usize> FaceVertexMesh<P, N>
where
    [usize; N]: FaceNodes<P>,
{
    /// Convert back into a soup with z = 0
    pub fn to_soup(&self) -> PolytopeSoup {
        let mut soup = PolytopeSoup::with_capacity(self.vertices.len(), self.faces.len());
        for v in &self.vertices {
            soup.add_vertex(v.x, v.y, 0.0);
        }
        for &face in &self.faces {
            soup.push_element(face.into_element());
        }
        soup
    }
}

fn check_connectivity<const N: usize>(num_vertices: usize, faces: &[[usize; N]]) -> Result<()> {
    for (face, conn) in faces.iter().enumerate() {
        if let Some(&vertex) = conn.iter().find(|&&v| v >= num_vertices) {
            return Err(Error::VertexOutOfRange {
                face,
                vertex,
                num_vertices,
            });
        }
    }
    Ok(())
}

/// Shape-erased view of a face-vertex mesh, used where templates of different shapes
/// are handled together
pub trait FaceMesh: fmt::Debug + Send + Sync {
    fn mesh_type(&self) -> MeshType;
    fn num_faces(&self) -> usize;
    fn num_vertices(&self) -> usize;
    fn face_containing(&self, point: &Point2<f64>) -> Option<usize>;
    fn bounding_box(&self) -> BoundingBox2;
    fn face_area(&self, i: usize) -> f64;
}

impl<const P: usize, const N: usize> FaceMesh for FaceVertexMesh<P, N> {
    fn mesh_type(&self) -> MeshType {
        Self::mesh_type()
    }

    fn num_faces(&self) -> usize {
        self.faces.len()
    }

    fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    fn face_containing(&self, point: &Point2<f64>) -> Option<usize> {
        FaceVertexMesh::face_containing(self, point)
    }

    fn bounding_box(&self) -> BoundingBox2 {
        FaceVertexMesh::bounding_box(self)
    }

    fn face_area(&self, i: usize) -> f64 {
        self.face(i).area()
    }
}
