// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Element kinds and their fixed-arity connectivity

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Closed set of element shapes a soup may hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementType {
    Vertex,
    Line,
    Triangle,
    Quad,
    QuadraticEdge,
    QuadraticTriangle,
    QuadraticQuad,
}

impl ElementType {
    pub const ALL: [ElementType; 7] = [
        ElementType::Vertex,
        ElementType::Line,
        ElementType::Triangle,
        ElementType::Quad,
        ElementType::QuadraticEdge,
        ElementType::QuadraticTriangle,
        ElementType::QuadraticQuad,
    ];

    /// Number of vertex IDs an element of this type carries
    pub const fn num_vertices(self) -> usize {
        match self {
            ElementType::Vertex => 1,
            ElementType::Line => 2,
            ElementType::Triangle => 3,
            ElementType::Quad => 4,
            ElementType::QuadraticEdge => 3,
            ElementType::QuadraticTriangle => 6,
            ElementType::QuadraticQuad => 8,
        }
    }

    /// VTK cell type identifier
    pub const fn vtk_id(self) -> u8 {
        match self {
            ElementType::Vertex => 1,
            ElementType::Line => 3,
            ElementType::Triangle => 5,
            ElementType::Quad => 9,
            ElementType::QuadraticEdge => 21,
            ElementType::QuadraticTriangle => 22,
            ElementType::QuadraticQuad => 23,
        }
    }

    pub fn from_vtk_id(id: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.vtk_id() == id)
    }

    pub const fn is_face(self) -> bool {
        matches!(
            self,
            ElementType::Triangle
                | ElementType::Quad
                | ElementType::QuadraticTriangle
                | ElementType::QuadraticQuad
        )
    }
}

/// One element: its shape plus vertex IDs in counter-clockwise order, midside nodes last
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Element {
    Vertex([usize; 1]),
    Line([usize; 2]),
    Triangle([usize; 3]),
    Quad([usize; 4]),
    QuadraticEdge([usize; 3]),
    QuadraticTriangle([usize; 6]),
    QuadraticQuad([usize; 8]),
}

fn to_array<const K: usize>(vertices: &[usize]) -> [usize; K] {
    let mut out = [0; K];
    out.copy_from_slice(vertices);
    out
}

impl Element {
    /// Build an element, failing when the vertex count does not match the type's arity
    pub fn new(element_type: ElementType, vertices: &[usize]) -> Result<Self> {
        let expected = element_type.num_vertices();
        if vertices.len() != expected {
            return Err(Error::ArityMismatch {
                element_type,
                expected,
                actual: vertices.len(),
            });
        }
        Ok(match element_type {
            ElementType::Vertex => Element::Vertex(to_array(vertices)),
            ElementType::Line => Element::Line(to_array(vertices)),
            ElementType::Triangle => Element::Triangle(to_array(vertices)),
            ElementType::Quad => Element::Quad(to_array(vertices)),
            ElementType::QuadraticEdge => Element::QuadraticEdge(to_array(vertices)),
            ElementType::QuadraticTriangle => Element::QuadraticTriangle(to_array(vertices)),
            ElementType::QuadraticQuad => Element::QuadraticQuad(to_array(vertices)),
        })
    }

    pub fn element_type(&self) -> ElementType {
        match self {
            Element::Vertex(_) => ElementType::Vertex,
            Element::Line(_) => ElementType::Line,
            Element::Triangle(_) => ElementType::Triangle,
            Element::Quad(_) => ElementType::Quad,
            Element::QuadraticEdge(_) => ElementType::QuadraticEdge,
            Element::QuadraticTriangle(_) => ElementType::QuadraticTriangle,
            Element::QuadraticQuad(_) => ElementType::QuadraticQuad,
        }
    }

    pub fn vertices(&self) -> &[usize] {
        match self {
            Element::Vertex(v) => v,
            Element::Line(v) => v,
            Element::Triangle(v) => v,
            Element::Quad(v) => v,
            Element::QuadraticEdge(v) => v,
            Element::QuadraticTriangle(v) => v,
            Element::QuadraticQuad(v) => v,
        }
    }

    pub fn vertices_mut(&mut self) -> &mut [usize] {
        match self {
            Element::Vertex(v) => v,
            Element::Line(v) => v,
            Element::Triangle(v) => v,
            Element::Quad(v) => v,
            Element::QuadraticEdge(v) => v,
            Element::QuadraticTriangle(v) => v,
            Element::QuadraticQuad(v) => v,
        }
    }
}

/// Classification of a whole soup for face-vertex mesh construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MeshType {
    /// Empty, mixed-order or containing non-face elements
    None,
    Tri,
    Quad,
    TriQuad,
    QuadraticTri,
    QuadraticQuad,
    QuadraticTriQuad,
}

impl MeshType {
    /// Classify a sequence of element types
    pub fn classify(types: impl IntoIterator<Item = ElementType>) -> Self {
        let (mut tri, mut quad, mut tri6, mut quad8) = (false, false, false, false);
        for element_type in types {
            match element_type {
                ElementType::Triangle => tri = true,
                ElementType::Quad => quad = true,
                ElementType::QuadraticTriangle => tri6 = true,
                ElementType::QuadraticQuad => quad8 = true,
                _ => return MeshType::None,
            }
        }
        match (tri, quad, tri6, quad8) {
            (true, false, false, false) => MeshType::Tri,
            (false, true, false, false) => MeshType::Quad,
            (true, true, false, false) => MeshType::TriQuad,
            (false, false, true, false) => MeshType::QuadraticTri,
            (false, false, false, true) => MeshType::QuadraticQuad,
            (false, false, true, true) => MeshType::QuadraticTriQuad,
            _ => MeshType::None,
        }
    }
}
