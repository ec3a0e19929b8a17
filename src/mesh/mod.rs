// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Mesh module - polytope soups and face-vertex meshes

mod element;
mod face_vertex;
mod reorder;
mod soup;
mod submesh;

pub use element::{Element, ElementType, MeshType};
pub use face_vertex::{
    FaceMesh, FaceNodes, FaceVertexMesh, MeshValidation, Quad8Mesh, QuadMesh, Tri6Mesh, TriMesh,
};
pub use soup::{Elset, PolytopeSoup, MATERIAL_PREFIX};
