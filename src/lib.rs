// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Coremesh
//!
//! Mesh data structures for reactor-core geometry: heterogeneous polytope soups with
//! named element sets, Morton (Z-order) spatial reordering, single-shape face-vertex
//! meshes, and the Core → Assembly → Lattice → RTM → CoarseCell spatial partition
//! that binds mesh templates and materials to a core layout.

pub mod cli;
pub mod config;
pub mod error;
pub mod geometry;
pub mod io;
pub mod mesh;
pub mod morton;
pub mod partition;
pub mod utils;

pub use config::{Config, SortMode};
pub use error::{Error, ErrorKind, Result};
pub use mesh::{
    Element, ElementType, FaceMesh, FaceVertexMesh, MeshType, PolytopeSoup, Quad8Mesh,
    QuadMesh, Tri6Mesh, TriMesh,
};
pub use morton::MortonCode;
pub use partition::{CoarseCell, Location, Material, MaterialId, MeshRef, SpatialPartition};

/// Read a soup file and build a face-vertex mesh of the given shape from it
pub fn load_mesh<const P: usize, const N: usize>(
    path: impl AsRef<std::path::Path>,
) -> Result<FaceVertexMesh<P, N>> {
    let soup = io::read(path)?;
    FaceVertexMesh::from_soup(&soup)
}
