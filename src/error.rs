// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Error types for mesh and partition operations

use crate::mesh::{ElementType, MeshType};
use std::path::PathBuf;
use thiserror::Error;

/// Result type for coremesh operations
pub type Result<T> = std::result::Result<T, Error>;

/// Broad failure classes, used by callers that only need to branch on the category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A structural rule of the data model was broken (arity, tiling, orientation).
    StructuralInvariant,
    /// A name or index did not resolve.
    Lookup,
    /// Input data is inconsistent (material coverage, array lengths).
    DataIntegrity,
    /// Filesystem failure.
    Io,
    /// A file could not be decoded.
    Format,
}

/// Errors raised while building or querying soups, meshes and partitions
#[derive(Error, Debug)]
pub enum Error {
    #[error("{element_type:?} expects {expected} vertices, got {actual}")]
    ArityMismatch {
        element_type: ElementType,
        expected: usize,
        actual: usize,
    },

    #[error("face {face} references vertex {vertex}, but the mesh has {num_vertices} vertices")]
    VertexOutOfRange {
        face: usize,
        vertex: usize,
        num_vertices: usize,
    },

    #[error("element {element} references vertex {vertex}, but the soup has {num_vertices} vertices")]
    DanglingVertex {
        element: usize,
        vertex: usize,
        num_vertices: usize,
    },

    #[error("face {face} is not counter-clockwise (signed area {area})")]
    ClockwiseFace { face: usize, area: f64 },

    #[error("{mesh_type:?} soup cannot build a {expected:?} face-vertex mesh")]
    MeshTypeMismatch {
        mesh_type: MeshType,
        expected: MeshType,
    },

    #[error("{mesh_type:?} is not a single-shape mesh type")]
    UnsupportedMeshType { mesh_type: MeshType },

    #[error("{what} {index} out of range ({len} available)")]
    IndexOutOfRange {
        what: &'static str,
        index: usize,
        len: usize,
    },

    #[error("elset '{name}' not found")]
    ElsetNotFound { name: String },

    #[error("material '{name}' not found")]
    MaterialNotFound { name: String },

    #[error("material '{name}' already exists")]
    DuplicateMaterial { name: String },

    #[error("elset '{name}' has {ids} element ids but {data} data values")]
    ElsetDataLength {
        name: String,
        ids: usize,
        data: usize,
    },

    #[error("element {element} is not assigned to any material")]
    MissingMaterial { element: usize },

    #[error("element {element} is assigned to both '{first}' and '{second}'")]
    MultipleMaterials {
        element: usize,
        first: String,
        second: String,
    },

    #[error("mesh has {faces} faces but {materials} material ids were given")]
    MaterialCountMismatch { faces: usize, materials: usize },

    #[error("{level} grid is empty")]
    EmptyGrid { level: &'static str },

    #[error("{level} grid row {row} has {actual} entries, expected {expected}")]
    RaggedGrid {
        level: &'static str,
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("{level} {first} and {other} do not tile: {detail}")]
    TilingMismatch {
        level: &'static str,
        first: usize,
        other: usize,
        detail: String,
    },

    #[error("invalid axial planes: {detail}")]
    InvalidAxialPlanes { detail: String },

    #[error("invalid dimensions: {detail}")]
    InvalidDimensions { detail: String },

    #[error("core has already been built")]
    CoreAlreadyBuilt,

    #[error("core has not been built")]
    CoreMissing,

    #[error("coarse cell {cell} is {expected:?} but its mesh spans {found:?}")]
    FootprintMismatch {
        cell: usize,
        expected: [f64; 2],
        found: [f64; 2],
    },

    #[error("coarse cell {cell} has no matching elset '{elset}'")]
    UnmatchedCoarseCell { cell: usize, elset: String },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("elset name '{name}' cannot be written to {path}")]
    UnwritableName { path: PathBuf, name: String },

    #[error("unsupported mesh file extension: {path}")]
    UnsupportedFormat { path: PathBuf },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::ArityMismatch { .. }
            | Error::VertexOutOfRange { .. }
            | Error::DanglingVertex { .. }
            | Error::ClockwiseFace { .. }
            | Error::MeshTypeMismatch { .. }
            | Error::UnsupportedMeshType { .. }
            | Error::FootprintMismatch { .. }
            | Error::DuplicateMaterial { .. }
            | Error::MaterialCountMismatch { .. }
            | Error::EmptyGrid { .. }
            | Error::RaggedGrid { .. }
            | Error::TilingMismatch { .. }
            | Error::InvalidAxialPlanes { .. }
            | Error::InvalidDimensions { .. }
            | Error::CoreAlreadyBuilt => ErrorKind::StructuralInvariant,
            Error::IndexOutOfRange { .. }
            | Error::ElsetNotFound { .. }
            | Error::MaterialNotFound { .. }
            | Error::CoreMissing
            | Error::UnmatchedCoarseCell { .. } => ErrorKind::Lookup,
            Error::ElsetDataLength { .. }
            | Error::MissingMaterial { .. }
            | Error::MultipleMaterials { .. } => ErrorKind::DataIntegrity,
            Error::Io { .. } => ErrorKind::Io,
            Error::Parse { .. } | Error::UnsupportedFormat { .. } | Error::UnwritableName { .. } => {
                ErrorKind::Format
            }
        }
    }

    pub(crate) fn index(what: &'static str, index: usize, len: usize) -> Self {
        Error::IndexOutOfRange { what, index, len }
    }
}
