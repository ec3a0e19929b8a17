// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Hierarchical spatial partition
//!
//! A [`SpatialPartition`] owns every level in append-only arrays and links them by index:
//!
//! - the core tiles assemblies on a rectilinear (x, y) grid
//! - an assembly stacks lattices along z
//! - a lattice places equally pitched RTMs on a regular grid
//! - an RTM tiles coarse cells on a rectilinear grid
//! - a coarse cell points at a shared mesh template and lists one material per face
//!
//! Every level works in its own frame with the lower-left corner at the origin.

mod grid;
mod import;
mod model;
mod query;

pub use grid::{
    Assembly, Core, Lattice, Partition, RectilinearGrid, RectilinearPartition, RegularGrid,
    RegularPartition, Rtm,
};
pub use import::coarse_cell_elset_name;
pub use model::{
    CoarseCell, Material, MaterialId, MeshRef, MeshTemplate, SpatialPartition,
    DIMENSION_TOLERANCE,
};
pub use query::Location;
