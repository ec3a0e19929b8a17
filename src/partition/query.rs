// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Point location through the partition hierarchy

use super::model::{MaterialId, SpatialPartition};
use crate::error::{Error, Result};
use nalgebra::{Point2, Point3};
use serde::{Deserialize, Serialize};

/// IDs visited on the way from the core down to a face
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub assembly: usize,
    pub lattice: usize,
    pub rtm: usize,
    pub coarse_cell: usize,
    /// Point in the coarse cell's frame (lower-left corner at the origin)
    pub local: [f64; 2],
    /// `None` when the cell has no mesh or the point falls between faces
    pub face: Option<usize>,
    pub material: Option<MaterialId>,
}

impl SpatialPartition {
    /// Walk core → assembly → lattice → RTM → coarse cell → face
    ///
    /// Returns `Ok(None)` for points outside the core.
    pub fn locate(&self, point: &Point3<f64>) -> Result<Option<Location>> {
        let core = self.core.as_ref().ok_or(Error::CoreMissing)?;
        let Some((assembly, xy)) = core.child_at([point.x, point.y]) else {
            return Ok(None);
        };
        let Some((lattice, _)) = self.assemblies[assembly].child_at([point.z]) else {
            return Ok(None);
        };
        let Some((rtm, xy)) = self.lattices[lattice].child_at(xy) else {
            return Ok(None);
        };
        let Some((coarse_cell, local)) = self.rtms[rtm].child_at(xy) else {
            return Ok(None);
        };

        let cell = &self.coarse_cells[coarse_cell];
        let (face, material) = match cell.mesh {
            Some(mesh) => {
                let face = self
                    .mesh(mesh)?
                    .face_containing(&Point2::new(local[0], local[1]));
                (face, face.map(|f| cell.material_ids[f]))
            }
            None => (None, None),
        };
        Ok(Some(Location {
            assembly,
            lattice,
            rtm,
            coarse_cell,
            local,
            face,
            material,
        }))
    }

    /// Material under `point`, if it lands on a meshed face
    pub fn material_at(&self, point: &Point3<f64>) -> Result<Option<MaterialId>> {
        Ok(self.locate(point)?.and_then(|location| location.material))
    }
}
