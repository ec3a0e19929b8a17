// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Binding unassigned coarse cells to geometry from a soup file

use super::model::{MeshTemplate, SpatialPartition, DIMENSION_TOLERANCE};
use crate::error::{Error, Result};
use crate::mesh::{PolytopeSoup, MATERIAL_PREFIX};
use crate::utils::math::approx_eq;
use nalgebra::Vector2;
use std::path::Path;
use tracing::{debug, info};

/// Elset naming the elements of coarse cell `id`
pub fn coarse_cell_elset_name(id: usize) -> String {
    format!("Coarse_Cell_{id:05}")
}

impl SpatialPartition {
    pub fn import_coarse_cell_meshes(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.import_coarse_cell_meshes_with(path, DIMENSION_TOLERANCE)
    }

    pub fn import_coarse_cell_meshes_with(
        &mut self,
        path: impl AsRef<Path>,
        tolerance: f64,
    ) -> Result<()> {
        let path = path.as_ref();
        let soup = crate::io::read(path)?;
        let bound = self.bind_coarse_cell_meshes(&soup, tolerance)?;
        info!(path = %path.display(), cells = bound, "Imported coarse cell meshes");
        Ok(())
    }

    /// Give every unassigned coarse cell the mesh in its `Coarse_Cell_NNNNN` elset
    ///
    /// Each mesh is moved so its lower-left corner sits at the origin and must span the
    /// cell's footprint. Face materials come from the soup's `Material_` elsets, matched by
    /// name against the partition's materials. Nothing is registered unless every cell
    /// binds. Returns the number of cells bound.
    pub fn bind_coarse_cell_meshes(&mut self, soup: &PolytopeSoup, tolerance: f64) -> Result<usize> {
        let material_names: Vec<String> = self
            .materials
            .iter()
            .map(|m| format!("{MATERIAL_PREFIX}{}", m.name))
            .collect();

        let mut staged = Vec::new();
        for (id, cell) in self.coarse_cells.iter().enumerate() {
            if cell.is_assigned() {
                continue;
            }
            let elset = coarse_cell_elset_name(id);
            if soup.elset_index(&elset).is_none() {
                return Err(Error::UnmatchedCoarseCell { cell: id, elset });
            }
            let submesh = soup.submesh(&elset)?;
            let material_ids = submesh.material_ids(&material_names)?;

            let bbox = submesh.bounding_box();
            let found = [bbox.max.x - bbox.min.x, bbox.max.y - bbox.min.y];
            if !approx_eq(found[0], cell.dxdy.x, tolerance)
                || !approx_eq(found[1], cell.dxdy.y, tolerance)
            {
                return Err(Error::FootprintMismatch {
                    cell: id,
                    expected: [cell.dxdy.x, cell.dxdy.y],
                    found,
                });
            }

            let mut template = MeshTemplate::from_soup(&submesh)?;
            template.translate(&Vector2::new(-bbox.min.x, -bbox.min.y));
            debug!(
                cell = id,
                mesh_type = ?template.mesh_type(),
                faces = material_ids.len(),
                "Staged coarse cell mesh"
            );
            staged.push((id, template, material_ids));
        }

        let bound = staged.len();
        for (id, template, material_ids) in staged {
            let mesh = self.add_mesh(template);
            let cell = &mut self.coarse_cells[id];
            cell.mesh = Some(mesh);
            cell.material_ids = material_ids;
        }
        Ok(bound)
    }
}
