// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Morton reordering of soup vertices and elements

use super::soup::sort_ids_with_data;
use super::PolytopeSoup;
use crate::error::Result;
use crate::morton::{invert_permutation, par_sort_permutation, sort_permutation};
use nalgebra::Point3;
use rayon::prelude::*;

impl PolytopeSoup {
    /// Reorder vertices along the Morton curve and rewrite connectivity to match
    pub fn morton_sort_vertices(&mut self) -> Result<()> {
        self.validate()?;
        let perm = sort_permutation::<u64>(&self.vertices);
        self.permute_vertices(&perm);
        Ok(())
    }

    /// Parallel [`PolytopeSoup::morton_sort_vertices`] with identical output
    pub fn par_morton_sort_vertices(&mut self) -> Result<()> {
        self.validate()?;
        let perm = par_sort_permutation::<u64>(&self.vertices);
        self.permute_vertices(&perm);
        Ok(())
    }

    /// Reorder elements along the Morton curve of their centroids; elset IDs are
    /// renumbered and re-sorted, with their data kept paired.
    pub fn morton_sort_elements(&mut self) -> Result<()> {
        let centroids = (0..self.num_elements())
            .map(|i| self.element_centroid(i))
            .collect::<Result<Vec<_>>>()?;
        let perm = sort_permutation::<u64>(&centroids);
        self.permute_elements(&perm);
        Ok(())
    }

    /// Parallel [`PolytopeSoup::morton_sort_elements`] with identical output
    pub fn par_morton_sort_elements(&mut self) -> Result<()> {
        self.validate()?;
        let centroids = (0..self.num_elements())
            .into_par_iter()
            .map(|i| self.element_centroid(i))
            .collect::<Result<Vec<Point3<f64>>>>()?;
        let perm = par_sort_permutation::<u64>(&centroids);
        self.permute_elements(&perm);
        Ok(())
    }

    /// Apply a new-to-old vertex permutation to a soup with in-range connectivity
    fn permute_vertices(&mut self, perm: &[usize]) {
        debug_assert_eq!(perm.len(), self.vertices.len());
        let old_to_new = invert_permutation(perm);
        self.vertices = perm.iter().map(|&i| self.vertices[i]).collect();
        for element in &mut self.elements {
            for v in element.vertices_mut() {
                *v = old_to_new[*v];
            }
        }
    }

    /// Apply a new-to-old element permutation, renumbering every elset
    fn permute_elements(&mut self, perm: &[usize]) {
        debug_assert_eq!(perm.len(), self.elements.len());
        let old_to_new = invert_permutation(perm);
        self.elements = perm.iter().map(|&i| self.elements[i]).collect();
        for i in 0..self.num_elsets() {
            let range = self.elset_offsets[i]..self.elset_offsets[i + 1];
            let mut ids: Vec<usize> = self.elset_ids[range.clone()]
                .iter()
                .map(|&id| old_to_new[id])
                .collect();
            sort_ids_with_data(&mut ids, &mut self.elset_data[i]);
            self.elset_ids[range].copy_from_slice(&ids);
        }
    }
}
