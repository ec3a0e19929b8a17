// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Submesh extraction by elset

use super::PolytopeSoup;
use crate::error::{Error, Result};
use std::cmp::Ordering;
use tracing::debug;

impl PolytopeSoup {
    /// Extract the elements of elset `name` into a new, compactly numbered soup
    ///
    /// Elements keep ascending ID order and vertices keep their relative order. Every other
    /// elset that shares elements with the extracted one is carried over with renumbered IDs
    /// and its matching data values; elsets with no shared elements are dropped.
    pub fn submesh(&self, name: &str) -> Result<PolytopeSoup> {
        let index = self.elset_index(name).ok_or_else(|| Error::ElsetNotFound {
            name: name.to_string(),
        })?;

        let mut element_ids = self.elset(index).ids.to_vec();
        element_ids.sort_unstable();

        let mut vertex_ids = Vec::new();
        for &e in &element_ids {
            for &v in self.elements[e].vertices() {
                self.vertex_checked(e, v)?;
                vertex_ids.push(v);
            }
        }
        vertex_ids.sort_unstable();
        vertex_ids.dedup();

        let mut sub = PolytopeSoup::with_capacity(vertex_ids.len(), element_ids.len());
        sub.vertices
            .extend(vertex_ids.iter().map(|&v| self.vertices[v]));
        for &e in &element_ids {
            let mut element = self.elements[e];
            for v in element.vertices_mut() {
                *v = vertex_ids.binary_search(v).unwrap_or_else(|i| i);
            }
            sub.push_element(element);
        }

        for other in (0..self.num_elsets()).filter(|&i| i != index) {
            let elset = self.elset(other);
            let mut ids = Vec::new();
            let mut data = Vec::new();
            let (mut a, mut b) = (0, 0);
            while a < element_ids.len() && b < elset.ids.len() {
                match element_ids[a].cmp(&elset.ids[b]) {
                    Ordering::Less => a += 1,
                    Ordering::Greater => b += 1,
                    Ordering::Equal => {
                        ids.push(a);
                        if !elset.data.is_empty() {
                            data.push(elset.data[b]);
                        }
                        a += 1;
                        b += 1;
                    }
                }
            }
            if !ids.is_empty() {
                sub.push_elset(elset.name.to_string(), ids, data);
            }
        }

        debug!(
            elset = name,
            vertices = sub.num_vertices(),
            elements = sub.num_elements(),
            elsets = sub.num_elsets(),
            "Extracted submesh"
        );
        Ok(sub)
    }
}
