// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Polytope soup: the canonical mixed-element interchange container

use super::{Element, ElementType, MeshType};
use crate::error::{Error, Result};
use crate::geometry::BoundingBox3;
use nalgebra::Point3;

/// Prefix of elset names that assign a material to their elements
pub const MATERIAL_PREFIX: &str = "Material_";

/// Borrowed view of one elset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Elset<'a> {
    pub name: &'a str,
    /// Ascending element IDs
    pub ids: &'a [usize],
    /// One value per ID, or empty when the elset carries no data
    pub data: &'a [f64],
}

/// Unstructured collection of mixed elements plus named element subsets
///
/// Elsets are stored compressed: `elset_offsets[i]..elset_offsets[i + 1]` indexes the IDs
/// of elset `i` inside `elset_ids`.
#[derive(Debug, Clone, PartialEq)]
pub struct PolytopeSoup {
    pub(crate) vertices: Vec<Point3<f64>>,
    pub(crate) elements: Vec<Element>,
    pub(crate) elset_names: Vec<String>,
    pub(crate) elset_offsets: Vec<usize>,
    pub(crate) elset_ids: Vec<usize>,
    pub(crate) elset_data: Vec<Vec<f64>>,
}

impl PolytopeSoup {
    pub fn new() -> Self {
        Self::with_capacity(0, 0)
    }

    pub fn with_capacity(vertex_count: usize, element_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            elements: Vec::with_capacity(element_count),
            elset_names: Vec::new(),
            elset_offsets: vec![0],
            elset_ids: Vec::new(),
            elset_data: Vec::new(),
        }
    }

    /// Add a vertex and return its index
    pub fn add_vertex(&mut self, x: f64, y: f64, z: f64) -> usize {
        self.vertices.push(Point3::new(x, y, z));
        self.vertices.len() - 1
    }

    /// Add an element and return its index
    pub fn add_element(&mut self, element_type: ElementType, vertices: &[usize]) -> Result<usize> {
        let element = Element::new(element_type, vertices)?;
        Ok(self.push_element(element))
    }

    pub fn push_element(&mut self, element: Element) -> usize {
        self.elements.push(element);
        self.elements.len() - 1
    }

    /// Add a named elset. IDs are stored ascending, with `data` permuted alongside.
    pub fn add_elset(&mut self, name: &str, ids: &[usize], data: Option<&[f64]>) -> Result<usize> {
        let data = data.unwrap_or(&[]);
        if !data.is_empty() && data.len() != ids.len() {
            return Err(Error::ElsetDataLength {
                name: name.to_string(),
                ids: ids.len(),
                data: data.len(),
            });
        }
        if let Some(&bad) = ids.iter().find(|&&id| id >= self.elements.len()) {
            return Err(Error::index("element", bad, self.elements.len()));
        }
        let mut ids = ids.to_vec();
        let mut data = data.to_vec();
        sort_ids_with_data(&mut ids, &mut data);
        Ok(self.push_elset(name.to_string(), ids, data))
    }

    /// Append an elset whose IDs are already sorted and valid
    pub(crate) fn push_elset(&mut self, name: String, ids: Vec<usize>, data: Vec<f64>) -> usize {
        self.elset_names.push(name);
        self.elset_ids.extend(ids);
        self.elset_offsets.push(self.elset_ids.len());
        self.elset_data.push(data);
        self.elset_names.len() - 1
    }

    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub fn num_elements(&self) -> usize {
        self.elements.len()
    }

    pub fn num_elsets(&self) -> usize {
        self.elset_names.len()
    }

    pub fn vertices(&self) -> &[Point3<f64>] {
        &self.vertices
    }

    pub fn vertex(&self, i: usize) -> &Point3<f64> {
        &self.vertices[i]
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn element(&self, i: usize) -> &Element {
        &self.elements[i]
    }

    pub fn elset(&self, i: usize) -> Elset<'_> {
        Elset {
            name: &self.elset_names[i],
            ids: &self.elset_ids[self.elset_offsets[i]..self.elset_offsets[i + 1]],
            data: &self.elset_data[i],
        }
    }

    pub fn elsets(&self) -> impl Iterator<Item = Elset<'_>> + '_ {
        (0..self.num_elsets()).map(move |i| self.elset(i))
    }

    pub fn elset_index(&self, name: &str) -> Option<usize> {
        self.elset_names.iter().position(|n| n == name)
    }

    pub fn element_centroid(&self, i: usize) -> Result<Point3<f64>> {
        let element = self
            .elements
            .get(i)
            .ok_or_else(|| Error::index("element", i, self.elements.len()))?;
        let mut sum = nalgebra::Vector3::zeros();
        for &v in element.vertices() {
            sum += self.vertex_checked(i, v)?.coords;
        }
        Ok(Point3::from(sum / element.vertices().len() as f64))
    }

    /// Check that every element references existing vertices
    ///
    /// `add_element` only checks arity, so soups assembled by hand may hold dangling
    /// connectivity until this is called.
    pub fn validate(&self) -> Result<()> {
        for (element, conn) in self.elements.iter().enumerate() {
            for &v in conn.vertices() {
                self.vertex_checked(element, v)?;
            }
        }
        Ok(())
    }

    pub(crate) fn vertex_checked(&self, element: usize, vertex: usize) -> Result<&Point3<f64>> {
        self.vertices.get(vertex).ok_or(Error::DanglingVertex {
            element,
            vertex,
            num_vertices: self.vertices.len(),
        })
    }

    pub fn bounding_box(&self) -> BoundingBox3 {
        BoundingBox3::from_points(&self.vertices)
    }

    pub fn mesh_type(&self) -> MeshType {
        MeshType::classify(self.elements.iter().map(Element::element_type))
    }

    /// Stably sort elsets by name and repack the compressed storage
    pub fn sort_elsets(&mut self) {
        let mut order: Vec<usize> = (0..self.num_elsets()).collect();
        order.sort_by(|&a, &b| self.elset_names[a].cmp(&self.elset_names[b]));

        let mut names = Vec::with_capacity(order.len());
        let mut offsets = Vec::with_capacity(order.len() + 1);
        let mut ids = Vec::with_capacity(self.elset_ids.len());
        let mut data = Vec::with_capacity(order.len());
        offsets.push(0);
        for &i in &order {
            let elset = self.elset(i);
            ids.extend_from_slice(elset.ids);
            offsets.push(ids.len());
            names.push(self.elset_names[i].clone());
            data.push(self.elset_data[i].clone());
        }
        self.elset_names = names;
        self.elset_offsets = offsets;
        self.elset_ids = ids;
        self.elset_data = data;
    }

    /// Names of all material elsets, in elset order
    pub fn material_names(&self) -> Vec<String> {
        self.elset_names
            .iter()
            .filter(|name| name.starts_with(MATERIAL_PREFIX))
            .cloned()
            .collect()
    }

    /// Material of every element as a position in `names`
    ///
    /// Every element must belong to exactly one material elset, and that elset's name must
    /// appear in `names`.
    pub fn material_ids<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<usize>> {
        let mut owner: Vec<Option<usize>> = vec![None; self.num_elements()];
        let material_elsets = (0..self.num_elsets())
            .filter(|&i| self.elset_names[i].starts_with(MATERIAL_PREFIX));
        for i in material_elsets {
            for &element in self.elset(i).ids {
                if let Some(first) = owner[element] {
                    return Err(Error::MultipleMaterials {
                        element,
                        first: self.elset_names[first].clone(),
                        second: self.elset_names[i].clone(),
                    });
                }
                owner[element] = Some(i);
            }
        }

        let mut position = ahash::AHashMap::new();
        for (p, name) in names.iter().enumerate() {
            position.entry(name.as_ref()).or_insert(p);
        }
        owner
            .iter()
            .enumerate()
            .map(|(element, elset)| {
                let elset = elset.ok_or(Error::MissingMaterial { element })?;
                let name = self.elset_names[elset].as_str();
                position
                    .get(name)
                    .copied()
                    .ok_or_else(|| Error::MaterialNotFound {
                        name: name.to_string(),
                    })
            })
            .collect()
    }
}

impl Default for PolytopeSoup {
    fn default() -> Self {
        Self::new()
    }
}

/// Sort `ids` ascending, applying the same permutation to `data` when it is non-empty
pub(crate) fn sort_ids_with_data(ids: &mut Vec<usize>, data: &mut Vec<f64>) {
    if data.is_empty() {
        ids.sort_unstable();
        return;
    }
    let mut order: Vec<usize> = (0..ids.len()).collect();
    order.sort_by_key(|&i| ids[i]);
    *ids = order.iter().map(|&i| ids[i]).collect();
    *data = order.iter().map(|&i| data[i]).collect();
}
