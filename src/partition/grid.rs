// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Rectilinear and regular grids, and the partitions that map their cells to children
//!
//! Cells are indexed row-major with x fastest and row 0 at the lowest coordinate. A point
//! on an interior division belongs to the upper cell; the last cell on each axis is closed.

use crate::error::{Error, Result};
use crate::utils::math::is_strictly_increasing;

/// Grid with arbitrary division planes per axis
#[derive(Debug, Clone, PartialEq)]
pub struct RectilinearGrid<const D: usize> {
    divs: [Vec<f64>; D],
}

impl<const D: usize> RectilinearGrid<D> {
    /// Each axis needs at least two strictly increasing planes
    pub fn new(divs: [Vec<f64>; D]) -> Result<Self> {
        for (axis, d) in divs.iter().enumerate() {
            if d.len() < 2 || !is_strictly_increasing(d) {
                return Err(Error::InvalidDimensions {
                    detail: format!("axis {axis} divisions {d:?} are not strictly increasing"),
                });
            }
        }
        Ok(Self { divs })
    }

    pub fn divs(&self, axis: usize) -> &[f64] {
        &self.divs[axis]
    }

    pub fn num_cells(&self) -> [usize; D] {
        std::array::from_fn(|a| self.divs[a].len() - 1)
    }

    pub fn min_corner(&self) -> [f64; D] {
        std::array::from_fn(|a| self.divs[a][0])
    }

    pub fn extents(&self) -> [f64; D] {
        std::array::from_fn(|a| self.divs[a][self.divs[a].len() - 1] - self.divs[a][0])
    }

    /// Cell holding `point`, and `point` relative to that cell's lower corner
    pub fn locate(&self, point: [f64; D]) -> Option<([usize; D], [f64; D])> {
        let mut index = [0; D];
        let mut local = [0.0; D];
        for a in 0..D {
            let i = find_interval(&self.divs[a], point[a])?;
            index[a] = i;
            local[a] = point[a] - self.divs[a][i];
        }
        Some((index, local))
    }
}

/// Grid of identical cells anchored at `origin`
#[derive(Debug, Clone, PartialEq)]
pub struct RegularGrid<const D: usize> {
    origin: [f64; D],
    spacing: [f64; D],
    num_cells: [usize; D],
}

impl<const D: usize> RegularGrid<D> {
    pub fn new(origin: [f64; D], spacing: [f64; D], num_cells: [usize; D]) -> Result<Self> {
        if spacing.iter().any(|&s| !(s > 0.0)) || num_cells.contains(&0) {
            return Err(Error::InvalidDimensions {
                detail: format!("regular grid spacing {spacing:?} with {num_cells:?} cells"),
            });
        }
        Ok(Self {
            origin,
            spacing,
            num_cells,
        })
    }

    pub fn origin(&self) -> [f64; D] {
        self.origin
    }

    pub fn spacing(&self) -> [f64; D] {
        self.spacing
    }

    pub fn num_cells(&self) -> [usize; D] {
        self.num_cells
    }

    pub fn extents(&self) -> [f64; D] {
        std::array::from_fn(|a| self.spacing[a] * self.num_cells[a] as f64)
    }

    pub fn locate(&self, point: [f64; D]) -> Option<([usize; D], [f64; D])> {
        let extents = self.extents();
        let mut index = [0; D];
        let mut local = [0.0; D];
        for a in 0..D {
            let offset = point[a] - self.origin[a];
            if !(0.0..=extents[a]).contains(&offset) {
                return None;
            }
            let i = ((offset / self.spacing[a]).floor() as usize).min(self.num_cells[a] - 1);
            index[a] = i;
            local[a] = offset - i as f64 * self.spacing[a];
        }
        Some((index, local))
    }
}

/// Index of the interval of `divs` holding `x`
pub(crate) fn find_interval(divs: &[f64], x: f64) -> Option<usize> {
    let (first, last) = (*divs.first()?, *divs.last()?);
    if divs.len() < 2 || !(first..=last).contains(&x) {
        return None;
    }
    let i = divs.partition_point(|&d| d <= x);
    Some(i.saturating_sub(1).min(divs.len() - 2))
}

/// Row-major linear index, x fastest
pub(crate) fn linear_index<const D: usize>(index: [usize; D], num_cells: [usize; D]) -> usize {
    let mut linear = 0;
    let mut stride = 1;
    for a in 0..D {
        linear += index[a] * stride;
        stride *= num_cells[a];
    }
    linear
}

/// Grid whose cells each reference one child by ID
#[derive(Debug, Clone, PartialEq)]
pub struct Partition<G> {
    grid: G,
    children: Vec<usize>,
}

pub type RectilinearPartition<const D: usize> = Partition<RectilinearGrid<D>>;
pub type RegularPartition<const D: usize> = Partition<RegularGrid<D>>;

/// Rectangular tiling of coarse cells
pub type Rtm = RectilinearPartition<2>;
/// Regular array of equally pitched RTMs
pub type Lattice = RegularPartition<2>;
/// Axial stack of lattices
pub type Assembly = RectilinearPartition<1>;
/// Rectangular tiling of assemblies
pub type Core = RectilinearPartition<2>;

impl<G> Partition<G> {
    pub fn grid(&self) -> &G {
        &self.grid
    }

    pub fn children(&self) -> &[usize] {
        &self.children
    }
}

impl<const D: usize> Partition<RectilinearGrid<D>> {
    pub(crate) fn new(grid: RectilinearGrid<D>, children: Vec<usize>) -> Result<Self> {
        check_child_count(grid.num_cells(), children.len())?;
        Ok(Self { grid, children })
    }

    /// Child under `point` and `point` in that child's frame
    pub fn child_at(&self, point: [f64; D]) -> Option<(usize, [f64; D])> {
        let (index, local) = self.grid.locate(point)?;
        let child = self.children[linear_index(index, self.grid.num_cells())];
        Some((child, local))
    }
}

impl<const D: usize> Partition<RegularGrid<D>> {
    pub(crate) fn new(grid: RegularGrid<D>, children: Vec<usize>) -> Result<Self> {
        check_child_count(grid.num_cells(), children.len())?;
        Ok(Self { grid, children })
    }

    pub fn child_at(&self, point: [f64; D]) -> Option<(usize, [f64; D])> {
        let (index, local) = self.grid.locate(point)?;
        let child = self.children[linear_index(index, self.grid.num_cells())];
        Some((child, local))
    }
}

fn check_child_count<const D: usize>(num_cells: [usize; D], children: usize) -> Result<()> {
    let expected: usize = num_cells.iter().product();
    if expected != children {
        return Err(Error::InvalidDimensions {
            detail: format!("{num_cells:?} cells but {children} children"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_interval_half_open() {
        let divs = [0.0, 1.0, 3.0];
        assert_eq!(find_interval(&divs, 0.0), Some(0));
        assert_eq!(find_interval(&divs, 0.5), Some(0));
        assert_eq!(find_interval(&divs, 1.0), Some(1));
        assert_eq!(find_interval(&divs, 3.0), Some(1));
        assert_eq!(find_interval(&divs, -0.1), None);
        assert_eq!(find_interval(&divs, 3.1), None);
        assert_eq!(find_interval(&divs, f64::NAN), None);
    }

    #[test]
    fn test_linear_index() {
        assert_eq!(linear_index([2, 1], [3, 2]), 5);
        assert_eq!(linear_index([1, 0, 1], [2, 2, 2]), 5);
        assert_eq!(linear_index([4], [7]), 4);
    }

    #[test]
    fn test_rectilinear_grid() {
        let grid = RectilinearGrid::new([vec![0.0, 1.0, 3.0], vec![0.0, 2.0]]).unwrap();
        assert_eq!(grid.num_cells(), [2, 1]);
        assert_eq!(grid.extents(), [3.0, 2.0]);
        let (index, local) = grid.locate([1.5, 2.0]).unwrap();
        assert_eq!(index, [1, 0]);
        assert_eq!(local, [0.5, 2.0]);
        assert!(grid.locate([1.5, 2.5]).is_none());

        assert!(RectilinearGrid::new([vec![0.0, 0.0]]).is_err());
        assert!(RectilinearGrid::new([vec![0.0]]).is_err());
    }

    #[test]
    fn test_regular_grid() {
        let grid = RegularGrid::new([0.0, 0.0], [2.0, 1.0], [2, 3]).unwrap();
        assert_eq!(grid.extents(), [4.0, 3.0]);
        let (index, local) = grid.locate([2.0, 2.5]).unwrap();
        assert_eq!(index, [1, 2]);
        assert_eq!(local, [0.0, 0.5]);
        assert_eq!(grid.locate([4.0, 3.0]).unwrap().0, [1, 2]);
        assert!(grid.locate([4.1, 0.0]).is_none());

        assert!(RegularGrid::new([0.0], [0.0], [1]).is_err());
        assert!(RegularGrid::new([0.0], [1.0], [0]).is_err());
    }

    #[test]
    fn test_partition_child_at() {
        let grid = RegularGrid::new([0.0, 0.0], [1.0, 1.0], [2, 2]).unwrap();
        let lattice = Lattice::new(grid, vec![10, 11, 12, 13]).unwrap();
        assert_eq!(lattice.child_at([0.5, 0.5]), Some((10, [0.5, 0.5])));
        assert_eq!(lattice.child_at([1.25, 1.5]), Some((13, [0.25, 0.5])));
        assert_eq!(lattice.child_at([-1.0, 0.5]), None);

        let grid = RectilinearGrid::new([vec![-1.0, 0.5, 1.0]]).unwrap();
        let assembly = Assembly::new(grid.clone(), vec![3, 4]).unwrap();
        assert_eq!(assembly.child_at([0.75]), Some((4, [0.25])));
        assert!(Assembly::new(grid, vec![3]).is_err());
    }
}
