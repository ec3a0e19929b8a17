// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! End-to-end partition construction: coarse grid, mesh import and point location

use anyhow::Result;
use approx::assert_relative_eq;
use coremesh::io;
use coremesh::partition::{coarse_cell_elset_name, Material, SpatialPartition};
use coremesh::{ElementType, ErrorKind, MeshType, PolytopeSoup};
use nalgebra::{Point3, Vector2};

/// 2 x 1 model: the left cell is a fuel quad with a water quad beside it inside the same
/// cell, the right cell is two water triangles. Cells are 2 x 2 and the model sits at
/// (10, 5) in world coordinates.
fn model_soup() -> PolytopeSoup {
    let mut soup = PolytopeSoup::new();
    let (x0, y0) = (10.0, 5.0);
    for (x, y) in [
        (0.0, 0.0),
        (1.0, 0.0),
        (1.0, 2.0),
        (0.0, 2.0),
        (2.0, 0.0),
        (2.0, 2.0),
        (4.0, 0.0),
        (4.0, 2.0),
    ] {
        soup.add_vertex(x0 + x, y0 + y, 0.0);
    }
    soup.add_element(ElementType::Quad, &[0, 1, 2, 3]).unwrap();
    soup.add_element(ElementType::Quad, &[1, 4, 5, 2]).unwrap();
    soup.add_element(ElementType::Triangle, &[4, 6, 7]).unwrap();
    soup.add_element(ElementType::Triangle, &[4, 7, 5]).unwrap();
    soup.add_elset(&coarse_cell_elset_name(0), &[0, 1], None)
        .unwrap();
    soup.add_elset(&coarse_cell_elset_name(1), &[2, 3], None)
        .unwrap();
    soup.add_elset("Material_Fuel", &[0], None).unwrap();
    soup.add_elset("Material_Water", &[1, 2, 3], None).unwrap();
    soup
}

fn coarse_partition() -> SpatialPartition {
    let mut partition = SpatialPartition::new();
    partition.add_material(Material::new("Water")).unwrap();
    partition.add_material(Material::new("Fuel")).unwrap();
    partition
        .add_coarse_grid(Vector2::new(4.0, 2.0), [2, 1])
        .unwrap();
    partition
}

#[test]
fn test_import_and_locate() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("model.inp");
    io::write(&path, &model_soup())?;

    let mut partition = coarse_partition();
    partition.import_coarse_cell_meshes(&path)?;

    let cells = partition.coarse_cells();
    assert!(cells.iter().all(|c| c.is_assigned()));
    assert_eq!(cells[0].mesh.map(|m| m.mesh_type), Some(MeshType::Quad));
    assert_eq!(cells[1].mesh.map(|m| m.mesh_type), Some(MeshType::Tri));
    assert_eq!(cells[0].material_ids, vec![1, 0]);
    assert_eq!(cells[1].material_ids, vec![0, 0]);

    let location = partition
        .locate(&Point3::new(0.5, 1.0, 0.0))?
        .expect("inside the core");
    assert_eq!(location.coarse_cell, 0);
    assert_eq!(location.face, Some(0));
    assert_eq!(location.material, Some(1));

    let location = partition
        .locate(&Point3::new(3.5, 0.25, -0.5))?
        .expect("inside the core");
    assert_eq!(location.rtm, 1);
    assert_eq!(location.coarse_cell, 1);
    assert_relative_eq!(location.local[0], 1.5);
    assert_relative_eq!(location.local[1], 0.25);
    assert_eq!(location.face, Some(0));

    assert_eq!(partition.material_at(&Point3::new(1.5, 1.0, 0.0))?, Some(0));
    assert_eq!(partition.material_at(&Point3::new(4.5, 1.0, 0.0))?, None);
    assert_eq!(partition.material_at(&Point3::new(1.0, 1.0, 2.0))?, None);
    Ok(())
}

#[test]
fn test_import_templates_are_cell_local() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("model.json");
    io::write(&path, &model_soup())?;

    let mut partition = coarse_partition();
    partition.import_coarse_cell_meshes(&path)?;

    for cell in partition.coarse_cells() {
        let mesh = partition.mesh(cell.mesh.expect("bound"))?;
        let bbox = mesh.bounding_box();
        assert_relative_eq!(bbox.min.x, 0.0);
        assert_relative_eq!(bbox.min.y, 0.0);
        assert_relative_eq!(bbox.max.x, cell.dxdy.x);
        assert_relative_eq!(bbox.max.y, cell.dxdy.y);
        let area: f64 = (0..mesh.num_faces()).map(|f| mesh.face_area(f)).sum();
        assert_relative_eq!(area, 4.0, epsilon = 1e-12);
    }
    Ok(())
}

#[test]
fn test_import_failures_leave_cells_unassigned() -> Result<()> {
    let dir = tempfile::tempdir()?;

    // Missing the second cell's elset
    let mut soup = model_soup();
    let keep: Vec<usize> = (0..soup.num_elements()).collect();
    let mut partial = PolytopeSoup::new();
    for v in soup.vertices() {
        partial.add_vertex(v.x, v.y, v.z);
    }
    for element in soup.elements() {
        partial.push_element(*element);
    }
    partial.add_elset(&coarse_cell_elset_name(0), &[0, 1], None)?;
    partial.add_elset("Material_Fuel", &[0], None)?;
    partial.add_elset("Material_Water", &keep[1..], None)?;
    let path = dir.path().join("partial.inp");
    io::write(&path, &partial)?;

    let mut partition = coarse_partition();
    let err = partition.import_coarse_cell_meshes(&path).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Lookup);
    assert!(partition.coarse_cells().iter().all(|c| !c.is_assigned()));

    // An element claimed by two materials
    soup.add_elset("Material_Extra", &[2], None)?;
    let path = dir.path().join("overlap.inp");
    io::write(&path, &soup)?;
    let mut partition = coarse_partition();
    partition.add_material(Material::new("Extra"))?;
    let err = partition.import_coarse_cell_meshes(&path).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DataIntegrity);
    Ok(())
}

#[test]
fn test_hand_built_hierarchy() -> Result<()> {
    let mut partition = SpatialPartition::new();
    let fuel = partition.add_material(Material::new("UO2"))?;
    let pitch = Vector2::new(1.26, 1.26);
    let pin = partition.make_rectangular_pin_mesh(pitch, 3, 3)?;
    let cell = partition.make_coarse_cell(pitch, Some(pin), vec![fuel; 9])?;
    let rtm = partition.make_rtm(&[vec![cell, cell], vec![cell, cell]])?;
    let lattice = partition.make_lattice(&vec![vec![rtm; 3]; 3])?;
    let assembly = partition.make_assembly(&[lattice, lattice], &[0.0, 100.0, 200.0])?;
    partition.make_core(&[vec![assembly; 2]])?;

    let core = partition.core().expect("core");
    let extents = core.grid().extents();
    assert_relative_eq!(extents[0], 2.0 * 3.0 * 2.0 * 1.26, epsilon = 1e-9);
    assert_relative_eq!(extents[1], 3.0 * 2.0 * 1.26, epsilon = 1e-9);

    let location = partition
        .locate(&Point3::new(8.0, 3.0, 150.0))?
        .expect("inside");
    assert_eq!(location.assembly, assembly);
    assert_eq!(location.coarse_cell, cell);
    assert_eq!(location.material, Some(fuel));
    assert!(location.face.is_some());
    Ok(())
}
