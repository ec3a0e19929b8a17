// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! I/O module - reading, writing and comparing polytope soups

pub mod abaqus;
pub mod binary;
mod compare;
mod importer;

pub use compare::{compare_soups, GeometryDiff, SoupComparison, TopologyDiff, DEFAULT_TOLERANCE};
pub use importer::{read, write, MeshFormat};
