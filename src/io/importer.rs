// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Soup file import and export, dispatched on file extension

use super::{abaqus, binary};
use crate::error::{Error, Result};
use crate::mesh::PolytopeSoup;
use std::path::Path;
use tracing::info;

/// On-disk soup formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshFormat {
    /// Abaqus `.inp` deck
    Abaqus,
    /// `.json` header with a sibling `.bin` data file
    Binary,
}

impl MeshFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("inp") => Ok(MeshFormat::Abaqus),
            Some("json") => Ok(MeshFormat::Binary),
            _ => Err(Error::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// Read a soup file
pub fn read(path: impl AsRef<Path>) -> Result<PolytopeSoup> {
    let path = path.as_ref();
    let soup = match MeshFormat::from_path(path)? {
        MeshFormat::Abaqus => abaqus::read(path)?,
        MeshFormat::Binary => binary::read(path)?,
    };
    info!(
        path = %path.display(),
        vertices = soup.num_vertices(),
        elements = soup.num_elements(),
        elsets = soup.num_elsets(),
        "Read polytope soup"
    );
    Ok(soup)
}

/// Write a soup file
pub fn write(path: impl AsRef<Path>, soup: &PolytopeSoup) -> Result<()> {
    let path = path.as_ref();
    match MeshFormat::from_path(path)? {
        MeshFormat::Abaqus => abaqus::write(path, soup)?,
        MeshFormat::Binary => binary::write(path, soup)?,
    }
    info!(path = %path.display(), "Wrote polytope soup");
    Ok(())
}
