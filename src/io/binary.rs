// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Paired JSON header + little-endian binary arrays
//!
//! `mesh.json` describes the soup and names a sibling data file (`mesh.bin`) holding, in
//! order: vertex coordinates (`3 * V` f64), element VTK type ids (`E` u8), connectivity
//! (u64), elset IDs (u64) and the data of every elset that carries data (f64).

use crate::error::{Error, Result};
use crate::mesh::{Element, ElementType, PolytopeSoup};
use serde::{Deserialize, Serialize};
use std::path::Path;

const FORMAT: &str = "coremesh-soup";
const VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoupHeader {
    pub format: String,
    pub version: u32,
    /// Data file name, relative to the header's directory
    pub data_file: String,
    pub num_vertices: usize,
    pub num_elements: usize,
    pub connectivity_len: usize,
    pub elsets: Vec<ElsetHeader>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElsetHeader {
    pub name: String,
    pub len: usize,
    pub has_data: bool,
}

/// Encode a soup into its header and data bytes
pub fn encode(soup: &PolytopeSoup, data_file: &str) -> (SoupHeader, Vec<u8>) {
    let mut bytes = Vec::new();
    for v in soup.vertices() {
        for c in [v.x, v.y, v.z] {
            bytes.extend_from_slice(&c.to_le_bytes());
        }
    }
    for element in soup.elements() {
        bytes.push(element.element_type().vtk_id());
    }
    let mut connectivity_len = 0;
    for element in soup.elements() {
        for &v in element.vertices() {
            bytes.extend_from_slice(&(v as u64).to_le_bytes());
        }
        connectivity_len += element.vertices().len();
    }
    let mut elsets = Vec::with_capacity(soup.num_elsets());
    for elset in soup.elsets() {
        for &id in elset.ids {
            bytes.extend_from_slice(&(id as u64).to_le_bytes());
        }
        elsets.push(ElsetHeader {
            name: elset.name.to_string(),
            len: elset.ids.len(),
            has_data: !elset.data.is_empty(),
        });
    }
    for elset in soup.elsets() {
        for &value in elset.data {
            bytes.extend_from_slice(&value.to_le_bytes());
        }
    }

    let header = SoupHeader {
        format: FORMAT.to_string(),
        version: VERSION,
        data_file: data_file.to_string(),
        num_vertices: soup.num_vertices(),
        num_elements: soup.num_elements(),
        connectivity_len,
        elsets,
    };
    (header, bytes)
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn take<const K: usize>(&mut self) -> std::result::Result<[u8; K], String> {
        let end = self.pos + K;
        let slice = self
            .bytes
            .get(self.pos..end)
            .ok_or_else(|| format!("data ends at byte {}, expected more", self.bytes.len()))?;
        self.pos = end;
        let mut out = [0u8; K];
        out.copy_from_slice(slice);
        Ok(out)
    }

    fn f64(&mut self) -> std::result::Result<f64, String> {
        self.take::<8>().map(f64::from_le_bytes)
    }

    fn index(&mut self) -> std::result::Result<usize, String> {
        let value = u64::from_le_bytes(self.take::<8>()?);
        usize::try_from(value).map_err(|_| format!("index {value} does not fit in usize"))
    }

    fn u8(&mut self) -> std::result::Result<u8, String> {
        self.take::<1>().map(|b| b[0])
    }
}

/// Byte length of the data file a header describes, `None` on overflow
fn data_len(header: &SoupHeader) -> Option<usize> {
    let mut words = header.num_vertices.checked_mul(3)?;
    words = words.checked_add(header.connectivity_len)?;
    for elset in &header.elsets {
        let per_id = if elset.has_data { 2 } else { 1 };
        words = words.checked_add(elset.len.checked_mul(per_id)?)?;
    }
    words.checked_mul(8)?.checked_add(header.num_elements)
}

/// Rebuild a soup from its header and data bytes
pub fn decode(header: &SoupHeader, bytes: &[u8]) -> std::result::Result<PolytopeSoup, String> {
    if header.format != FORMAT {
        return Err(format!("unknown format '{}'", header.format));
    }
    if header.version != VERSION {
        return Err(format!("unsupported version {}", header.version));
    }

    // Sizes come from an untrusted header; check them before allocating anything
    match data_len(header) {
        Some(len) if len == bytes.len() => {}
        Some(len) => {
            return Err(format!(
                "data file has {} bytes, header describes {len}",
                bytes.len()
            ))
        }
        None => return Err("header array sizes overflow".to_string()),
    }

    let mut reader = Reader { bytes, pos: 0 };
    let mut soup = PolytopeSoup::with_capacity(header.num_vertices, header.num_elements);
    for _ in 0..header.num_vertices {
        let (x, y, z) = (reader.f64()?, reader.f64()?, reader.f64()?);
        soup.add_vertex(x, y, z);
    }

    let mut types = Vec::with_capacity(header.num_elements);
    for _ in 0..header.num_elements {
        let id = reader.u8()?;
        types.push(ElementType::from_vtk_id(id).ok_or_else(|| format!("unknown VTK type {id}"))?);
    }
    let expected_len: usize = types.iter().map(|t| t.num_vertices()).sum();
    if expected_len != header.connectivity_len {
        return Err(format!(
            "connectivity length {} does not match element types ({expected_len})",
            header.connectivity_len
        ));
    }
    for element_type in types {
        let mut vertices = [0usize; 8];
        let n = element_type.num_vertices();
        for slot in vertices.iter_mut().take(n) {
            let v = reader.index()?;
            if v >= header.num_vertices {
                return Err(format!("vertex {v} out of range"));
            }
            *slot = v;
        }
        let element = Element::new(element_type, &vertices[..n]).map_err(|e| e.to_string())?;
        soup.push_element(element);
    }

    let mut ids = Vec::with_capacity(header.elsets.len());
    for elset in &header.elsets {
        let elset_ids = (0..elset.len)
            .map(|_| reader.index())
            .collect::<std::result::Result<Vec<usize>, String>>()?;
        ids.push(elset_ids);
    }
    for (elset, elset_ids) in header.elsets.iter().zip(ids) {
        let data = if elset.has_data {
            (0..elset.len)
                .map(|_| reader.f64())
                .collect::<std::result::Result<Vec<f64>, String>>()?
        } else {
            Vec::new()
        };
        let data = elset.has_data.then_some(data.as_slice());
        soup.add_elset(&elset.name, &elset_ids, data)
            .map_err(|e| e.to_string())?;
    }

    if reader.pos != bytes.len() {
        return Err(format!(
            "{} trailing bytes after the last array",
            bytes.len() - reader.pos
        ));
    }
    Ok(soup)
}

pub fn read(path: &Path) -> Result<PolytopeSoup> {
    let parse_error = |message: String| Error::Parse {
        path: path.to_path_buf(),
        message,
    };

    let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let header: SoupHeader =
        serde_json::from_str(&text).map_err(|e| parse_error(e.to_string()))?;
    let data_path = path
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(&header.data_file);
    let bytes = std::fs::read(&data_path).map_err(|source| Error::Io {
        path: data_path.clone(),
        source,
    })?;
    decode(&header, &bytes).map_err(parse_error)
}

/// Write `path` (the JSON header) and its sibling `.bin` data file
pub fn write(path: &Path, soup: &PolytopeSoup) -> Result<()> {
    let data_path = path.with_extension("bin");
    let data_file = data_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| Error::UnsupportedFormat {
            path: path.to_path_buf(),
        })?;
    let (header, bytes) = encode(soup, &data_file);

    let json = serde_json::to_string_pretty(&header).map_err(|e| Error::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    std::fs::write(&data_path, bytes).map_err(|source| Error::Io {
        path: data_path.clone(),
        source,
    })?;
    std::fs::write(path, json).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn soup() -> PolytopeSoup {
        let mut soup = PolytopeSoup::new();
        soup.add_vertex(0.0, 0.0, 0.0);
        soup.add_vertex(1.0, 0.0, 0.5);
        soup.add_vertex(0.0, 1.0, -0.25);
        soup.add_element(ElementType::Triangle, &[0, 1, 2]).unwrap();
        soup.add_element(ElementType::Line, &[2, 0]).unwrap();
        soup.add_elset("edges", &[1], Some(&[0.125])).unwrap();
        soup.add_elset("all", &[0, 1], None).unwrap();
        soup
    }

    #[test]
    fn test_encode_decode() {
        let soup = soup();
        let (header, bytes) = encode(&soup, "soup.bin");
        assert_eq!(header.connectivity_len, 5);
        assert_eq!(bytes.len(), 9 * 8 + 2 + 5 * 8 + 3 * 8 + 8);
        assert_eq!(decode(&header, &bytes).unwrap(), soup);
    }

    #[test]
    fn test_decode_rejects_truncated_data() {
        let soup = soup();
        let (header, bytes) = encode(&soup, "soup.bin");
        assert!(decode(&header, &bytes[..bytes.len() - 1]).is_err());

        let mut extra = bytes.clone();
        extra.push(0);
        assert!(decode(&header, &extra).is_err());

        let mut bad = header.clone();
        bad.format = "other".into();
        assert!(decode(&bad, &bytes).is_err());
    }

    #[test]
    fn test_decode_rejects_oversized_header() {
        let (header, bytes) = encode(&soup(), "soup.bin");

        let mut huge = header.clone();
        huge.num_vertices = 1_000_000_000_000;
        let err = decode(&huge, &[]).unwrap_err();
        assert!(err.contains("header describes"), "{err}");

        let mut overflow = header.clone();
        overflow.num_vertices = usize::MAX / 2;
        assert_eq!(
            decode(&overflow, &bytes).unwrap_err(),
            "header array sizes overflow"
        );

        let mut elset = header;
        elset.elsets[0].len = usize::MAX;
        assert!(decode(&elset, &bytes).is_err());
    }
}
