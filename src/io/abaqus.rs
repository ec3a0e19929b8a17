// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Abaqus `.inp` reader and writer
//!
//! Supports `*NODE`, `*ELEMENT` (with optional `ELSET=`) and `*ELSET` (with optional
//! `GENERATE`) blocks. Node and element numbers in the file are 1-based labels and need
//! not be contiguous. Elset data values have no representation in this format and are
//! not written.

use crate::error::{Error, Result};
use crate::mesh::{ElementType, PolytopeSoup};
use ahash::AHashMap;
use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;
use std::io::Write;
use std::path::Path;
use tracing::debug;

#[derive(Parser)]
#[grammar = "io/abaqus.pest"]
struct AbaqusParser;

/// Elset IDs per data line when writing
const IDS_PER_LINE: usize = 16;

fn element_type_from_abaqus(name: &str) -> Option<ElementType> {
    match name.to_ascii_uppercase().as_str() {
        "MASS" => Some(ElementType::Vertex),
        "T2D2" | "T3D2" | "B21" => Some(ElementType::Line),
        "T2D3" | "T3D3" | "B22" => Some(ElementType::QuadraticEdge),
        "CPS3" | "CPE3" | "S3" => Some(ElementType::Triangle),
        "CPS4" | "CPE4" | "S4" => Some(ElementType::Quad),
        "CPS6" | "CPE6" | "STRI65" => Some(ElementType::QuadraticTriangle),
        "CPS8" | "CPE8" | "S8R" => Some(ElementType::QuadraticQuad),
        _ => None,
    }
}

fn abaqus_name(element_type: ElementType) -> &'static str {
    match element_type {
        ElementType::Vertex => "MASS",
        ElementType::Line => "T2D2",
        ElementType::QuadraticEdge => "T2D3",
        ElementType::Triangle => "CPS3",
        ElementType::Quad => "CPS4",
        ElementType::QuadraticTriangle => "CPS6",
        ElementType::QuadraticQuad => "CPS8",
    }
}

/// Keyword line of a block, with an upper-cased name
struct Keyword {
    name: String,
    params: Vec<(String, Option<String>)>,
}

impl Keyword {
    fn from_pair(pair: Pair<Rule>) -> Self {
        let mut name = String::new();
        let mut params = Vec::new();
        for part in pair.into_inner() {
            match part.as_rule() {
                Rule::keyword_name => name = part.as_str().to_ascii_uppercase(),
                Rule::param => {
                    let mut kv = part.into_inner();
                    let key = kv.next().map(|k| k.as_str().to_string()).unwrap_or_default();
                    let value = kv.next().map(|v| v.as_str().to_string());
                    params.push((key, value));
                }
                _ => {}
            }
        }
        Self { name, params }
    }

    fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .and_then(|(_, v)| v.as_deref())
    }

    fn flag(&self, key: &str) -> bool {
        self.params.iter().any(|(k, _)| k.eq_ignore_ascii_case(key))
    }
}

#[derive(Default)]
struct DeckBuilder {
    soup: PolytopeSoup,
    nodes: AHashMap<u64, usize>,
    elements: AHashMap<u64, usize>,
    elset_index: AHashMap<String, usize>,
    elsets: Vec<(String, Vec<usize>)>,
}

fn parse_label(field: &str) -> std::result::Result<u64, String> {
    field
        .parse::<u64>()
        .map_err(|_| format!("expected an integer label, found '{field}'"))
}

fn parse_coordinate(field: &str) -> std::result::Result<f64, String> {
    field
        .parse::<f64>()
        .map_err(|_| format!("expected a coordinate, found '{field}'"))
}

impl DeckBuilder {
    fn block(&mut self, pair: Pair<Rule>) -> std::result::Result<(), String> {
        let mut inner = pair.into_inner();
        let keyword = inner
            .next()
            .map(Keyword::from_pair)
            .ok_or("block without keyword")?;
        let lines: Vec<Vec<&str>> = inner
            .filter(|p| p.as_rule() == Rule::data_line)
            .map(|line| line.into_inner().map(|n| n.as_str()).collect())
            .collect();

        match keyword.name.as_str() {
            "NODE" => {
                for fields in &lines {
                    self.node(fields)?;
                }
            }
            "ELEMENT" => self.element_block(&keyword, &lines)?,
            "ELSET" => self.elset_block(&keyword, &lines)?,
            other => debug!(keyword = other, "Skipping unsupported block"),
        }
        Ok(())
    }

    fn node(&mut self, fields: &[&str]) -> std::result::Result<(), String> {
        if !(3..=4).contains(&fields.len()) {
            return Err(format!("node line has {} fields", fields.len()));
        }
        let label = parse_label(fields[0])?;
        let x = parse_coordinate(fields[1])?;
        let y = parse_coordinate(fields[2])?;
        let z = match fields.get(3) {
            Some(field) => parse_coordinate(field)?,
            None => 0.0,
        };
        let id = self.soup.add_vertex(x, y, z);
        if self.nodes.insert(label, id).is_some() {
            return Err(format!("duplicate node label {label}"));
        }
        Ok(())
    }

    fn element_block(
        &mut self,
        keyword: &Keyword,
        lines: &[Vec<&str>],
    ) -> std::result::Result<(), String> {
        let type_name = keyword.param("TYPE").ok_or("*ELEMENT without TYPE")?;
        let element_type = element_type_from_abaqus(type_name)
            .ok_or_else(|| format!("unsupported element type '{type_name}'"))?;
        let elset = keyword.param("ELSET");
        let record_len = element_type.num_vertices() + 1;

        // An element record may continue over several data lines
        let mut pending: Vec<&str> = Vec::new();
        for line in lines {
            pending.extend(line);
            while pending.len() >= record_len {
                let rest = pending.split_off(record_len);
                self.element(element_type, &pending, elset)?;
                pending = rest;
            }
        }
        if !pending.is_empty() {
            return Err(format!("incomplete {type_name} element record"));
        }
        Ok(())
    }

    fn element(
        &mut self,
        element_type: ElementType,
        fields: &[&str],
        elset: Option<&str>,
    ) -> std::result::Result<(), String> {
        let label = parse_label(fields[0])?;
        let vertices = fields[1..]
            .iter()
            .map(|field| {
                let node = parse_label(field)?;
                self.nodes
                    .get(&node)
                    .copied()
                    .ok_or_else(|| format!("element {label} references unknown node {node}"))
            })
            .collect::<std::result::Result<Vec<usize>, String>>()?;
        let id = self
            .soup
            .add_element(element_type, &vertices)
            .map_err(|e| e.to_string())?;
        if self.elements.insert(label, id).is_some() {
            return Err(format!("duplicate element label {label}"));
        }
        if let Some(name) = elset {
            self.elset_ids(name).push(id);
        }
        Ok(())
    }

    fn elset_block(
        &mut self,
        keyword: &Keyword,
        lines: &[Vec<&str>],
    ) -> std::result::Result<(), String> {
        let name = keyword.param("ELSET").ok_or("*ELSET without ELSET name")?;
        let labels = lines
            .iter()
            .flatten()
            .map(|field| parse_label(field))
            .collect::<std::result::Result<Vec<u64>, String>>()?;

        let labels: Vec<u64> = if keyword.flag("GENERATE") {
            if labels.len() % 3 != 0 {
                return Err(format!("elset {name}: GENERATE expects start, end, step"));
            }
            labels
                .chunks(3)
                .flat_map(|c| (c[0]..=c[1]).step_by(c[2].max(1) as usize))
                .collect()
        } else {
            labels
        };

        let mut ids = Vec::with_capacity(labels.len());
        for label in labels {
            let id = self
                .elements
                .get(&label)
                .copied()
                .ok_or_else(|| format!("elset {name} references unknown element {label}"))?;
            ids.push(id);
        }
        self.elset_ids(name).extend(ids);
        Ok(())
    }

    fn elset_ids(&mut self, name: &str) -> &mut Vec<usize> {
        let index = match self.elset_index.get(name) {
            Some(&index) => index,
            None => {
                self.elsets.push((name.to_string(), Vec::new()));
                self.elset_index.insert(name.to_string(), self.elsets.len() - 1);
                self.elsets.len() - 1
            }
        };
        &mut self.elsets[index].1
    }

    fn finish(mut self) -> std::result::Result<PolytopeSoup, String> {
        for (name, mut ids) in std::mem::take(&mut self.elsets) {
            ids.sort_unstable();
            ids.dedup();
            self.soup
                .add_elset(&name, &ids, None)
                .map_err(|e| e.to_string())?;
        }
        Ok(self.soup)
    }
}

/// Parse an Abaqus deck held in memory
pub fn parse(source: &str) -> std::result::Result<PolytopeSoup, String> {
    let deck = AbaqusParser::parse(Rule::deck, source)
        .map_err(|e| e.to_string())?
        .next()
        .ok_or("empty deck")?;

    let mut builder = DeckBuilder::default();
    for block in deck.into_inner().filter(|p| p.as_rule() == Rule::block) {
        builder.block(block)?;
    }
    builder.finish()
}

pub fn read(path: &Path) -> Result<PolytopeSoup> {
    let source = std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&source).map_err(|message| Error::Parse {
        path: path.to_path_buf(),
        message,
    })
}

/// Keyword parameter values end at commas and whitespace, and a leading `*` would read
/// back as a keyword or comment
fn is_writable_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('*')
        && !name.chars().any(|c| c == ',' || c.is_whitespace())
}

/// Write a soup as an Abaqus deck; labels are 1-based positions
pub fn write_deck<W: Write>(out: &mut W, soup: &PolytopeSoup) -> std::io::Result<()> {
    if let Some(elset) = soup.elsets().find(|e| !is_writable_name(e.name)) {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("elset name '{}' is not representable in an Abaqus deck", elset.name),
        ));
    }
    writeln!(out, "*HEADING")?;
    writeln!(out, " coremesh polytope soup")?;

    writeln!(out, "*NODE")?;
    for (i, v) in soup.vertices().iter().enumerate() {
        writeln!(out, "{}, {}, {}, {}", i + 1, v.x, v.y, v.z)?;
    }

    let mut current = None;
    for (i, element) in soup.elements().iter().enumerate() {
        let element_type = element.element_type();
        if current != Some(element_type) {
            writeln!(out, "*ELEMENT, type={}", abaqus_name(element_type))?;
            current = Some(element_type);
        }
        write!(out, "{}", i + 1)?;
        for v in element.vertices() {
            write!(out, ", {}", v + 1)?;
        }
        writeln!(out)?;
    }

    for elset in soup.elsets() {
        writeln!(out, "*ELSET,ELSET={}", elset.name)?;
        for chunk in elset.ids.chunks(IDS_PER_LINE) {
            let line: Vec<String> = chunk.iter().map(|id| (id + 1).to_string()).collect();
            writeln!(out, "{}", line.join(", "))?;
        }
    }
    Ok(())
}

pub fn write(path: &Path, soup: &PolytopeSoup) -> Result<()> {
    if let Some(elset) = soup.elsets().find(|e| !is_writable_name(e.name)) {
        return Err(Error::UnwritableName {
            path: path.to_path_buf(),
            name: elset.name.to_string(),
        });
    }
    let io_error = |source| Error::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = std::fs::File::create(path).map_err(io_error)?;
    let mut out = std::io::BufWriter::new(file);
    write_deck(&mut out, soup).map_err(io_error)?;
    out.flush().map_err(io_error)
}
