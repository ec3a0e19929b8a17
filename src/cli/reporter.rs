// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! CLI output reporter with colored formatting

use crate::io::{GeometryDiff, SoupComparison, TopologyDiff};
use crate::mesh::{MeshValidation, PolytopeSoup};
use colored::*;
use std::time::Duration;

/// CLI reporter for formatted output
pub struct Reporter;

impl Reporter {
    fn rule() {
        println!("{}", "━".repeat(80).bright_black());
    }

    fn field(name: &str, value: impl std::fmt::Display) {
        println!(
            "  {} {}",
            format!("{name}:").bright_black(),
            value.to_string().cyan()
        );
    }

    /// Summarise a soup: counts, bounding box, mesh type and elsets
    pub fn report_soup(file: &str, soup: &PolytopeSoup, duration: Duration) {
        println!();
        Self::rule();
        println!("{} {}", "File:".bold(), file.cyan());
        Self::rule();
        Self::field("Vertices", soup.num_vertices());
        Self::field("Elements", soup.num_elements());
        Self::field("Mesh type", format!("{:?}", soup.mesh_type()));
        let bbox = soup.bounding_box();
        if !bbox.is_empty() {
            Self::field(
                "Bounds",
                format!(
                    "({:.4}, {:.4}, {:.4}) .. ({:.4}, {:.4}, {:.4})",
                    bbox.min.x, bbox.min.y, bbox.min.z, bbox.max.x, bbox.max.y, bbox.max.z
                ),
            );
        }
        if soup.num_elsets() > 0 {
            println!("\n{}", "Elsets:".bold());
            for elset in soup.elsets() {
                let data = if elset.data.is_empty() { "" } else { " (data)" };
                println!(
                    "  {} {}{}",
                    format!("{}:", elset.name).bright_black(),
                    elset.ids.len().to_string().cyan(),
                    data.bright_black()
                );
            }
        }
        Self::field("Read in", Self::format_duration(duration).yellow());
        Self::rule();
    }

    pub fn report_validation(file: &str, validation: &MeshValidation, materials: Option<usize>) {
        println!();
        Self::rule();
        println!("{} {}", "Validated:".bold(), file.cyan());
        Self::rule();
        Self::field("Faces", validation.num_faces);
        Self::field("Vertices", validation.num_vertices);
        Self::field("Area", format!("{:.6}", validation.total_area));
        if let Some(count) = materials {
            Self::field("Materials", count);
        }
        if validation.orphan_vertices.is_empty() {
            Self::success("All vertices are referenced");
        } else {
            Self::report_warning(&format!(
                "{} vertices are not referenced by any face",
                validation.orphan_vertices.len()
            ));
        }
        Self::rule();
    }

    /// Report comparison result with colors
    pub fn report_comparison(a: &str, b: &str, result: &SoupComparison) {
        println!();
        Self::rule();
        println!("{} {} {} {}", "Compare:".bold(), a.cyan(), "vs".bright_black(), b.cyan());
        Self::rule();

        if result.passed {
            println!("{} {}", "✅".green(), "Soups are equivalent".green().bold());
        } else {
            println!("{} {}", "❌".red(), "Soups differ".red().bold());
        }

        println!("\n{}", "Metrics:".bold());
        let geometry = match result.geometry {
            GeometryDiff::Identical => "identical".green(),
            GeometryDiff::VertexCount => "vertex count differs".red(),
            GeometryDiff::VertexPosition => "vertex positions differ".yellow(),
        };
        let topology = match result.topology {
            TopologyDiff::Identical => "identical".green(),
            TopologyDiff::ElementTypes => "element types differ".red(),
            TopologyDiff::ConnectivityLength => "connectivity length differs".red(),
            TopologyDiff::Connectivity => "connectivity differs".yellow(),
        };
        println!(
            "  {} {} {}",
            "Geometry:".bright_black(),
            geometry,
            format!("(code {})", result.geometry.code()).bright_black()
        );
        println!(
            "  {} {} {}",
            "Topology:".bright_black(),
            topology,
            format!("(code {})", result.topology.code()).bright_black()
        );
        Self::field("Vertex Δ", result.vertex_count_diff);
        Self::field("Element Δ", result.element_count_diff);
        Self::field("Max distance", format!("{:.3e}", result.max_vertex_distance));
        if !result.elset_names_match {
            Self::report_warning("Elset names differ");
        }
        Self::rule();
    }

    /// Report error
    pub fn report_error(message: &str) {
        eprintln!("\n{} {}", "❌ Error:".red().bold(), message);
    }

    /// Report warning
    pub fn report_warning(message: &str) {
        println!("{} {}", "⚠️  Warning:".yellow().bold(), message);
    }

    /// Report info
    pub fn report_info(message: &str) {
        println!("{} {}", "ℹ️".bright_blue(), message);
    }

    /// Format duration for display
    pub fn format_duration(duration: Duration) -> String {
        let micros = duration.as_micros();

        if micros < 1_000 {
            format!("{}µs", micros)
        } else if micros < 1_000_000 {
            format!("{:.2}ms", micros as f64 / 1_000.0)
        } else {
            format!("{:.2}s", micros as f64 / 1_000_000.0)
        }
    }

    /// Print success message
    pub fn success(message: &str) {
        println!("{} {}", "✅".green(), message.green());
    }
}
