// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometry comparison utilities for import/export equivalence testing

use crate::geometry::{BoundingBox, MergedGeometry};
use serde::{Deserialize, Serialize};

/// Result of geometry comparison
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeometryComparison {
    pub vertex_count_match: bool,
    pub polygon_count_match: bool,
    pub topology_match: bool,
    pub bbox_match: bool,
    pub vertex_count_diff: i64,
    pub polygon_count_diff: i64,
    /// Largest per-coordinate difference between paired vertices
    pub max_vertex_deviation: f32,
    pub tolerance: f32,
    pub passed: bool,
}

impl GeometryComparison {
    pub fn new() -> Self {
        Self {
            vertex_count_match: false,
            polygon_count_match: false,
            topology_match: false,
            bbox_match: false,
            vertex_count_diff: 0,
            polygon_count_diff: 0,
            max_vertex_deviation: 0.0,
            tolerance: 0.0,
            passed: false,
        }
    }
}

impl Default for GeometryComparison {
    fn default() -> Self {
        Self::new()
    }
}

/// Compare two imports for equivalence
pub fn compare_geometry(
    a: &MergedGeometry,
    b: &MergedGeometry,
    tolerance: f32,
) -> GeometryComparison {
    let mut comparison = GeometryComparison::new();
    comparison.tolerance = tolerance;

    let vertex_diff = a.vertex_count() as i64 - b.vertex_count() as i64;
    comparison.vertex_count_diff = vertex_diff;
    comparison.vertex_count_match = vertex_diff == 0;

    let polygon_diff = a.polygon_count() as i64 - b.polygon_count() as i64;
    comparison.polygon_count_diff = polygon_diff;
    comparison.polygon_count_match = polygon_diff == 0;
    comparison.topology_match = a.polygons == b.polygons;

    let bbox_a = BoundingBox::from_points(&a.vertices);
    let bbox_b = BoundingBox::from_points(&b.vertices);
    comparison.bbox_match = (bbox_a.is_empty() && bbox_b.is_empty())
        || bbox_a.approx_eq(&bbox_b, tolerance);

    comparison.max_vertex_deviation = a
        .vertices
        .iter()
        .zip(&b.vertices)
        .map(|(p, q)| (p - q).amax())
        .fold(0.0, f32::max);

    comparison.passed = comparison.vertex_count_match
        && comparison.polygon_count_match
        && comparison.topology_match
        && comparison.bbox_match
        && comparison.max_vertex_deviation <= tolerance;

    comparison
}

/// Compare point counts with percentage tolerance
pub fn compare_count_with_tolerance(count_a: usize, count_b: usize, tolerance_percent: f32) -> bool {
    if count_a == 0 && count_b == 0 {
        return true;
    }

    let (a, b) = (count_a as f32, count_b as f32);
    let percent_diff = ((a - b).abs() / a.max(b)) * 100.0;

    percent_diff <= tolerance_percent
}
