// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Flat vertex / normal / polygon buffers produced by an import

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Ordered 0-based vertex indices of one face
pub type Polygon = Vec<u32>;

/// Chunk-order concatenation of everything the scanners produced.
///
/// Because chunks are disjoint and increasing, the order of every buffer
/// here is the order of the records in the source file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MergedGeometry {
    pub vertices: Vec<Point3<f32>>,
    /// Either empty or one normal per `vn` record
    pub normals: Vec<Vector3<f32>>,
    pub polygons: Vec<Polygon>,
}

impl MergedGeometry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(vertex_count: usize, polygon_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            normals: Vec::new(),
            polygons: Vec::with_capacity(polygon_count),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn polygon_count(&self) -> usize {
        self.polygons.len()
    }

    pub fn has_normals(&self) -> bool {
        !self.normals.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Append another batch; its indices must already be global.
    pub fn extend(
        &mut self,
        vertices: Vec<Point3<f32>>,
        normals: Vec<Vector3<f32>>,
        polygons: Vec<Polygon>,
    ) {
        self.vertices.extend(vertices);
        self.normals.extend(normals);
        self.polygons.extend(polygons);
    }

    /// Number of polygon indices that point past the vertex buffer
    pub fn dangling_indices(&self) -> usize {
        let n = self.vertices.len();
        self.polygons
            .iter()
            .flatten()
            .filter(|&&index| index as usize >= n)
            .count()
    }
}
