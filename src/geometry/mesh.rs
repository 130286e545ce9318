// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Polygon mesh representation and utilities

use super::{estimate_bounding_sphere, BoundingBox, MergedGeometry, Polygon, Sphere};
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Face defined by an ordered loop of vertex indices
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Face {
    pub indices: Polygon,
}

impl Face {
    pub fn new(indices: Polygon) -> Self {
        Self { indices }
    }

    pub fn is_triangle(&self) -> bool {
        self.indices.len() == 3
    }

    /// Undirected edges, wrapping around to the first index
    pub fn edges(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        let n = self.indices.len();
        (0..n).map(move |i| {
            let a = self.indices[i];
            let b = self.indices[(i + 1) % n];
            if a < b {
                (a, b)
            } else {
                (b, a)
            }
        })
    }
}

/// Polygon mesh
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Mesh {
    pub vertices: Vec<Point3<f32>>,
    /// One entry per vertex when present
    pub normals: Option<Vec<Vector3<f32>>>,
    pub faces: Vec<Face>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a mesh from imported buffers.
    ///
    /// Normals are kept only when there is exactly one per vertex, and faces
    /// referencing missing vertices or with fewer than 3 corners are skipped.
    pub fn from_geometry(geometry: &MergedGeometry) -> Self {
        let vertex_count = geometry.vertex_count();
        let normals = (geometry.has_normals() && geometry.normals.len() == vertex_count)
            .then(|| geometry.normals.clone());

        let faces = geometry
            .polygons
            .iter()
            .filter(|p| p.len() >= 3 && p.iter().all(|&i| (i as usize) < vertex_count))
            .cloned()
            .map(Face::new)
            .collect();

        Self {
            vertices: geometry.vertices.clone(),
            normals,
            faces,
        }
    }

    pub fn to_geometry(&self) -> MergedGeometry {
        MergedGeometry {
            vertices: self.vertices.clone(),
            normals: self.normals.clone().unwrap_or_default(),
            polygons: self.faces.iter().map(|f| f.indices.clone()).collect(),
        }
    }

    /// Get vertex count
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get face count
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Number of distinct undirected edges
    pub fn edge_count(&self) -> usize {
        self.faces
            .iter()
            .flat_map(|face| face.edges())
            .collect::<HashSet<_>>()
            .len()
    }

    pub fn is_triangle_mesh(&self) -> bool {
        self.faces.iter().all(Face::is_triangle)
    }

    /// Split every face into a fan around its first corner.
    pub fn triangulate(&mut self) {
        let mut triangles = Vec::with_capacity(self.faces.len());
        for face in &self.faces {
            let idx = &face.indices;
            for i in 1..idx.len().saturating_sub(1) {
                triangles.push(Face::new(vec![idx[0], idx[i], idx[i + 1]]));
            }
        }
        self.faces = triangles;
    }

    /// Compute bounding box
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_points(&self.vertices)
    }

    /// Approximate sphere around all vertices, `None` for an empty mesh
    pub fn bounding_sphere(&self) -> Option<Sphere> {
        estimate_bounding_sphere(&self.vertices).ok()
    }
}
