// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Point set analytics and statistics

use super::{
    convex_hull, estimate_bounding_sphere, mean_nearest_neighbor_distance,
    min_inter_vertex_distance, BoundingBox,
};
use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// Summary of a point set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointStats {
    /// Number of points analyzed
    pub point_count: usize,
    /// Bounding box [min_x, min_y, min_z, max_x, max_y, max_z]
    pub bbox: [f32; 6],
    /// Centroid [x, y, z]
    pub centroid: [f32; 3],
    /// Approximate bounding sphere center [x, y, z]
    pub sphere_center: [f32; 3],
    pub sphere_radius: f32,
    /// Distance between the two closest points
    pub min_distance: Option<f32>,
    /// Mean distance to the `neighbors` nearest points
    pub mean_neighbor_distance: Option<f32>,
    pub neighbors: usize,
    pub hull_vertices: Option<usize>,
    pub hull_triangles: Option<usize>,
}

impl PointStats {
    /// Create empty stats
    pub fn empty(neighbors: usize) -> Self {
        Self {
            point_count: 0,
            bbox: [0.0; 6],
            centroid: [0.0; 3],
            sphere_center: [0.0; 3],
            sphere_radius: 0.0,
            min_distance: None,
            mean_neighbor_distance: None,
            neighbors,
            hull_vertices: None,
            hull_triangles: None,
        }
    }

    /// Pretty print statistics
    pub fn print(&self) {
        let or_dash = |value: Option<f32>| value.map_or_else(|| "-".to_string(), |v| format!("{:.6}", v));
        let count_or_dash = |value: Option<usize>| value.map_or_else(|| "-".to_string(), |v| v.to_string());

        println!("╔══════════════════════════════════════════════════════════╗");
        println!("║              POINT ANALYTICS                             ║");
        println!("╠══════════════════════════════════════════════════════════╣");
        println!("║ Points:          {:>12}                            ║", self.point_count);
        println!(
            "║ Centroid:        ({:>9.3}, {:>9.3}, {:>9.3})      ║",
            self.centroid[0], self.centroid[1], self.centroid[2]
        );
        println!("║                                                          ║");
        println!("║ Bounding Box:                                            ║");
        println!(
            "║   Min: ({:>9.3}, {:>9.3}, {:>9.3})                  ║",
            self.bbox[0], self.bbox[1], self.bbox[2]
        );
        println!(
            "║   Max: ({:>9.3}, {:>9.3}, {:>9.3})                  ║",
            self.bbox[3], self.bbox[4], self.bbox[5]
        );
        println!("║ Bounding Sphere:                                         ║");
        println!(
            "║   Center: ({:>9.3}, {:>9.3}, {:>9.3})               ║",
            self.sphere_center[0], self.sphere_center[1], self.sphere_center[2]
        );
        println!("║   Radius: {:>12.6}                                   ║", self.sphere_radius);
        println!("║                                                          ║");
        println!("║ Min distance:    {:>12}                            ║", or_dash(self.min_distance));
        println!(
            "║ Mean {:>2}-NN:      {:>12}                            ║",
            self.neighbors,
            or_dash(self.mean_neighbor_distance)
        );
        println!("║ Hull vertices:   {:>12}                            ║", count_or_dash(self.hull_vertices));
        println!("║ Hull triangles:  {:>12}                            ║", count_or_dash(self.hull_triangles));
        println!("╚══════════════════════════════════════════════════════════╝");
    }
}

/// Analyze a point set and compute statistics.
///
/// Distance statistics need two points and the hull needs four
/// non-coplanar ones; missing results are left as `None`.
pub fn analyze_points(points: &[Point3<f32>], neighbors: usize) -> PointStats {
    let Ok(sphere) = estimate_bounding_sphere(points) else {
        return PointStats::empty(neighbors);
    };

    let bbox = BoundingBox::from_points(points);
    let hull = convex_hull(points);

    PointStats {
        point_count: points.len(),
        bbox: [
            bbox.min.x, bbox.min.y, bbox.min.z, bbox.max.x, bbox.max.y, bbox.max.z,
        ],
        centroid: calculate_centroid(points),
        sphere_center: [sphere.center.x, sphere.center.y, sphere.center.z],
        sphere_radius: sphere.radius,
        min_distance: min_inter_vertex_distance(points).ok(),
        mean_neighbor_distance: mean_nearest_neighbor_distance(points, neighbors).ok(),
        neighbors,
        hull_vertices: hull.as_ref().map(|h| h.vertex_count()),
        hull_triangles: hull.as_ref().map(|h| h.polygon_count()),
    }
}

/// Calculate centroid (mean position)
fn calculate_centroid(points: &[Point3<f32>]) -> [f32; 3] {
    let mut sum = [0.0f64; 3];
    for p in points {
        sum[0] += p.x as f64;
        sum[1] += p.y as f64;
        sum[2] += p.z as f64;
    }

    let count = points.len().max(1) as f64;
    [
        (sum[0] / count) as f32,
        (sum[1] / count) as f32,
        (sum[2] / count) as f32,
    ]
}
