// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometry module - merged buffers, mesh representation and analytics

mod analytics;
mod bbox;
mod distance;
mod hull;
mod merged;
mod mesh;
mod sphere;

pub use analytics::{analyze_points, PointStats};
pub use bbox::BoundingBox;
pub use distance::{
    max_inter_vertex_distance_brute_force, mean_inter_vertex_distance_brute_force,
    mean_nearest_neighbor_distance, min_inter_vertex_distance,
    min_inter_vertex_distance_brute_force,
};
pub use hull::{convex_hull, try_convex_hull};
pub use merged::{MergedGeometry, Polygon};
pub use mesh::{Face, Mesh};
pub use sphere::{estimate_bounding_sphere, Sphere};
