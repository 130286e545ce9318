// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Convex hull using parry3d

use super::MergedGeometry;
use crate::error::GeometryError;
use nalgebra::Point3;
use parry3d::math::Point as ParryPoint;
use tracing::debug;

/// Triangulated convex hull of `points`.
///
/// Needs at least 4 input points, and the hull must come back with at least
/// 4 vertices and whole triangles.
pub fn try_convex_hull(points: &[Point3<f32>]) -> Result<MergedGeometry, GeometryError> {
    if points.len() < 4 {
        return Err(GeometryError::InsufficientPoints {
            required: 4,
            actual: points.len(),
        });
    }

    let input: Vec<ParryPoint<f32>> = points
        .iter()
        .map(|p| ParryPoint::new(p.x, p.y, p.z))
        .collect();
    let (hull_vertices, triangles) = parry3d::transformation::try_convex_hull(&input)
        .map_err(|err| {
            debug!("convex hull failed: {:?}", err);
            GeometryError::DegenerateHull
        })?;

    if hull_vertices.len() < 4 || triangles.is_empty() {
        return Err(GeometryError::DegenerateHull);
    }

    let vertices = hull_vertices
        .iter()
        .map(|p| Point3::new(p.x, p.y, p.z))
        .collect();
    let polygons = triangles.iter().map(|t| t.to_vec()).collect();

    Ok(MergedGeometry {
        vertices,
        normals: Vec::new(),
        polygons,
    })
}

/// [`try_convex_hull`] without the reason
pub fn convex_hull(points: &[Point3<f32>]) -> Option<MergedGeometry> {
    try_convex_hull(points).ok()
}
