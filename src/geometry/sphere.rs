// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Approximate bounding sphere
//!
//! Two passes over the points: the first seeds a sphere from the first point
//! and the point farthest from it, the second grows that sphere just enough
//! to swallow every point still outside. The result encloses all points but
//! is generally not minimal.

use crate::error::GeometryError;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// Center and radius
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sphere {
    pub center: Point3<f32>,
    pub radius: f32,
}

impl Sphere {
    pub fn new(center: Point3<f32>, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Sphere enclosing `points`, or `None` when there are none
    pub fn enclosing(points: &[Point3<f32>]) -> Option<Self> {
        estimate_bounding_sphere(points).ok()
    }

    /// Whether `point` lies within `radius + epsilon` of the center
    pub fn contains(&self, point: &Point3<f32>, epsilon: f32) -> bool {
        nalgebra::distance(&self.center, point) <= self.radius + epsilon
    }

    /// Smallest growth of `self` that also encloses `point`.
    fn grow_to_include(&mut self, point: &Point3<f32>) {
        let offset = point - self.center;
        let dist = offset.norm();
        if dist <= self.radius {
            return;
        }
        let new_radius = 0.5 * (self.radius + dist);
        self.center += offset * ((new_radius - self.radius) / dist);
        self.radius = new_radius;
    }
}

/// Estimate a sphere containing every point.
pub fn estimate_bounding_sphere(points: &[Point3<f32>]) -> Result<Sphere, GeometryError> {
    let first = *points.first().ok_or(GeometryError::EmptyInput)?;

    let farthest = points
        .iter()
        .copied()
        .max_by(|a, b| {
            nalgebra::distance_squared(&first, a).total_cmp(&nalgebra::distance_squared(&first, b))
        })
        .unwrap_or(first);

    let center = nalgebra::center(&first, &farthest);
    let mut sphere = Sphere::new(center, nalgebra::distance(&center, &farthest));

    for point in points {
        sphere.grow_to_include(point);
    }

    Ok(sphere)
}
