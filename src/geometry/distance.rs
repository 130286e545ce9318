// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Inter-point distance statistics
//!
//! The indexed variants build one k-d tree over all points and issue a
//! single k-nearest query per point. The brute-force variants compare every
//! pair and exist as a reference for small inputs.

use crate::error::GeometryError;
use kiddo::immutable::float::kdtree::ImmutableKdTree;
use kiddo::SquaredEuclidean;
use nalgebra::Point3;
use std::num::NonZeroUsize;
use tracing::{debug, warn};

fn require_pairs(points: &[Point3<f32>]) -> Result<(), GeometryError> {
    if points.len() < 2 {
        return Err(GeometryError::InsufficientPoints {
            required: 2,
            actual: points.len(),
        });
    }
    Ok(())
}

/// Items are `u32` indices into the indexed slice; leaves hold up to 32 points.
type PointIndex = ImmutableKdTree<f64, u32, 3, 32>;

/// Tree items are indices into `points`. Coincident points and points
/// sharing an axis value are fine.
fn build_index(points: &[Point3<f32>]) -> PointIndex {
    let entries: Vec<[f64; 3]> = points
        .iter()
        .map(|p| [p.x as f64, p.y as f64, p.z as f64])
        .collect();
    ImmutableKdTree::new_from_slice(&entries)
}

fn query(p: &Point3<f32>) -> [f64; 3] {
    [p.x as f64, p.y as f64, p.z as f64]
}

/// Distances from `points[index]` to its `k` nearest other points, closest first.
fn neighbor_distances(
    tree: &PointIndex,
    points: &[Point3<f32>],
    index: usize,
    k: usize,
) -> impl Iterator<Item = f64> {
    // Self may be missing from the result when other points coincide with it.
    let max_qty = NonZeroUsize::MIN.saturating_add(k);
    tree.nearest_n::<SquaredEuclidean>(&query(&points[index]), max_qty)
        .into_iter()
        .filter(move |n| n.item as usize != index)
        .take(k)
        .map(|n| n.distance.sqrt())
}

/// Smallest distance between two distinct points.
///
/// Coincident points yield 0.
pub fn min_inter_vertex_distance(points: &[Point3<f32>]) -> Result<f32, GeometryError> {
    require_pairs(points)?;
    let tree = build_index(points);

    let min = (0..points.len())
        .filter_map(|i| neighbor_distances(&tree, points, i, 1).next())
        .fold(f64::INFINITY, f64::min);

    debug!("min inter-vertex distance over {} points: {}", points.len(), min);
    Ok(min as f32)
}

/// Mean distance from each point to its `k` nearest other points.
///
/// `k` is clamped to `1..=points.len() - 1`.
pub fn mean_nearest_neighbor_distance(
    points: &[Point3<f32>],
    k: usize,
) -> Result<f32, GeometryError> {
    require_pairs(points)?;
    let k = k.clamp(1, points.len() - 1);
    let tree = build_index(points);

    let (sum, count) = (0..points.len())
        .flat_map(|i| neighbor_distances(&tree, points, i, k))
        .fold((0.0f64, 0usize), |(sum, count), d| (sum + d, count + 1));

    Ok((sum / count.max(1) as f64) as f32)
}

fn pairwise_distances(points: &[Point3<f32>]) -> impl Iterator<Item = f64> + '_ {
    points.iter().enumerate().flat_map(move |(i, a)| {
        points[i + 1..]
            .iter()
            .map(move |b| nalgebra::distance(a, b) as f64)
    })
}

/// O(n²) minimum pairwise distance. Not meant for large inputs.
pub fn min_inter_vertex_distance_brute_force(
    points: &[Point3<f32>],
) -> Result<f32, GeometryError> {
    warn!("brute-force min distance over {} points", points.len());
    require_pairs(points)?;
    Ok(pairwise_distances(points).fold(f64::INFINITY, f64::min) as f32)
}

/// O(n²) maximum pairwise distance. Not meant for large inputs.
pub fn max_inter_vertex_distance_brute_force(
    points: &[Point3<f32>],
) -> Result<f32, GeometryError> {
    warn!("brute-force max distance over {} points", points.len());
    require_pairs(points)?;
    Ok(pairwise_distances(points).fold(0.0, f64::max) as f32)
}

/// O(n²) mean over all unordered pairs. Not meant for large inputs.
pub fn mean_inter_vertex_distance_brute_force(
    points: &[Point3<f32>],
) -> Result<f32, GeometryError> {
    warn!("brute-force mean distance over {} points", points.len());
    require_pairs(points)?;
    let (sum, count) = pairwise_distances(points)
        .fold((0.0f64, 0usize), |(sum, count), d| (sum + d, count + 1));
    Ok((sum / count as f64) as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn line() -> Vec<Point3<f32>> {
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(3.0, 0.0, 0.0),
            Point3::new(6.0, 0.0, 0.0),
        ]
    }

    #[test]
    fn test_too_few_points() {
        let one = [Point3::origin()];
        let expected = Err(GeometryError::InsufficientPoints {
            required: 2,
            actual: 1,
        });
        assert_eq!(min_inter_vertex_distance(&one), expected);
        assert_eq!(mean_nearest_neighbor_distance(&one, 6), expected);
        assert!(max_inter_vertex_distance_brute_force(&[]).is_err());
    }

    #[test]
    fn test_min_distance_on_line() {
        let points = line();
        assert_relative_eq!(min_inter_vertex_distance(&points).unwrap(), 1.0);
        assert_relative_eq!(min_inter_vertex_distance_brute_force(&points).unwrap(), 1.0);
        assert_relative_eq!(max_inter_vertex_distance_brute_force(&points).unwrap(), 6.0);
    }

    #[test]
    fn test_coincident_points() {
        let points = vec![Point3::new(2.0, 2.0, 2.0); 3];
        assert_eq!(min_inter_vertex_distance(&points).unwrap(), 0.0);
    }

    #[test]
    fn test_mean_nearest_neighbor() {
        // Nearest other point: 1, 1, 2, 3
        let mean = mean_nearest_neighbor_distance(&line(), 1).unwrap();
        assert_relative_eq!(mean, 7.0 / 4.0);

        // k larger than n - 1 uses every other point
        let all = mean_nearest_neighbor_distance(&line(), 10).unwrap();
        let expected = (1.0 + 3.0 + 6.0) + (1.0 + 2.0 + 5.0) + (3.0 + 2.0 + 3.0) + (6.0 + 5.0 + 3.0);
        assert_relative_eq!(all, expected / 12.0, epsilon = 1e-5);
    }

    #[test]
    fn test_mean_brute_force() {
        // Pairs: 1, 3, 6, 2, 5, 3
        let mean = mean_inter_vertex_distance_brute_force(&line()).unwrap();
        assert_relative_eq!(mean, 20.0 / 6.0, epsilon = 1e-6);
    }

    #[test]
    fn test_indexed_matches_brute_force() {
        let mut rng = StdRng::seed_from_u64(7);
        let points: Vec<Point3<f32>> = (0..200)
            .map(|_| {
                Point3::new(
                    rng.gen_range(-10.0..10.0),
                    rng.gen_range(-10.0..10.0),
                    rng.gen_range(-10.0..10.0),
                )
            })
            .collect();

        let indexed = min_inter_vertex_distance(&points).unwrap();
        let brute = min_inter_vertex_distance_brute_force(&points).unwrap();
        assert_relative_eq!(indexed, brute, epsilon = 1e-5);
    }

    /// Mean over every point of its `k` smallest distances to other points
    fn brute_force_knn_mean(points: &[Point3<f32>], k: usize) -> f32 {
        let mut sum = 0.0f64;
        for (i, a) in points.iter().enumerate() {
            let mut distances: Vec<f64> = points
                .iter()
                .enumerate()
                .filter(|&(j, _)| j != i)
                .map(|(_, b)| nalgebra::distance(a, b) as f64)
                .collect();
            distances.sort_by(f64::total_cmp);
            sum += distances.iter().take(k).sum::<f64>();
        }
        (sum / (points.len() * k) as f64) as f32
    }

    #[test]
    fn test_planar_grid() {
        let points: Vec<Point3<f32>> = (0..50)
            .flat_map(|r| (0..50).map(move |c| Point3::new(c as f32 * 0.5, r as f32 * 0.5, 0.0)))
            .collect();

        let min = min_inter_vertex_distance(&points).unwrap();
        assert_relative_eq!(min, min_inter_vertex_distance_brute_force(&points).unwrap());
        assert_relative_eq!(min, 0.5);

        for k in [1, 4, 6] {
            let mean = mean_nearest_neighbor_distance(&points, k).unwrap();
            assert_relative_eq!(mean, brute_force_knn_mean(&points, k), epsilon = 1e-5);
        }
    }

    #[test]
    fn test_many_coincident_points() {
        let mut points = vec![Point3::new(1.0, -2.0, 3.0); 120];
        assert_eq!(min_inter_vertex_distance(&points).unwrap(), 0.0);
        assert_eq!(mean_nearest_neighbor_distance(&points, 6).unwrap(), 0.0);

        points.push(Point3::new(1.0, -2.0, 5.0));
        let mean = mean_nearest_neighbor_distance(&points, 1).unwrap();
        assert_relative_eq!(mean, brute_force_knn_mean(&points, 1), epsilon = 1e-6);
    }

    #[test]
    fn test_integer_lattice() {
        let points: Vec<Point3<f32>> = (0..8)
            .flat_map(|x| (0..8).flat_map(move |y| (0..8).map(move |z| (x, y, z))))
            .map(|(x, y, z)| Point3::new(x as f32, y as f32, z as f32))
            .collect();

        assert_relative_eq!(min_inter_vertex_distance(&points).unwrap(), 1.0);
        let mean = mean_nearest_neighbor_distance(&points, 6).unwrap();
        assert_relative_eq!(mean, brute_force_knn_mean(&points, 6), epsilon = 1e-5);
    }
}
