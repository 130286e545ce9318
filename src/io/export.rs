// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Text exporters for merged geometry: OBJ, ASCII PLY and legacy VTK

use super::importer::has_extension;
use crate::error::ExportError;
use crate::geometry::MergedGeometry;
use nalgebra::Point3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

fn create(path: &Path) -> Result<BufWriter<File>, ExportError> {
    Ok(BufWriter::new(File::create(path)?))
}

fn require_extension(path: &Path, expected: &'static str) -> Result<(), ExportError> {
    if has_extension(path, expected) {
        Ok(())
    } else {
        Err(ExportError::InvalidExtension {
            path: path.to_path_buf(),
            expected,
        })
    }
}

/// Write vertices, normals and faces as Wavefront OBJ (1-based indices).
pub fn export_obj(geometry: &MergedGeometry, path: impl AsRef<Path>) -> Result<(), ExportError> {
    let path = path.as_ref();
    let mut out = create(path)?;

    for v in &geometry.vertices {
        writeln!(out, "v {} {} {}", v.x, v.y, v.z)?;
    }
    for n in &geometry.normals {
        writeln!(out, "vn {} {} {}", n.x, n.y, n.z)?;
    }
    for polygon in &geometry.polygons {
        write!(out, "f")?;
        for index in polygon {
            write!(out, " {}", index + 1)?;
        }
        writeln!(out)?;
    }

    out.flush()?;
    debug!("wrote {} ({} vertices)", path.display(), geometry.vertex_count());
    Ok(())
}

/// Write legacy VTK polydata (0-based indices, normals as point data).
pub fn export_vtk(geometry: &MergedGeometry, path: impl AsRef<Path>) -> Result<(), ExportError> {
    let path = path.as_ref();
    let mut out = create(path)?;

    writeln!(out, "# vtk DataFile Version 3.0")?;
    writeln!(out, "VTK output from mesh data")?;
    writeln!(out, "ASCII")?;
    writeln!(out, "DATASET POLYDATA")?;

    writeln!(out, "POINTS {} float", geometry.vertex_count())?;
    for v in &geometry.vertices {
        writeln!(out, "{} {} {}", v.x, v.y, v.z)?;
    }

    // Each polygon row carries its own size.
    let index_total: usize = geometry.polygons.iter().map(|p| p.len() + 1).sum();
    writeln!(out, "POLYGONS {} {}", geometry.polygon_count(), index_total)?;
    for polygon in &geometry.polygons {
        write!(out, "{}", polygon.len())?;
        for index in polygon {
            write!(out, " {}", index)?;
        }
        writeln!(out)?;
    }

    if geometry.has_normals() {
        writeln!(out, "POINT_DATA {}", geometry.normals.len())?;
        writeln!(out, "NORMALS normals float")?;
        for n in &geometry.normals {
            writeln!(out, "{} {} {}", n.x, n.y, n.z)?;
        }
    }

    out.flush()?;
    Ok(())
}

fn write_ply_points<'a>(
    path: &Path,
    count: usize,
    points: impl Iterator<Item = &'a Point3<f32>>,
) -> Result<(), ExportError> {
    let mut out = create(path)?;

    writeln!(out, "ply")?;
    writeln!(out, "format ascii 1.0")?;
    writeln!(out, "element vertex {}", count)?;
    writeln!(out, "property float x")?;
    writeln!(out, "property float y")?;
    writeln!(out, "property float z")?;
    writeln!(out, "end_header")?;
    for p in points {
        writeln!(out, "{} {} {}", p.x, p.y, p.z)?;
    }

    out.flush()?;
    Ok(())
}

/// Write every vertex as an ASCII PLY point cloud.
pub fn export_points_ply(
    geometry: &MergedGeometry,
    path: impl AsRef<Path>,
) -> Result<(), ExportError> {
    let path = path.as_ref();
    require_extension(path, "ply")?;
    if geometry.vertices.is_empty() {
        return Err(ExportError::NothingToWrite("no vertices"));
    }
    write_ply_points(path, geometry.vertex_count(), geometry.vertices.iter())
}

/// Write `count` vertices drawn uniformly with replacement as ASCII PLY.
///
/// A fixed `seed` makes the sample reproducible.
pub fn export_sampled_points_ply(
    geometry: &MergedGeometry,
    count: usize,
    path: impl AsRef<Path>,
    seed: Option<u64>,
) -> Result<(), ExportError> {
    let path = path.as_ref();
    require_extension(path, "ply")?;
    if geometry.vertices.is_empty() {
        return Err(ExportError::NothingToWrite("no vertices to sample"));
    }

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let n = geometry.vertex_count();
    let samples: Vec<&Point3<f32>> = (0..count)
        .map(|_| &geometry.vertices[rng.gen_range(0..n)])
        .collect();

    write_ply_points(path, count, samples.into_iter())
}

/// Write polylines as OBJ vertices joined by `l` segments.
pub fn export_polylines_obj(
    polylines: &[Vec<Point3<f32>>],
    path: impl AsRef<Path>,
) -> Result<(), ExportError> {
    let path = path.as_ref();
    require_extension(path, "obj")?;
    let mut out = create(path)?;

    for v in polylines.iter().flatten() {
        writeln!(out, "v {} {} {}", v.x, v.y, v.z)?;
    }

    let mut offset = 1;
    for polyline in polylines {
        for i in 1..polyline.len() {
            writeln!(out, "l {} {}", offset + i - 1, offset + i)?;
        }
        offset += polyline.len();
    }

    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;
    use tempfile::TempDir;

    fn triangle() -> MergedGeometry {
        MergedGeometry {
            vertices: vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            normals: vec![Vector3::z(); 3],
            polygons: vec![vec![0, 1, 2]],
        }
    }

    #[test]
    fn test_obj_text() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("tri.obj");
        export_obj(&triangle(), &path)?;

        let text = std::fs::read_to_string(&path)?;
        assert!(text.starts_with("v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 1\n"));
        assert!(text.ends_with("f 1 2 3\n"));
        Ok(())
    }

    #[test]
    fn test_vtk_text() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("tri.vtk");
        export_vtk(&triangle(), &path)?;

        let text = std::fs::read_to_string(&path)?;
        assert!(text.contains("POINTS 3 float\n"));
        assert!(text.contains("POLYGONS 1 4\n3 0 1 2\n"));
        assert!(text.contains("POINT_DATA 3\nNORMALS normals float\n"));
        Ok(())
    }

    #[test]
    fn test_ply_requires_extension_and_points() -> anyhow::Result<()> {
        let dir = TempDir::new()?;

        let wrong = export_points_ply(&triangle(), dir.path().join("tri.obj"));
        assert!(matches!(wrong, Err(ExportError::InvalidExtension { .. })));

        let empty = export_points_ply(&MergedGeometry::new(), dir.path().join("none.ply"));
        assert!(matches!(empty, Err(ExportError::NothingToWrite(_))));
        Ok(())
    }

    #[test]
    fn test_sampled_ply_is_reproducible() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let a = dir.path().join("a.ply");
        let b = dir.path().join("b.ply");

        export_sampled_points_ply(&triangle(), 10, &a, Some(42))?;
        export_sampled_points_ply(&triangle(), 10, &b, Some(42))?;

        let text = std::fs::read_to_string(&a)?;
        assert_eq!(text, std::fs::read_to_string(&b)?);
        assert!(text.contains("element vertex 10\n"));
        assert_eq!(text.lines().count(), 7 + 10);
        Ok(())
    }

    #[test]
    fn test_polylines() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("lines.obj");
        let polylines = vec![
            vec![Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0), Point3::new(2.0, 0.0, 0.0)],
            vec![Point3::new(5.0, 5.0, 5.0)],
            vec![Point3::new(0.0, 1.0, 0.0), Point3::new(0.0, 2.0, 0.0)],
        ];
        export_polylines_obj(&polylines, &path)?;

        let text = std::fs::read_to_string(&path)?;
        let segments: Vec<&str> = text.lines().filter(|l| l.starts_with("l ")).collect();
        assert_eq!(segments, vec!["l 1 2", "l 2 3", "l 5 6"]);
        Ok(())
    }
}
