// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! OBJ mesh and PLY point-cloud importers

use super::chunk::{partition, ByteRange};
use super::obj::scan_obj_chunk;
use super::orchestrator::{merge_obj_chunks, merge_point_chunks, run_chunks, WorkPlan};
use super::ply::{parse_header, scan_ply_chunk, vertex_lines};
use super::region::{FileRegion, MapBackend};
use crate::error::ImportResult;
use crate::geometry::MergedGeometry;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, warn};

/// Knobs for one import call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportOptions {
    /// Scan chunks on several threads
    pub parallel: bool,
    /// Chunk count override; defaults to the hardware thread count when
    /// parallel and to 1 otherwise
    pub chunks: Option<usize>,
    pub backend: MapBackend,
    /// Return the originating chunk of every vertex
    pub record_chunk_ids: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            parallel: true,
            chunks: None,
            backend: MapBackend::Auto,
            record_chunk_ids: false,
        }
    }
}

impl ImportOptions {
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Self::default()
        }
    }

    pub fn with_chunks(mut self, chunks: usize) -> Self {
        self.chunks = Some(chunks);
        self
    }

    pub fn with_backend(mut self, backend: MapBackend) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_chunk_ids(mut self) -> Self {
        self.record_chunk_ids = true;
        self
    }
}

/// How an import went
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportReport {
    pub chunks: usize,
    pub workers: usize,
    pub bytes: usize,
    pub backend: MapBackend,
    pub malformed_lines: usize,
}

/// Result of [`import_obj`]
#[derive(Debug, Clone)]
pub struct ObjImport {
    pub geometry: MergedGeometry,
    /// Originating chunk per vertex, when requested
    pub chunk_ids: Option<Vec<u32>>,
    pub report: ImportReport,
}

/// Result of [`import_ply_points`]
#[derive(Debug, Clone)]
pub struct PointCloudImport {
    pub points: Vec<Point3<f32>>,
    /// Vertex count announced by the header
    pub declared_vertices: usize,
    pub report: ImportReport,
}

/// Case-insensitive extension check
pub fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
}

/// Import a Wavefront OBJ file.
///
/// Returns `Ok(None)` if `path` does not end in `.obj`.
#[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn import_obj(
    path: impl AsRef<Path>,
    options: &ImportOptions,
) -> ImportResult<Option<ObjImport>> {
    let path = path.as_ref();
    if !has_extension(path, "obj") {
        debug!("not an .obj file, skipping");
        return Ok(None);
    }

    let region = FileRegion::open(path, options.backend)?;
    let data = region.bytes();
    let plan = WorkPlan::new(options.parallel, options.chunks);
    let chunks = partition(data, region.range(), plan.chunks);

    let results = run_chunks(data, &chunks, plan.workers, scan_obj_chunk)?;
    let malformed_lines = results.iter().map(|r| r.malformed_lines).sum();
    let (geometry, chunk_ids) = merge_obj_chunks(results, options.record_chunk_ids);

    let dangling = geometry.dangling_indices();
    if dangling > 0 {
        warn!("{} face index(es) reference missing vertices", dangling);
    }

    let report = ImportReport {
        chunks: chunks.len(),
        workers: plan.workers,
        bytes: data.len(),
        backend: region.backend(),
        malformed_lines,
    };
    info!(
        "imported {} vertices, {} normals, {} faces ({} chunks, {} workers)",
        geometry.vertex_count(),
        geometry.normals.len(),
        geometry.polygon_count(),
        report.chunks,
        report.workers
    );

    Ok(Some(ObjImport {
        geometry,
        chunk_ids,
        report,
    }))
}

/// Import the vertex positions of an ASCII PLY file.
///
/// Returns `Ok(None)` if `path` does not end in `.ply`.
#[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn import_ply_points(
    path: impl AsRef<Path>,
    options: &ImportOptions,
) -> ImportResult<Option<PointCloudImport>> {
    let path = path.as_ref();
    if !has_extension(path, "ply") {
        debug!("not a .ply file, skipping");
        return Ok(None);
    }

    let region = FileRegion::open(path, options.backend)?;
    let data = region.bytes();
    let header = parse_header(data, region.range())?;
    let declared_vertices = header.vertex_count()?;
    let rest = header.data_range(region.range());
    let body = vertex_lines(data, rest, declared_vertices);
    if body.end < rest.end {
        warn!(
            "ignoring {} bytes after the {} declared vertices",
            rest.end - body.end,
            declared_vertices
        );
    }

    let plan = WorkPlan::new(options.parallel, options.chunks);
    let chunks = if body.is_empty() {
        Vec::new()
    } else {
        partition(data, body, plan.chunks)
    };

    let results = run_chunks(data, &chunks, plan.workers, scan_ply_chunk)?;
    let malformed_lines = results.iter().map(|r| r.malformed_lines).sum();
    let points = merge_point_chunks(results);

    if points.len() != declared_vertices {
        warn!(
            "header declares {} vertices but {} were read",
            declared_vertices,
            points.len()
        );
    }

    let report = ImportReport {
        chunks: chunks.len(),
        workers: plan.workers,
        bytes: body.len(),
        backend: region.backend(),
        malformed_lines,
    };
    info!(
        "imported {} points ({} chunks, {} workers)",
        points.len(),
        report.chunks,
        report.workers
    );

    Ok(Some(PointCloudImport {
        points,
        declared_vertices,
        report,
    }))
}

/// Scan an in-memory OBJ buffer with the same chunking as [`import_obj`].
pub fn scan_obj_bytes(data: &[u8], options: &ImportOptions) -> ImportResult<MergedGeometry> {
    let plan = WorkPlan::new(options.parallel, options.chunks);
    let chunks = partition(data, ByteRange::full(data), plan.chunks);
    let results = run_chunks(data, &chunks, plan.workers, scan_obj_chunk)?;
    Ok(merge_obj_chunks(results, false).0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FormatError, ImportError, ResourceError};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn temp_file(suffix: &str, content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::with_suffix(suffix).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_extension_matching() {
        assert!(has_extension(Path::new("a/b/mesh.OBJ"), "obj"));
        assert!(has_extension(Path::new("cloud.Ply"), "ply"));
        assert!(!has_extension(Path::new("mesh.obj.bak"), "obj"));
        assert!(!has_extension(Path::new("mesh"), "obj"));
    }

    #[test]
    fn test_wrong_extension_is_no_result() {
        let file = temp_file(".txt", "v 1 2 3\n");
        assert!(import_obj(file.path(), &ImportOptions::default()).unwrap().is_none());
        assert!(import_ply_points(file.path(), &ImportOptions::default())
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_import_obj_quad() {
        let file = temp_file(
            ".obj",
            "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nvn 0 0 1\nf 1/1/1 2/2/1 3/3/1 4/4/1\n",
        );
        let import = import_obj(file.path(), &ImportOptions::sequential().with_chunk_ids())
            .unwrap()
            .unwrap();

        assert_eq!(import.geometry.vertex_count(), 4);
        assert_eq!(import.geometry.normals.len(), 1);
        assert_eq!(import.geometry.polygons, vec![vec![0, 1, 2, 3]]);
        assert_eq!(import.chunk_ids, Some(vec![0, 0, 0, 0]));
        assert_eq!(import.report.chunks, 1);
        assert_eq!(import.report.workers, 1);
    }

    #[test]
    fn test_import_missing_file() {
        let result = import_obj("/no/such/dir/mesh.obj", &ImportOptions::default());
        assert!(matches!(
            result,
            Err(ImportError::Resource(ResourceError::NotFound { .. }))
        ));
    }

    #[test]
    fn test_import_empty_file() {
        let file = temp_file(".ply", "");
        let result = import_ply_points(file.path(), &ImportOptions::default());
        assert!(matches!(
            result,
            Err(ImportError::Resource(ResourceError::Empty { .. }))
        ));
    }

    #[test]
    fn test_import_ply_points() {
        let file = temp_file(
            ".ply",
            "ply\nformat ascii 1.0\nelement vertex 3\nproperty float x\nproperty float y\n\
             property float z\nend_header\n0 0 0\n1 0 0\n0 1 0\n",
        );
        let import = import_ply_points(file.path(), &ImportOptions::default().with_chunks(3))
            .unwrap()
            .unwrap();

        assert_eq!(import.declared_vertices, 3);
        assert_eq!(
            import.points,
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ]
        );
    }

    #[test]
    fn test_import_ply_format_errors() {
        let file = temp_file(".ply", "ply\nelement vertex 2\n0 0 0\n");
        let result = import_ply_points(file.path(), &ImportOptions::default());
        assert!(matches!(
            result,
            Err(ImportError::Format(FormatError::MissingEndHeader))
        ));

        let file = temp_file(".ply", "ply\nend_header\n0 0 0\n");
        let result = import_ply_points(file.path(), &ImportOptions::default());
        assert!(matches!(
            result,
            Err(ImportError::Format(FormatError::VertexCountMissing))
        ));
    }

    #[test]
    fn test_import_ply_declared_zero() {
        let file = temp_file(".ply", "ply\nelement vertex 0\nend_header\n");
        let import = import_ply_points(file.path(), &ImportOptions::default())
            .unwrap()
            .unwrap();
        assert!(import.points.is_empty());
        assert_eq!(import.report.chunks, 0);
    }

    #[test]
    fn test_scan_obj_bytes_matches_file_import() {
        let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nv 0 0 1\nf 1 2 3\nf 1 3 4\nf 1 4 2\nf 2 4 3\n";
        let file = temp_file(".obj", text);

        let from_file = import_obj(file.path(), &ImportOptions::default().with_chunks(4))
            .unwrap()
            .unwrap();
        let from_bytes =
            scan_obj_bytes(text.as_bytes(), &ImportOptions::default().with_chunks(4)).unwrap();
        assert_eq!(from_file.geometry, from_bytes);
    }

    #[test]
    fn test_import_ply_ignores_face_body() {
        let file = temp_file(
            ".ply",
            "ply\nformat ascii 1.0\nelement vertex 4\nproperty float x\nproperty float y\n\
             property float z\nelement face 2\nproperty list uchar int vertex_indices\n\
             end_header\n0 0 0\n1 0 0\n0 1 0\n0 0 1\n3 0 1 2\n3 0 2 3\n",
        );

        for chunks in [1, 2, 4, 7] {
            let options = ImportOptions::default().with_chunks(chunks);
            let import = import_ply_points(file.path(), &options).unwrap().unwrap();
            assert_eq!(import.points.len(), 4);
            assert_eq!(import.points[3], Point3::new(0.0, 0.0, 1.0));
            assert_eq!(import.report.malformed_lines, 0);
        }
    }
}
