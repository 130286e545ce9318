// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Wavefront OBJ chunk scanner
//!
//! Only `v`, `vn` and `f` records are read. Everything else (comments,
//! groups, materials, smoothing, texture coordinates) is skipped line by line.

use super::chunk::ByteRange;
use super::cursor::ByteCursor;
use crate::error::{LineKind, PartialParseError};
use crate::geometry::Polygon;
use nalgebra::{Point3, Vector3};
use tracing::{debug, warn};

/// What one worker extracted from its chunk
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChunkResult {
    pub vertices: Vec<Point3<f32>>,
    pub normals: Vec<Vector3<f32>>,
    /// Faces with 0-based indices in the file's global vertex numbering
    pub polygons: Vec<Polygon>,
    /// Lines that were only partially understood
    pub malformed_lines: usize,
}

/// Scan every complete line of `range`.
///
/// Malformed records never abort the chunk. A vertex or normal line with
/// fewer than three readable fields is still stored, zero-filled, so the
/// global vertex numbering seen by face records stays intact.
pub fn scan_obj_chunk(data: &[u8], range: ByteRange) -> ChunkResult {
    let mut result = ChunkResult::default();
    let mut cursor = ByteCursor::new(data, range);

    while !cursor.is_at_end() {
        let line_start = cursor.position();

        if cursor.starts_with(b"v ") || cursor.starts_with(b"vn ") {
            let kind = if cursor.starts_with(b"vn ") {
                cursor.advance(3);
                LineKind::Normal
            } else {
                cursor.advance(2);
                LineKind::Vertex
            };

            let (xyz, complete) = read_triplet(&mut cursor);
            if !complete {
                report(&mut result, line_start, kind, "expected three numeric fields");
            }
            match kind {
                LineKind::Normal => result.normals.push(Vector3::from(xyz)),
                _ => result.vertices.push(Point3::from(xyz)),
            }
        } else if cursor.starts_with(b"f ") {
            cursor.advance(2);
            let (polygon, complete) = read_face(&mut cursor);
            if !complete {
                report(&mut result, line_start, LineKind::Face, "unreadable vertex index");
            }
            if !polygon.is_empty() {
                result.polygons.push(polygon);
            }
        }

        cursor.skip_line();
    }

    if result.malformed_lines > 0 {
        warn!(
            "chunk {}..{}: {} malformed line(s) recovered",
            range.start, range.end, result.malformed_lines
        );
    }
    debug!(
        "chunk {}..{}: {} vertices, {} normals, {} faces",
        range.start,
        range.end,
        result.vertices.len(),
        result.normals.len(),
        result.polygons.len()
    );

    result
}

fn report(result: &mut ChunkResult, offset: usize, kind: LineKind, reason: &'static str) {
    result.malformed_lines += 1;
    debug!("{}", PartialParseError { offset, kind, reason });
}

/// Up to three floats; stops at the first field that does not parse.
fn read_triplet(cursor: &mut ByteCursor<'_>) -> ([f32; 3], bool) {
    let mut xyz = [0.0f32; 3];
    for slot in xyz.iter_mut() {
        match cursor.parse_f32() {
            Some(value) => *slot = value,
            None => return (xyz, false),
        }
    }
    (xyz, true)
}

/// Vertex indices of one face record; texture and normal sub-indices are
/// stepped over and dropped.
fn read_face(cursor: &mut ByteCursor<'_>) -> (Polygon, bool) {
    let mut polygon = Polygon::new();

    loop {
        cursor.skip_blanks();
        if cursor.at_line_end() {
            let complete = !polygon.is_empty();
            return (polygon, complete);
        }

        // 0 is not a legal 1-based reference and ends the face like any
        // other unreadable token.
        let index = match cursor.parse_index() {
            Some(index) if index > 0 => index,
            _ => return (polygon, false),
        };
        polygon.push(index - 1);

        if cursor.peek() == Some(b'/') {
            cursor.bump();
            if cursor.peek() != Some(b'/') {
                cursor.skip_index();
            }
            if cursor.peek() == Some(b'/') {
                cursor.bump();
                cursor.skip_index();
            }
        }

        cursor.skip_token();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(text: &str) -> ChunkResult {
        scan_obj_chunk(text.as_bytes(), ByteRange::full(text.as_bytes()))
    }

    #[test]
    fn test_triangle_face() {
        let result = scan("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n");
        assert_eq!(result.vertices.len(), 3);
        assert_eq!(result.polygons, vec![vec![0, 1, 2]]);
        assert_eq!(result.malformed_lines, 0);
    }

    #[test]
    fn test_sub_indices_are_discarded() {
        let result = scan("f 1/2/3 4/5/6 7/8/9\n");
        assert_eq!(result.polygons, vec![vec![0, 3, 6]]);

        let result = scan("f 1//3 4//6 7//9\nf 2/1 3/1 4/1 5/1\n");
        assert_eq!(result.polygons, vec![vec![0, 3, 6], vec![1, 2, 3, 4]]);
    }

    #[test]
    fn test_vertices_and_normals() {
        let result = scan("# comment\nv 1.5 -2 3e1\nvn 0 0 1\nvt 0.5 0.5\n");
        assert_eq!(result.vertices, vec![Point3::new(1.5, -2.0, 30.0)]);
        assert_eq!(result.normals, vec![Vector3::new(0.0, 0.0, 1.0)]);
        assert!(result.polygons.is_empty());
    }

    #[test]
    fn test_crlf_line_endings() {
        let result = scan("v 1 2 3\r\nv 4 5 6\r\nf 1 2 1\r\n");
        assert_eq!(
            result.vertices,
            vec![Point3::new(1.0, 2.0, 3.0), Point3::new(4.0, 5.0, 6.0)]
        );
        assert_eq!(result.polygons, vec![vec![0, 1, 0]]);
    }

    #[test]
    fn test_zero_index_truncates_face() {
        let result = scan("f 3 0 2\n");
        assert_eq!(result.polygons, vec![vec![2]]);
        assert_eq!(result.malformed_lines, 1);
    }

    #[test]
    fn test_unparseable_face_is_dropped() {
        let result = scan("f x y z\nf 0 1 2\nf 1 2 3\n");
        assert_eq!(result.polygons, vec![vec![0, 1, 2]]);
        assert_eq!(result.malformed_lines, 2);
    }

    #[test]
    fn test_corrupt_vertex_keeps_numbering() {
        let result = scan("v 1 2 3\nv 4 oops 6\nv 7 8 9\nf 1 2 3\n");
        assert_eq!(result.vertices.len(), 3);
        assert_eq!(result.vertices[1], Point3::new(4.0, 0.0, 0.0));
        assert_eq!(result.vertices[2], Point3::new(7.0, 8.0, 9.0));
        assert_eq!(result.malformed_lines, 1);
    }

    #[test]
    fn test_other_records_are_skipped() {
        let text = "mtllib a.mtl\no cube\ng side\nusemtl red\ns off\nl 1 2\nv 1 1 1\n";
        let result = scan(text);
        assert_eq!(result.vertices.len(), 1);
        assert!(result.polygons.is_empty());
        assert_eq!(result.malformed_lines, 0);
    }

    #[test]
    fn test_last_line_without_newline() {
        let result = scan("v 1 2 3\nv 1 2 4\nv 1 2 5\nf 1 2 3");
        assert_eq!(result.polygons, vec![vec![0, 1, 2]]);
    }

    #[test]
    fn test_scan_respects_range() {
        let text = b"v 1 1 1\nv 2 2 2\nv 3 3 3\n";
        let result = scan_obj_chunk(text, ByteRange::new(8, 16));
        assert_eq!(result.vertices, vec![Point3::new(2.0, 2.0, 2.0)]);
    }

    #[test]
    fn test_blank_lines() {
        let result = scan("\n\nv 1 2 3\n\n\nf 1 1 1\n\n");
        assert_eq!(result.vertices.len(), 1);
        assert_eq!(result.polygons.len(), 1);
    }
}
