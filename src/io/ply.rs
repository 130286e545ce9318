// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! ASCII PLY point-cloud header and point scanners

use super::chunk::ByteRange;
use super::cursor::ByteCursor;
use crate::error::{FormatError, LineKind, PartialParseError};
use nalgebra::Point3;
use tracing::{debug, warn};

/// What the header told us about the vertex element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlyHeader {
    /// Count from the first `element vertex <n>` line, if there was one
    pub declared_vertices: Option<usize>,
    /// Offset of the first byte after the `end_header` line
    pub data_start: usize,
}

impl PlyHeader {
    pub fn vertex_count(&self) -> Result<usize, FormatError> {
        self.declared_vertices.ok_or(FormatError::VertexCountMissing)
    }

    /// Range of the body, from `data_start` to the end of `range`
    pub fn data_range(&self, range: ByteRange) -> ByteRange {
        ByteRange::new(self.data_start.min(range.end), range.end)
    }
}

/// Points extracted by one worker
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointChunk {
    pub points: Vec<Point3<f32>>,
    pub malformed_lines: usize,
}

fn trim_cr(line: &[u8]) -> &[u8] {
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// Read header lines until one is exactly `end_header`.
pub fn parse_header(data: &[u8], range: ByteRange) -> Result<PlyHeader, FormatError> {
    let mut cursor = ByteCursor::new(data, range);
    let mut declared_vertices = None;

    while !cursor.is_at_end() {
        let line_start = cursor.position();
        let line = trim_cr(cursor.take_line());

        if line == b"end_header" {
            if declared_vertices.is_none() {
                warn!("PLY header has no `element vertex` line");
            }
            return Ok(PlyHeader {
                declared_vertices,
                data_start: cursor.position(),
            });
        }

        if declared_vertices.is_none() {
            if let Some(count) = element_vertex_count(line, line_start) {
                declared_vertices = Some(count);
            }
        }
    }

    Err(FormatError::MissingEndHeader)
}

/// `Some(n)` for a well-formed `element vertex <n>` line.
fn element_vertex_count(line: &[u8], offset: usize) -> Option<usize> {
    let text = std::str::from_utf8(line).ok()?;
    let mut fields = text.split_ascii_whitespace();
    if fields.next() != Some("element") || fields.next() != Some("vertex") {
        return None;
    }

    let count = fields.next().and_then(|n| n.parse::<usize>().ok());
    if count.is_none() {
        warn!("failed to parse vertex count line at byte {}: {:?}", offset, text);
    }
    count
}

/// Prefix of `body` holding its first `count` non-blank lines.
///
/// Anything after the vertex records, such as a face element body, would
/// otherwise be read as points.
pub fn vertex_lines(data: &[u8], body: ByteRange, count: usize) -> ByteRange {
    let mut cursor = ByteCursor::new(data, body);
    let mut seen = 0;

    while seen < count && !cursor.is_at_end() {
        let line = cursor.take_line();
        if !line.iter().all(u8::is_ascii_whitespace) {
            seen += 1;
        }
    }

    ByteRange::new(body.start, cursor.position())
}

/// Scan `x y z` lines; fields after the third are ignored.
pub fn scan_ply_chunk(data: &[u8], range: ByteRange) -> PointChunk {
    let mut chunk = PointChunk::default();
    let mut cursor = ByteCursor::new(data, range);

    while !cursor.is_at_end() {
        let line_start = cursor.position();
        let line = trim_cr(cursor.take_line());
        if line.iter().all(u8::is_ascii_whitespace) {
            continue;
        }

        match parse_point(line) {
            Some(point) => chunk.points.push(point),
            None => {
                chunk.malformed_lines += 1;
                let error = PartialParseError {
                    offset: line_start,
                    kind: LineKind::Point,
                    reason: "expected three numeric fields",
                };
                debug!("{}: {:?}", error, String::from_utf8_lossy(line));
            }
        }
    }

    if chunk.malformed_lines > 0 {
        warn!(
            "chunk {}..{}: skipped {} unparseable point line(s)",
            range.start, range.end, chunk.malformed_lines
        );
    }

    chunk
}

fn parse_point(line: &[u8]) -> Option<Point3<f32>> {
    let text = std::str::from_utf8(line).ok()?;
    let mut fields = text.split_ascii_whitespace().map(str::parse::<f32>);
    let x = fields.next()?.ok()?;
    let y = fields.next()?.ok()?;
    let z = fields.next()?.ok()?;
    Some(Point3::new(x, y, z))
}
