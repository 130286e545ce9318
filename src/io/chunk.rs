// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Byte ranges and line-aligned chunk planning

use serde::{Deserialize, Serialize};

/// Half-open view `[start, end)` into a byte buffer owned elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ByteRange {
    pub start: usize,
    pub end: usize,
}

impl ByteRange {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "inverted byte range {start}..{end}");
        Self { start, end }
    }

    /// Range covering a whole buffer
    pub fn full(data: &[u8]) -> Self {
        Self::new(0, data.len())
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Borrow the bytes this range covers, clamped to the buffer.
    pub fn slice<'a>(&self, data: &'a [u8]) -> &'a [u8] {
        let end = self.end.min(data.len());
        let start = self.start.min(end);
        &data[start..end]
    }
}

/// Split `range` into at most `desired_chunks` disjoint, line-aligned pieces.
///
/// Each nominal boundary is pushed forward to just past the next `\n`, so a
/// line never straddles two chunks. The last chunk always runs to
/// `range.end`, which keeps a final line without terminator intact.
pub fn partition(data: &[u8], range: ByteRange, desired_chunks: usize) -> Vec<ByteRange> {
    let end = range.end.min(data.len());
    let range = ByteRange::new(range.start.min(end), end);
    let desired_chunks = desired_chunks.max(1);

    if desired_chunks == 1 || range.is_empty() {
        return vec![range];
    }

    let nominal = (range.len() / desired_chunks).max(1);
    let mut chunks = Vec::with_capacity(desired_chunks);
    let mut start = range.start;

    for i in 0..desired_chunks {
        if start >= range.end {
            break;
        }

        let chunk_end = if i == desired_chunks - 1 {
            range.end
        } else {
            // The byte just before the nominal boundary may itself be the
            // terminator, in which case the chunk already ends on a line.
            let probe = (start + nominal).min(range.end) - 1;
            match data[probe..range.end].iter().position(|&b| b == b'\n') {
                Some(offset) => probe + offset + 1,
                None => range.end,
            }
        };

        chunks.push(ByteRange::new(start, chunk_end));
        start = chunk_end;
    }

    chunks
}
