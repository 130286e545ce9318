// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Bounds-checked cursor over one chunk of a mapped file
//!
//! Every read is validated against the chunk end, never against the end of
//! the whole buffer, so a scanner cannot wander into a neighbouring chunk.

use super::chunk::ByteRange;

#[inline]
fn is_blank(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\r' | b'\x0b' | b'\x0c')
}

pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
    end: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(data: &'a [u8], range: ByteRange) -> Self {
        let end = range.end.min(data.len());
        Self {
            data,
            pos: range.start.min(end),
            end,
        }
    }

    /// Absolute offset into the underlying buffer
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.end
    }

    pub fn peek(&self) -> Option<u8> {
        if self.pos < self.end {
            Some(self.data[self.pos])
        } else {
            None
        }
    }

    pub fn bump(&mut self) {
        if self.pos < self.end {
            self.pos += 1;
        }
    }

    pub fn advance(&mut self, n: usize) {
        self.pos = self.pos.saturating_add(n).min(self.end);
    }

    pub fn starts_with(&self, prefix: &[u8]) -> bool {
        self.data[self.pos..self.end].starts_with(prefix)
    }

    /// True on `\n` or at the chunk end.
    pub fn at_line_end(&self) -> bool {
        matches!(self.peek(), None | Some(b'\n'))
    }

    /// Skip spaces, tabs and carriage returns, stopping at `\n`.
    pub fn skip_blanks(&mut self) {
        while let Some(byte) = self.peek() {
            if !is_blank(byte) {
                break;
            }
            self.pos += 1;
        }
    }

    /// Move to the first byte after the next `\n`, or to the chunk end.
    pub fn skip_line(&mut self) {
        match self.data[self.pos..self.end].iter().position(|&b| b == b'\n') {
            Some(offset) => self.pos += offset + 1,
            None => self.pos = self.end,
        }
    }

    /// Move to the next blank or `\n` without consuming it.
    pub fn skip_token(&mut self) {
        while let Some(byte) = self.peek() {
            if byte == b'\n' || is_blank(byte) {
                break;
            }
            self.pos += 1;
        }
    }

    /// Rest of the current line, without its terminator, and step past it.
    pub fn take_line(&mut self) -> &'a [u8] {
        let start = self.pos;
        let line_end = self.data[start..self.end]
            .iter()
            .position(|&b| b == b'\n')
            .map_or(self.end, |offset| start + offset);
        self.pos = if line_end < self.end { line_end + 1 } else { self.end };
        &self.data[start..line_end]
    }

    /// Parse one float field on the current line.
    ///
    /// Leading blanks are skipped. When the next token is not a number the
    /// cursor is left where the token starts and `None` is returned.
    pub fn parse_f32(&mut self) -> Option<f32> {
        self.skip_blanks();
        let start = self.pos;
        self.skip_token();
        let token = &self.data[start..self.pos];

        let value = std::str::from_utf8(token)
            .ok()
            .filter(|s| !s.is_empty())
            .and_then(|s| s.parse::<f32>().ok());
        if value.is_none() {
            self.pos = start;
        }
        value
    }

    /// Parse an unsigned decimal index. Leading blanks are skipped.
    ///
    /// Returns `None` without consuming anything if no digit follows, and
    /// `None` after consuming the digits if the value does not fit `u32`.
    pub fn parse_index(&mut self) -> Option<u32> {
        self.skip_blanks();
        let start = self.pos;
        let mut value: u64 = 0;
        let mut overflow = false;

        while let Some(byte) = self.peek() {
            if !byte.is_ascii_digit() {
                break;
            }
            value = value * 10 + u64::from(byte - b'0');
            if value > u64::from(u32::MAX) {
                overflow = true;
                value = u64::from(u32::MAX);
            }
            self.pos += 1;
        }

        if self.pos == start || overflow {
            return None;
        }
        u32::try_from(value).ok()
    }

    /// Step over a run of digits without decoding it.
    pub fn skip_index(&mut self) {
        while matches!(self.peek(), Some(b) if b.is_ascii_digit()) {
            self.pos += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_stays_inside_range() {
        let data = b"v 1 2 3\nv 4 5 6\n";
        let mut cursor = ByteCursor::new(data, ByteRange::new(0, 8));

        cursor.skip_line();
        assert!(cursor.is_at_end());
        assert_eq!(cursor.peek(), None);
        cursor.bump();
        assert_eq!(cursor.position(), 8);
    }

    #[test]
    fn test_parse_f32_fields() {
        let data = b"  1.5\t-2e3 +0.25\r\n";
        let mut cursor = ByteCursor::new(data, ByteRange::full(data));

        assert_eq!(cursor.parse_f32(), Some(1.5));
        assert_eq!(cursor.parse_f32(), Some(-2000.0));
        assert_eq!(cursor.parse_f32(), Some(0.25));
        assert_eq!(cursor.parse_f32(), None);
        cursor.skip_blanks();
        assert!(cursor.at_line_end());
    }

    #[test]
    fn test_parse_f32_no_progress() {
        let data = b"abc 1.0";
        let mut cursor = ByteCursor::new(data, ByteRange::full(data));

        assert_eq!(cursor.parse_f32(), None);
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_parse_f32_rejects_trailing_garbage() {
        let data = b"1.5x 2";
        let mut cursor = ByteCursor::new(data, ByteRange::full(data));

        assert_eq!(cursor.parse_f32(), None);
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_parse_f32_does_not_cross_lines() {
        let data = b"1.0\n2.0";
        let mut cursor = ByteCursor::new(data, ByteRange::full(data));

        assert_eq!(cursor.parse_f32(), Some(1.0));
        assert_eq!(cursor.parse_f32(), None);
    }

    #[test]
    fn test_parse_index() {
        let data = b" 42/7 x 99999999999";
        let mut cursor = ByteCursor::new(data, ByteRange::full(data));

        assert_eq!(cursor.parse_index(), Some(42));
        assert_eq!(cursor.peek(), Some(b'/'));
        cursor.bump();
        cursor.skip_index();
        assert_eq!(cursor.parse_index(), None);
        cursor.skip_token();
        assert_eq!(cursor.parse_index(), None);
        assert!(cursor.is_at_end());
    }

    #[test]
    fn test_take_line_strips_terminator() {
        let data = b"end_header\r\n1 2 3";
        let mut cursor = ByteCursor::new(data, ByteRange::full(data));

        assert_eq!(cursor.take_line(), b"end_header\r");
        assert_eq!(cursor.take_line(), b"1 2 3");
        assert!(cursor.is_at_end());
    }
}
