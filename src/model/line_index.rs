//! Byte offset to line/column conversion.

use super::types::TextRange;

/// Line start table for one text.
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<usize>,
    text: String,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(text.match_indices('\n').map(|(i, _)| i + 1));
        Self {
            line_starts,
            text: text.to_string(),
        }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// 1-based line and character column for a byte offset. Offsets past the
    /// end clamp to the end of the text.
    pub fn line_col(&self, offset: usize) -> (usize, usize) {
        let offset = offset.min(self.text.len());
        let line = match self.line_starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i - 1,
        };
        let start = self.line_starts[line];
        let column = self
            .text
            .get(start..offset)
            .map(|s| s.chars().count())
            .unwrap_or(offset - start);
        (line + 1, column + 1)
    }

    /// Byte range of a 1-based line, without its line terminator.
    pub fn line_range(&self, line: usize) -> Option<TextRange> {
        let start = *self.line_starts.get(line.checked_sub(1)?)?;
        let end = self
            .line_starts
            .get(line)
            .map(|next| next - 1)
            .unwrap_or(self.text.len());
        let end = if end > start && self.text.as_bytes().get(end - 1) == Some(&b'\r') {
            end - 1
        } else {
            end
        };
        Some(TextRange::new(start, end))
    }

    /// Byte offset of a 1-based line and character column.
    pub fn offset(&self, line: usize, column: usize) -> Option<usize> {
        let range = self.line_range(line)?;
        let line_text = &self.text[range.start..range.end];
        let col = column.checked_sub(1)?;
        match line_text.char_indices().nth(col) {
            Some((i, _)) => Some(range.start + i),
            None if col == line_text.chars().count() => Some(range.end),
            None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_col() {
        let index = LineIndex::new("ab\ncd\n\né x");
        assert_eq!(index.line_count(), 4);
        assert_eq!(index.line_col(0), (1, 1));
        assert_eq!(index.line_col(3), (2, 1));
        assert_eq!(index.line_col(4), (2, 2));
        assert_eq!(index.line_col(6), (3, 1));
        // 'é' is two bytes wide
        assert_eq!(index.line_col(10), (4, 3));
        assert_eq!(index.line_col(1000), (4, 4));
    }

    #[test]
    fn test_line_range_and_offset() {
        let index = LineIndex::new("ab\r\ncd\n");
        assert_eq!(index.line_range(1), Some(TextRange::new(0, 2)));
        assert_eq!(index.line_range(2), Some(TextRange::new(4, 6)));
        assert_eq!(index.line_range(3), Some(TextRange::new(7, 7)));
        assert_eq!(index.line_range(4), None);
        assert_eq!(index.offset(2, 2), Some(5));
        assert_eq!(index.offset(2, 3), Some(6));
        assert_eq!(index.offset(2, 9), None);
    }
}
