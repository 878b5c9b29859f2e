//! Text edits over a source document.
//!
//! Proposals describe their change as a set of [`TextEdit`]s against the
//! unmodified text. Edits never overlap; they are applied back to front so
//! earlier offsets stay valid.

use serde::{Deserialize, Serialize};

use crate::model::TextRange;

use super::EditComputationError;

/// Replace `range` with `new_text`. An empty range is an insertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextEdit {
    pub range: TextRange,
    pub new_text: String,
}

impl TextEdit {
    pub fn insert(offset: usize, text: impl Into<String>) -> Self {
        Self {
            range: TextRange::new(offset, offset),
            new_text: text.into(),
        }
    }

    pub fn replace(range: TextRange, text: impl Into<String>) -> Self {
        Self {
            range,
            new_text: text.into(),
        }
    }

    pub fn delete(range: TextRange) -> Self {
        Self::replace(range, "")
    }
}

/// Accumulates edits against one source text.
pub struct Rewrite<'s> {
    source: &'s str,
    edits: Vec<TextEdit>,
}

impl<'s> Rewrite<'s> {
    pub fn new(source: &'s str) -> Self {
        Self {
            source,
            edits: Vec::new(),
        }
    }

    pub fn source(&self) -> &'s str {
        self.source
    }

    pub fn insert(&mut self, offset: usize, text: impl Into<String>) {
        self.edits.push(TextEdit::insert(offset, text));
    }

    pub fn replace(&mut self, range: TextRange, text: impl Into<String>) {
        self.edits.push(TextEdit::replace(range, text));
    }

    /// Remove a token together with the whitespace that separated it.
    pub fn remove(&mut self, range: TextRange) {
        self.edits
            .push(TextEdit::delete(expand_removal(self.source, range)));
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// The edits sorted by position; overlapping edits are rejected.
    pub fn into_edits(self) -> Result<Vec<TextEdit>, EditComputationError> {
        normalize(self.edits)
    }

    /// All edits collapsed into a single edit spanning them.
    pub fn into_single_edit(self) -> Result<Vec<TextEdit>, EditComputationError> {
        let source = self.source;
        let edits = normalize(self.edits)?;
        Ok(merge_into_one(source, &edits).into_iter().collect())
    }
}

/// Sort edits and reject overlaps. Insertions at the same offset keep their
/// relative order and are concatenated.
fn normalize(mut edits: Vec<TextEdit>) -> Result<Vec<TextEdit>, EditComputationError> {
    edits.sort_by_key(|e| (e.range.start, e.range.end));

    let mut out: Vec<TextEdit> = Vec::with_capacity(edits.len());
    for edit in edits {
        if let Some(last) = out.last_mut() {
            if last.range.is_empty() && edit.range.is_empty() && last.range.start == edit.range.start
            {
                last.new_text.push_str(&edit.new_text);
                continue;
            }
            if edit.range.start < last.range.end {
                return Err(EditComputationError::OverlappingEdits);
            }
        }
        out.push(edit);
    }
    Ok(out)
}

/// Grow a removal range so that no stray whitespace is left behind.
///
/// - a token alone on its line removes the whole line
/// - otherwise trailing blanks go with it
/// - a token with no trailing blank takes the blank before it
pub fn expand_removal(source: &str, range: TextRange) -> TextRange {
    let bytes = source.as_bytes();
    let is_blank = |b: u8| b == b' ' || b == b'\t';

    let mut end = range.end.min(bytes.len());
    while end < bytes.len() && is_blank(bytes[end]) {
        end += 1;
    }

    let line_start = source[..range.start].rfind('\n').map(|i| i + 1).unwrap_or(0);
    let only_indent_before = bytes[line_start..range.start].iter().all(|b| is_blank(*b));
    let at_line_end = end == bytes.len() || bytes[end] == b'\n' || bytes[end] == b'\r';

    if only_indent_before && at_line_end {
        let mut line_end = end;
        if source[line_end..].starts_with("\r\n") {
            line_end += 2;
        } else if line_end < bytes.len() {
            line_end += 1;
        }
        return TextRange::new(line_start, line_end);
    }

    if end > range.end {
        return TextRange::new(range.start, end);
    }

    let mut start = range.start;
    while start > line_start && is_blank(bytes[start - 1]) {
        start -= 1;
    }
    TextRange::new(start, end)
}

/// One edit replacing the span from the first edit's start to the last
/// edit's end, with every edit applied inside it.
pub fn merge_into_one(source: &str, edits: &[TextEdit]) -> Option<TextEdit> {
    let first = edits.first()?;
    let last = edits.last()?;
    let covering = TextRange::new(first.range.start, last.range.end);

    let mut text = String::new();
    let mut cursor = covering.start;
    for edit in edits {
        text.push_str(&source[cursor..edit.range.start]);
        text.push_str(&edit.new_text);
        cursor = edit.range.end;
    }
    Some(TextEdit::replace(covering, text))
}

/// Apply non-overlapping edits to `text`.
pub fn apply_edits(text: &str, edits: &[TextEdit]) -> Result<String, EditComputationError> {
    let edits = normalize(edits.to_vec())?;
    let mut out = text.to_string();
    for edit in edits.iter().rev() {
        if edit.range.end > out.len()
            || !out.is_char_boundary(edit.range.start)
            || !out.is_char_boundary(edit.range.end)
        {
            return Err(EditComputationError::UnsupportedShape(format!(
                "edit range {} is outside the document",
                edit.range
            )));
        }
        out.replace_range(edit.range.start..edit.range.end, &edit.new_text);
    }
    Ok(out)
}

/// Leading whitespace of the line containing `offset`.
pub fn line_indent(source: &str, offset: usize) -> &str {
    let line_start = source[..offset].rfind('\n').map(|i| i + 1).unwrap_or(0);
    let rest = &source[line_start..];
    let width = rest
        .find(|c: char| c != ' ' && c != '\t')
        .unwrap_or(rest.len());
    &rest[..width]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span_of(source: &str, needle: &str) -> TextRange {
        let start = source.find(needle).unwrap();
        TextRange::new(start, start + needle.len())
    }

    #[test]
    fn test_expand_removal_whole_line() {
        let source = "class A {\n    @Inject\n    String s;\n}";
        let range = expand_removal(source, span_of(source, "@Inject"));
        assert_eq!(&source[range.start..range.end], "    @Inject\n");
    }

    #[test]
    fn test_expand_removal_inline() {
        let source = "    @Inject private String s;";
        let range = expand_removal(source, span_of(source, "@Inject"));
        assert_eq!(&source[range.start..range.end], "@Inject ");

        let source = "void m(@Observes String e) {}";
        let range = expand_removal(source, span_of(source, "@Observes"));
        assert_eq!(&source[range.start..range.end], "@Observes ");
    }

    #[test]
    fn test_expand_removal_takes_preceding_blank() {
        let source = "class A extends B implements C{}";
        let range = expand_removal(source, span_of(source, "implements C"));
        assert_eq!(&source[range.start..range.end], " implements C");
    }

    #[test]
    fn test_overlapping_edits_are_rejected() {
        let mut rewrite = Rewrite::new("abcdef");
        rewrite.replace(TextRange::new(0, 3), "x");
        rewrite.replace(TextRange::new(2, 4), "y");
        assert!(matches!(
            rewrite.into_edits(),
            Err(EditComputationError::OverlappingEdits)
        ));
    }

    #[test]
    fn test_single_edit_and_apply() {
        let source = "@A @B @C void m() {}";
        let mut rewrite = Rewrite::new(source);
        rewrite.remove(span_of(source, "@A"));
        rewrite.remove(span_of(source, "@C"));
        let edits = rewrite.into_single_edit().unwrap();
        assert_eq!(edits.len(), 1);
        assert_eq!(apply_edits(source, &edits).unwrap(), "@B void m() {}");
    }

    #[test]
    fn test_inserts_at_same_offset_concatenate() {
        let edits = vec![TextEdit::insert(1, "x"), TextEdit::insert(1, "y")];
        assert_eq!(apply_edits("ab", &edits).unwrap(), "axyb");
    }

    #[test]
    fn test_line_indent() {
        let source = "class A {\n\t  int x;\n}";
        assert_eq!(line_indent(source, source.find("int").unwrap()), "\t  ");
    }
}
