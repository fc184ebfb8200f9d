//! Fixed-length text rewriting.
//!
//! Every rename becomes an edit over the original identifier bytes. The
//! replacement is padded with spaces to the original width, so offsets
//! reported by the checker stay valid for the rewritten text and the output
//! has exactly the input's byte length.

use super::MangleError;
use crate::model::IdentifierRef;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub offset: u32,
    pub len: u32,
    pub replacement: String,
}

#[derive(Debug)]
pub struct TextPatcher<'a> {
    source: &'a str,
    edits: Vec<Edit>,
}

impl<'a> TextPatcher<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source, edits: Vec::new() }
    }

    /// Byte offset where `name` starts inside the occurrence. The name is
    /// expected right after the leading trivia, or else right before the
    /// occurrence's end; only when neither matches is the text scanned to
    /// the name's first character. The text there must be exactly `name`.
    pub fn locate(&self, occurrence: &IdentifierRef, name: &str) -> Result<u32, MangleError> {
        let out_of_bounds = || MangleError::OccurrenceOutOfBounds {
            start: occurrence.pos,
            end: occurrence.end,
            len: self.source.len(),
        };
        let start = occurrence.start() as usize;
        let end = occurrence.end as usize;
        if occurrence.pos > occurrence.end || start > end || end > self.source.len() {
            return Err(out_of_bounds());
        }
        let window = self.source.get(start..end).ok_or_else(out_of_bounds)?;

        let mismatch = || MangleError::OccurrenceMismatch {
            expected: name.to_string(),
            offset: start as u32,
            found: window.trim().to_string(),
        };
        let first = name.chars().next().ok_or_else(mismatch)?;
        if window.starts_with(name) {
            return Ok(start as u32);
        }
        if window.ends_with(name) {
            return Ok((end - name.len()) as u32);
        }
        let skip = window.find(first).ok_or_else(mismatch)?;
        if !window[skip..].starts_with(name) {
            return Err(mismatch());
        }
        Ok((start + skip) as u32)
    }

    /// Queue a rename of one occurrence of `name`.
    pub fn rename(&mut self, occurrence: &IdentifierRef, name: &str, replacement: &str) -> Result<(), MangleError> {
        if replacement.len() > name.len() {
            return Err(MangleError::NameTooLong {
                original: name.to_string(),
                candidate: replacement.to_string(),
            });
        }
        let offset = self.locate(occurrence, name)?;
        self.edits.push(Edit {
            offset,
            len: name.len() as u32,
            replacement: replacement.to_string(),
        });
        Ok(())
    }

    pub fn edits(&self) -> &[Edit] {
        &self.edits
    }

    /// Apply all edits in one pass.
    pub fn apply(mut self) -> String {
        self.edits.sort_by_key(|edit| edit.offset);
        self.edits.dedup_by_key(|edit| edit.offset);

        let mut out = String::with_capacity(self.source.len());
        let mut cursor = 0usize;
        for edit in &self.edits {
            let offset = edit.offset as usize;
            if offset < cursor {
                continue;
            }
            out.push_str(&self.source[cursor..offset]);
            out.push_str(&edit.replacement);
            for _ in edit.replacement.len()..edit.len as usize {
                out.push(' ');
            }
            cursor = offset + edit.len as usize;
        }
        out.push_str(&self.source[cursor..]);
        out
    }
}
