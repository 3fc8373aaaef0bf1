//! The editing surface an extraction works against.
//!
//! [`Editor`] is what the orchestrator needs from a host editor.
//! [`TextBuffer`] is an in-memory implementation with atomic batches, undo
//! and bracket-depth based re-indentation.
use super::*;

/// Zero-based line and byte column.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash)]
pub struct Pos {
    pub line: usize,
    pub ch: usize,
}

/// Replacement of a byte range; an empty range is an insertion.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct TextEdit {
    pub range: Range<usize>,
    pub text: String,
}
impl TextEdit {
    pub fn insert(offset: usize, text: impl Into<String>) -> Self {
        Self {
            range: offset..offset,
            text: text.into(),
        }
    }
    pub fn replace(range: Range<usize>, text: impl Into<String>) -> Self {
        Self {
            range,
            text: text.into(),
        }
    }
}

/// Edits applied together, as one undo step.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct EditBatch {
    /// Offsets all refer to the text before the batch.
    pub edits: Vec<TextEdit>,
    /// Re-indent every line touched by an edit afterwards.
    pub reindent: bool,
}
impl EditBatch {
    pub fn new(reindent: bool) -> Self {
        Self {
            edits: vec![],
            reindent,
        }
    }
    pub fn push(&mut self, edit: TextEdit) -> &mut Self {
        self.edits.push(edit);
        self
    }
}

pub trait Editor {
    fn text(&self) -> &str;
    fn selections(&self) -> &[Range<usize>];
    /// Applies every edit of the batch or none of them.
    fn apply_batch(&mut self, batch: &EditBatch) -> ExtractResult<()>;
    /// Shows a message at the cursor.
    fn display_error(&mut self, message: &str);
}

#[derive(Clone, Debug)]
pub struct TextBuffer {
    text: String,
    selections: Vec<Range<usize>>,
    indent_unit: String,
    history: Vec<String>,
    errors: Vec<(Pos, String)>,
}
impl TextBuffer {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            selections: vec![0..0],
            indent_unit: "    ".to_owned(),
            history: vec![],
            errors: vec![],
        }
    }
    pub fn with_indent_unit(mut self, unit: impl Into<String>) -> Self {
        self.indent_unit = unit.into();
        self
    }
    /// Replaces all selections with `range`.
    pub fn select(&mut self, range: Range<usize>) -> &mut Self {
        self.selections = vec![range];
        self
    }
    pub fn add_selection(&mut self, range: Range<usize>) -> &mut Self {
        self.selections.push(range);
        self
    }
    pub fn errors(&self) -> &[(Pos, String)] {
        &self.errors
    }
    pub fn pos_from_index(&self, index: usize) -> Pos {
        let index = index.min(self.text.len());
        let head = self.text.get(..index).unwrap_or(&self.text);
        let line = head.matches('\n').count();
        Pos {
            line,
            ch: index - line_start(&self.text, index),
        }
    }
    /// Clamps columns past the end of a line to the line end, and lines past
    /// the end of the text to the text end.
    pub fn index_from_pos(&self, pos: Pos) -> usize {
        let mut start = 0;
        for (n, line) in self.text.split('\n').enumerate() {
            if n == pos.line {
                return start + pos.ch.min(line.len());
            }
            start += line.len() + 1;
        }
        self.text.len()
    }
    pub fn replace_range(&mut self, range: Range<usize>, text: impl Into<String>) -> ExtractResult<()> {
        let mut batch = EditBatch::new(false);
        batch.push(TextEdit::replace(range, text));
        self.apply_batch(&batch)
    }
    /// Re-indents one line from the bracket depth at its start.
    pub fn indent_line(&mut self, line: usize) {
        let mut text = self.text.clone();
        if reindent_line(&mut text, line, &self.indent_unit) {
            self.history.push(take(&mut self.text));
            self.text = text;
        }
    }
    /// Restores the text from before the last batch. Returns false when
    /// there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        match self.history.pop() {
            Some(text) => {
                self.text = text;
                self.selections = vec![0..0];
                true
            }
            None => false,
        }
    }
    fn validate(&self, edits: &[TextEdit]) -> ExtractResult<Vec<usize>> {
        let mut order: Vec<usize> = (0..edits.len()).collect();
        order.sort_by_key(|&i| (edits[i].range.start, edits[i].range.end));
        let mut previous: Option<&Range<usize>> = None;
        for &i in order.iter() {
            let range = &edits[i].range;
            if range.start > range.end || range.end > self.text.len() {
                return Err(ExtractError::edit(format!(
                    "range {range:?} is outside the text (len={})",
                    self.text.len()
                )));
            }
            if !self.text.is_char_boundary(range.start) || !self.text.is_char_boundary(range.end) {
                return Err(ExtractError::edit(format!("range {range:?} splits a character")));
            }
            if let Some(prev) = previous {
                if range.start < prev.end {
                    return Err(ExtractError::edit(format!("{prev:?} overlaps {range:?}")));
                }
            }
            previous = Some(range);
        }
        Ok(order)
    }
}
impl Editor for TextBuffer {
    fn text(&self) -> &str {
        &self.text
    }
    fn selections(&self) -> &[Range<usize>] {
        &self.selections
    }
    fn apply_batch(&mut self, batch: &EditBatch) -> ExtractResult<()> {
        let order = self.validate(&batch.edits)?;
        let mut out = String::with_capacity(self.text.len());
        let mut cursor = 0;
        let mut touched = vec![];
        for i in order {
            let edit = &batch.edits[i];
            out.push_str(&self.text[cursor..edit.range.start]);
            let start = out.len();
            out.push_str(&edit.text);
            touched.push(start..out.len());
            cursor = edit.range.end;
        }
        out.push_str(&self.text[cursor..]);
        if batch.reindent {
            let mut lines = BTreeSet::new();
            for range in touched.iter() {
                let first = out[..range.start].matches('\n').count();
                let last_char = if out[range.clone()].ends_with('\n') {
                    range.end - 1
                } else {
                    range.end
                };
                let last = out[..last_char.max(range.start)].matches('\n').count();
                lines.extend(first..=last);
            }
            for line in lines {
                reindent_line(&mut out, line, &self.indent_unit);
            }
        }
        let caret = touched.first().map_or(0, |r| r.end).min(out.len());
        self.history.push(std::mem::replace(&mut self.text, out));
        self.selections = vec![caret..caret];
        Ok(())
    }
    fn display_error(&mut self, message: &str) {
        let at = self.selections.first().map_or(0, |r| r.start);
        let pos = self.pos_from_index(at);
        self.errors.push((pos, message.to_owned()));
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Lex {
    Code,
    Quote(char),
    Template,
    LineComment,
    BlockComment,
}

/// Lexical state and open-bracket lines at the start of `line`.
fn scan_to_line(text: &str, line: usize) -> (Lex, Vec<usize>) {
    let mut state = Lex::Code;
    let mut open = vec![];
    let mut current = 0;
    if line == 0 {
        return (state, open);
    }
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\n' {
            current += 1;
            if matches!(state, Lex::LineComment | Lex::Quote(_)) {
                state = Lex::Code;
            }
            if current == line {
                break;
            }
            continue;
        }
        match state {
            Lex::Code => match c {
                '\'' | '"' => state = Lex::Quote(c),
                '`' => state = Lex::Template,
                '/' if chars.peek() == Some(&'/') => state = Lex::LineComment,
                '/' if chars.peek() == Some(&'*') => {
                    chars.next();
                    state = Lex::BlockComment;
                }
                '{' | '[' | '(' => open.push(current),
                '}' | ']' | ')' => {
                    open.pop();
                }
                _ => {}
            },
            Lex::Quote(q) => match c {
                '\\' => {
                    chars.next_if(|&n| n != '\n');
                }
                _ if c == q => state = Lex::Code,
                _ => {}
            },
            Lex::Template => match c {
                '\\' => {
                    chars.next();
                }
                '`' => state = Lex::Code,
                _ => {}
            },
            Lex::LineComment => {}
            Lex::BlockComment => {
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    state = Lex::Code;
                }
            }
        }
    }
    (state, open)
}

/// Re-indents `line` of `text` in place. Returns whether the text changed.
fn reindent_line(text: &mut String, line: usize, unit: &str) -> bool {
    let (state, mut open) = scan_to_line(text, line);
    if matches!(state, Lex::Template | Lex::BlockComment) {
        return false;
    }
    let mut start = 0;
    for _ in 0..line {
        match text[start..].find('\n') {
            Some(i) => start += i + 1,
            None => return false,
        }
    }
    let end = text[start..].find('\n').map_or(text.len(), |i| start + i);
    let content = text[start..end].trim_start_matches([' ', '\t']);
    if content.is_empty() {
        let changed = end > start;
        text.replace_range(start..end, "");
        return changed;
    }
    for c in content.chars() {
        if matches!(c, '}' | ']' | ')') {
            open.pop();
        } else {
            break;
        }
    }
    open.dedup();
    let indent = unit.repeat(open.len());
    let current = end - start - content.len();
    if text[start..start + current] == *indent {
        return false;
    }
    text.replace_range(start..start + current, &indent);
    true
}
