//! Selection normalisation and fragment classification.
use super::*;

/// The selected fragment, in byte offsets of the document.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ExtractionRange {
    pub start: usize,
    pub end: usize,
    pub text: String,
    /// Start of the innermost statement (or class member) enclosing `start`.
    pub anchor: usize,
}
impl ExtractionRange {
    /// Trims whitespace off a raw editor selection.
    ///
    /// The anchor is only known once the fragment is classified against the
    /// AST; until then it equals `start`.
    pub fn normalize(source: &str, raw: Range<usize>) -> ExtractResult<Self> {
        let (lo, hi) = (raw.start.min(raw.end), raw.start.max(raw.end).min(source.len()));
        let selected = source
            .get(lo..hi)
            .ok_or_else(|| ExtractError::edit(format!("selection {lo}..{hi} splits a character")))?;
        let trimmed = selected.trim_start();
        let start = lo + (selected.len() - trimmed.len());
        let trimmed = trimmed.trim_end();
        if trimmed.is_empty() {
            return Err(ExtractError::EmptySelection);
        }
        Ok(Self {
            start,
            end: start + trimmed.len(),
            text: trimmed.to_owned(),
            anchor: start,
        })
    }
    pub fn as_range(&self) -> Range<usize> {
        self.start..self.end
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum FragmentKind {
    Statements,
    Expression,
}

/// Decides whether `range` covers whole statements or a single expression.
///
/// A selection that stops right before a statement's terminating `;` is
/// widened to include it. The range's anchor is filled in as a side effect.
pub fn classify(document: &ParsedDocument, range: &mut ExtractionRange) -> ExtractResult<FragmentKind> {
    let mut classifier = Classifier {
        document,
        start: range.start,
        end: range.end,
        statements: None,
        expression: false,
        anchor: None,
    };
    document.program.visit_with(&mut classifier);
    if let Some(anchor) = classifier.anchor {
        range.anchor = anchor;
    }
    let kind = if let Some(end) = classifier.statements {
        if end != range.end {
            range.end = end;
            range.text = document.text[range.start..end].to_owned();
        }
        FragmentKind::Statements
    } else if classifier.expression {
        FragmentKind::Expression
    } else {
        return Err(ExtractError::UnsupportedFragment);
    };
    debug!(start = range.start, end = range.end, anchor = range.anchor, ?kind, "classified selection");
    Ok(kind)
}

struct Classifier<'a> {
    document: &'a ParsedDocument,
    start: usize,
    end: usize,
    /// End of the matched statement run, including a snapped `;`.
    statements: Option<usize>,
    expression: bool,
    anchor: Option<usize>,
}
impl Classifier<'_> {
    fn touches(&self, span: Span) -> bool {
        let range = self.document.range(span);
        range.start <= self.start && self.end <= range.end
    }
    fn encloses_start(&mut self, span: Span) {
        let range = self.document.range(span);
        if range.start <= self.start && self.start < range.end {
            self.anchor = Some(range.start);
        }
    }
    fn statement_run(&mut self, spans: impl Iterator<Item = Span>) {
        if self.statements.is_some() {
            return;
        }
        let mut started = false;
        for span in spans {
            let range = self.document.range(span);
            if !started {
                if range.start != self.start {
                    continue;
                }
                started = true;
            }
            if range.end == self.end {
                self.statements = Some(self.end);
                return;
            }
            if range.end == self.end + 1 && self.document.text[self.end..].starts_with(';') {
                self.statements = Some(range.end);
                return;
            }
            if range.end > self.end {
                return;
            }
        }
    }
}
impl Visit for Classifier<'_> {
    fn visit_stmts(&mut self, node: &[Stmt]) {
        self.statement_run(node.iter().map(|s| s.span()));
        node.visit_children_with(self);
    }
    fn visit_module_items(&mut self, node: &[ModuleItem]) {
        self.statement_run(node.iter().map(|s| s.span()));
        node.visit_children_with(self);
    }
    fn visit_stmt(&mut self, node: &Stmt) {
        if !self.touches(node.span()) {
            return;
        }
        self.encloses_start(node.span());
        node.visit_children_with(self);
    }
    fn visit_module_decl(&mut self, node: &ModuleDecl) {
        if !self.touches(node.span()) {
            return;
        }
        self.encloses_start(node.span());
        node.visit_children_with(self);
    }
    fn visit_class_member(&mut self, node: &ClassMember) {
        if !self.touches(node.span()) {
            return;
        }
        self.encloses_start(node.span());
        node.visit_children_with(self);
    }
    fn visit_expr(&mut self, node: &Expr) {
        let range = self.document.range(node.span());
        if range.start == self.start && range.end == self.end {
            self.expression = true;
        }
        if self.touches(node.span()) {
            node.visit_children_with(self);
        }
    }
}
