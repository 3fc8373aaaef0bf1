//! The extraction workflow.
//!
//! [`Extractor::extract_to_function`] validates the editor selection,
//! resolves the scope chain, asks a [`DestinationChooser`] where the new
//! function should live and applies the result as a single edit batch.
use super::*;
use async_trait::async_trait;

/// Knobs for the generated code.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
#[non_exhaustive]
pub struct ExtractFlags {
    /// Name of the new function, suffixed with a number when taken.
    pub function_prefix: String,
    /// Variable receiving the returned object when several values flow out.
    pub result_binding: String,
    pub indent_unit: String,
    /// Whether the editor re-indents the lines an extraction touches.
    pub reindent: bool,
}
impl Default for ExtractFlags {
    fn default() -> Self {
        Self {
            function_prefix: "extracted".to_owned(),
            result_binding: "ret".to_owned(),
            indent_unit: "    ".to_owned(),
            reindent: true,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Hash)]
pub enum ExtractState {
    #[default]
    Idle,
    SelectionValidated,
    ScopeResolved,
    DestinationChosen,
    Applied,
    Aborted,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Outcome {
    Applied(Synthesis),
    /// The destination choice was dismissed; nothing was edited.
    Cancelled,
}

/// Produces the scope chain enclosing an offset.
#[async_trait(?Send)]
pub trait ScopeDiscovery {
    async fn discover(&self, document: &ParsedDocument, offset: usize) -> ExtractResult<ScopeChain>;
}
#[async_trait(?Send)]
impl ScopeDiscovery for LexicalScopes {
    async fn discover(&self, document: &ParsedDocument, offset: usize) -> ExtractResult<ScopeChain> {
        self.scope_chain(document, offset)
    }
}

/// Picks the scope that receives the new function, or `None` to cancel.
///
/// Candidates are listed outermost first.
#[async_trait(?Send)]
pub trait DestinationChooser {
    async fn choose(&mut self, candidates: &[Scope]) -> Option<ScopeId>;
}
#[async_trait(?Send)]
impl<F> DestinationChooser for F
where
    F: FnMut(&[Scope]) -> Option<ScopeId>,
{
    async fn choose(&mut self, candidates: &[Scope]) -> Option<ScopeId> {
        (self)(candidates)
    }
}

/// Everything known about one extraction once its scopes are resolved.
#[derive(Clone, Debug)]
pub struct ExtractionContext {
    pub document: ParsedDocument,
    pub range: ExtractionRange,
    pub kind: FragmentKind,
    pub scopes: ScopeChain,
}
impl ExtractionContext {
    /// Function-creating scopes that can host a declaration before the
    /// fragment. The innermost one only qualifies when the fragment's anchor
    /// statement is inside it, which rules out expression-bodied arrows.
    pub fn destinations(&self) -> Vec<Scope> {
        let innermost = self.scopes.function_scopes().last().map(|s| s.id);
        self.scopes
            .function_scopes()
            .filter(|s| {
                Some(s.id) != innermost
                    || s.origin
                        .as_ref()
                        .is_none_or(|o| o.range.start <= self.range.anchor)
            })
            .cloned()
            .collect()
    }
    pub fn source(&self) -> ExtractResult<ScopeId> {
        self.scopes
            .innermost()
            .map(|s| s.id)
            .ok_or_else(|| ExtractError::scope_resolution("empty scope chain"))
    }
}

/// Drives extractions against an [`Editor`].
#[derive(Clone, Debug, Default)]
pub struct Extractor<D = LexicalScopes> {
    discovery: D,
    flags: ExtractFlags,
    state: ExtractState,
}
impl Extractor {
    pub fn new(flags: ExtractFlags) -> Self {
        Self::with_discovery(LexicalScopes::default(), flags)
    }
}
impl<D: ScopeDiscovery> Extractor<D> {
    pub fn with_discovery(discovery: D, flags: ExtractFlags) -> Self {
        Self {
            discovery,
            flags,
            state: ExtractState::Idle,
        }
    }
    pub fn state(&self) -> ExtractState {
        self.state
    }
    pub fn flags(&self) -> &ExtractFlags {
        &self.flags
    }

    /// Runs one extraction. Errors are shown through
    /// [`Editor::display_error`] and returned; the document is only touched
    /// when the result is [`Outcome::Applied`].
    pub async fn extract_to_function<E, C>(&mut self, editor: &mut E, chooser: &mut C) -> ExtractResult<Outcome>
    where
        E: Editor,
        C: DestinationChooser,
    {
        self.state = ExtractState::Idle;
        match self.run(editor, chooser).await {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                self.state = ExtractState::Aborted;
                warn!(error = %e, "extract to function aborted");
                editor.display_error(&e.to_string());
                Err(e)
            }
        }
    }

    async fn run<E, C>(&mut self, editor: &mut E, chooser: &mut C) -> ExtractResult<Outcome>
    where
        E: Editor,
        C: DestinationChooser,
    {
        let (document, range, kind) = self.validate(editor)?;
        self.state = ExtractState::SelectionValidated;

        let scopes = self
            .discovery
            .discover(&document, range.start)
            .await
            .map_err(|e| match e {
                e @ ExtractError::ScopeResolution { .. } => e,
                e => ExtractError::scope_resolution(e.to_string()),
            })?;
        let context = ExtractionContext {
            document,
            range,
            kind,
            scopes,
        };
        self.state = ExtractState::ScopeResolved;

        let candidates = context.destinations();
        let Some(destination) = chooser.choose(&candidates).await else {
            debug!("destination choice cancelled");
            self.state = ExtractState::Idle;
            return Ok(Outcome::Cancelled);
        };
        if !candidates.iter().any(|s| s.id == destination) {
            return Err(ExtractError::InvalidDestination { id: destination });
        }
        self.state = ExtractState::DestinationChosen;

        let synthesis = self.apply(editor, &context, destination)?;
        self.state = ExtractState::Applied;
        info!(
            name = %synthesis.name,
            destination,
            start = context.range.start,
            end = context.range.end,
            "extracted function"
        );
        Ok(Outcome::Applied(synthesis))
    }

    fn validate<E: Editor>(&self, editor: &E) -> ExtractResult<(ParsedDocument, ExtractionRange, FragmentKind)> {
        let selection = match editor.selections() {
            [] => return Err(ExtractError::EmptySelection),
            [one] => one.clone(),
            _ => return Err(ExtractError::MultipleSelections),
        };
        if selection.is_empty() {
            return Err(ExtractError::EmptySelection);
        }
        let document = ParsedDocument::parse(editor.text())?;
        let mut range = ExtractionRange::normalize(&document.text, selection)?;
        let kind = classify(&document, &mut range)?;
        Ok((document, range, kind))
    }

    fn apply<E: Editor>(&self, editor: &mut E, context: &ExtractionContext, destination: ScopeId) -> ExtractResult<Synthesis> {
        let analysis = analyze(
            &context.document,
            &context.range,
            &context.scopes,
            context.source()?,
            destination,
        )?;
        let synthesis = synthesize(
            &analysis,
            &context.scopes,
            destination,
            &context.range,
            context.kind,
            &context.document.text,
            &self.flags,
        )?;
        let mut batch = EditBatch::new(self.flags.reindent);
        batch
            .push(TextEdit::insert(synthesis.insertion_point, synthesis.declaration.clone()))
            .push(TextEdit::replace(context.range.as_range(), synthesis.call.clone()));
        editor.apply_batch(&batch)?;
        Ok(synthesis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::marked;
    use pretty_assertions::assert_eq;

    fn buffer(src: &str) -> TextBuffer {
        let (text, range) = marked(src);
        let mut buffer = TextBuffer::new(text);
        buffer.select(range);
        buffer
    }

    fn offered(src: &str) -> Vec<String> {
        let (text, raw) = marked(src);
        let document = crate::test::document(&text);
        let mut range = ExtractionRange::normalize(&document.text, raw).unwrap();
        let kind = classify(&document, &mut range).unwrap();
        let scopes = LexicalScopes::default().scope_chain(&document, range.start).unwrap();
        ExtractionContext {
            document,
            range,
            kind,
            scopes,
        }
        .destinations()
        .into_iter()
        .map(|s| s.name)
        .collect()
    }

    struct Offline;
    #[async_trait(?Send)]
    impl ScopeDiscovery for Offline {
        async fn discover(&self, _: &ParsedDocument, _: usize) -> ExtractResult<ScopeChain> {
            Err(ExtractError::scope_resolution("discovery offline"))
        }
    }

    #[test]
    fn default_flags() {
        let flags = ExtractFlags::default();
        assert_eq!(flags.function_prefix, "extracted");
        assert_eq!(flags.result_binding, "ret");
        assert_eq!(flags.indent_unit, "    ");
        assert!(flags.reindent);
    }

    #[test]
    fn expression_bodied_arrows_are_not_offered() {
        assert_eq!(
            offered("function f(xs) {\n    return xs.map((x) => «x + 1»);\n}\n"),
            vec!["global", "f"]
        );
        assert_eq!(
            offered("function f(xs) {\n    return xs.map((x) => {\n        return «x + 1»;\n    });\n}\n"),
            vec!["global", "f", "arrow function"]
        );
    }

    #[tokio::test]
    async fn multiple_selections_are_rejected() {
        let mut editor = buffer("«a();»\nb();\n");
        editor.add_selection(5..9);
        let mut extractor = Extractor::new(ExtractFlags::default());
        let mut chooser = |_: &[Scope]| Some(0);
        let result = extractor.extract_to_function(&mut editor, &mut chooser).await;
        assert_eq!(result, Err(ExtractError::MultipleSelections));
        assert_eq!(extractor.state(), ExtractState::Aborted);
        assert_eq!(
            editor.errors()[0].1,
            "Extract to function does not work in multicursors"
        );
    }

    #[tokio::test]
    async fn empty_selection_is_rejected() {
        let mut editor = TextBuffer::new("a();\n");
        let mut extractor = Extractor::new(ExtractFlags::default());
        let mut chooser = |_: &[Scope]| Some(0);
        let result = extractor.extract_to_function(&mut editor, &mut chooser).await;
        assert_eq!(result, Err(ExtractError::EmptySelection));
    }

    #[tokio::test]
    async fn cancelling_returns_to_idle() {
        let mut editor = buffer("function f() {\n    «g();»\n}\n");
        let before = editor.text().to_owned();
        let mut extractor = Extractor::new(ExtractFlags::default());
        let mut seen = vec![];
        let mut chooser = |candidates: &[Scope]| {
            seen = candidates.iter().map(|s| s.id).collect();
            None
        };
        let result = extractor.extract_to_function(&mut editor, &mut chooser).await;
        assert_eq!(result, Ok(Outcome::Cancelled));
        assert_eq!(extractor.state(), ExtractState::Idle);
        assert_eq!(editor.text(), before);
        assert_eq!(seen, vec![0, 1]);
        assert!(editor.errors().is_empty());
    }

    #[tokio::test]
    async fn unknown_destination_is_rejected() {
        let mut editor = buffer("function f() {\n    «g();»\n}\n");
        let mut extractor = Extractor::new(ExtractFlags::default());
        let mut chooser = |_: &[Scope]| Some(7);
        let result = extractor.extract_to_function(&mut editor, &mut chooser).await;
        assert_eq!(result, Err(ExtractError::InvalidDestination { id: 7 }));
        assert_eq!(extractor.state(), ExtractState::Aborted);
    }

    #[tokio::test]
    async fn discovery_failures_surface_as_scope_errors() {
        let mut editor = buffer("«g();»\n");
        let mut extractor = Extractor::with_discovery(Offline, ExtractFlags::default());
        let mut chooser = |_: &[Scope]| Some(0);
        let result = extractor.extract_to_function(&mut editor, &mut chooser).await;
        assert!(matches!(result, Err(ExtractError::ScopeResolution { .. })));
        assert_eq!(editor.errors()[0].1, "Unable to get scope data: discovery offline");
    }

    #[tokio::test]
    async fn unparseable_documents_are_rejected() {
        let mut editor = buffer("function f( {\n    «g();»\n");
        let mut extractor = Extractor::new(ExtractFlags::default());
        let mut chooser = |_: &[Scope]| Some(0);
        let result = extractor.extract_to_function(&mut editor, &mut chooser).await;
        assert!(matches!(result, Err(ExtractError::Parse { .. })));
        assert_eq!(editor.text(), "function f( {\n    g();\n");
    }

    #[tokio::test]
    async fn applied_extraction_reports_the_synthesis() {
        let mut editor = buffer("function f() {\n    «g();»\n}\n");
        let mut extractor = Extractor::new(ExtractFlags::default());
        let mut chooser = |_: &[Scope]| Some(0);
        let outcome = extractor
            .extract_to_function(&mut editor, &mut chooser)
            .await
            .unwrap();
        let Outcome::Applied(synthesis) = outcome else {
            panic!("expected an applied extraction");
        };
        assert_eq!(synthesis.call, "extracted();");
        assert_eq!(extractor.state(), ExtractState::Applied);
        assert_eq!(
            editor.text(),
            "function extracted() {\n    g();\n}\n\nfunction f() {\n    extracted();\n}\n"
        );
    }
}
