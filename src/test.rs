use crate::*;

/// Parses a fixture, panicking with the parser message on failure.
pub fn document(src: &str) -> ParsedDocument {
    match ParsedDocument::parse(src) {
        Ok(doc) => doc,
        Err(e) => panic!("failed to parse fixture: {e}\n{src}"),
    }
}

/// Strips the `«` and `»` selection markers out of a fixture and returns the
/// bare text along with the selected byte range.
pub fn marked(src: &str) -> (String, Range<usize>) {
    let start = src.find('«').expect("fixture has no « marker");
    let text = src.replacen('«', "", 1);
    let end = text.find('»').expect("fixture has no » marker");
    (text.replacen('»', "", 1), start..end)
}

/// A marked fixture taken through classification and scope discovery.
pub struct Prepared {
    pub document: ParsedDocument,
    pub range: ExtractionRange,
    pub kind: FragmentKind,
    pub scopes: ScopeChain,
}
impl Prepared {
    pub fn new(src: &str) -> Self {
        let (text, raw) = marked(src);
        let document = document(&text);
        let mut range = ExtractionRange::normalize(&document.text, raw).expect("selection");
        let kind = classify(&document, &mut range).expect("classified fragment");
        let scopes = LexicalScopes::default()
            .scope_chain(&document, range.start)
            .expect("scope chain");
        Self {
            document,
            range,
            kind,
            scopes,
        }
    }
    pub fn source(&self) -> ScopeId {
        self.scopes.innermost().expect("program scope").id
    }
    pub fn analysis(&self, destination: ScopeId) -> Analysis {
        analyze(&self.document, &self.range, &self.scopes, self.source(), destination)
            .expect("analysis")
    }
    pub fn synthesis(&self, destination: ScopeId) -> Synthesis {
        synthesize(
            &self.analysis(destination),
            &self.scopes,
            destination,
            &self.range,
            self.kind,
            &self.document.text,
            &ExtractFlags::default(),
        )
        .expect("synthesis")
    }
}

/// Runs discovery, classification and analysis for a marked fixture, with
/// the destination given as a scope id.
pub fn analysis_for(src: &str, destination: ScopeId) -> Analysis {
    Prepared::new(src).analysis(destination)
}

#[macro_export]
macro_rules! simple_analysis_test {
    ($name:ident [$data:expr, $dest:expr] => |$a:pat_param|$e:expr) => {
        #[test]
        fn $name() {
            let $a = $crate::test::analysis_for($data, $dest);
            $e
        }
    };
}
