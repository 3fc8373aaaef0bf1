//! Extract-to-function refactoring for JavaScript.
//!
//! The pipeline parses the document with swc, discovers the lexical scope
//! chain at the selection, classifies the identifiers of the selected
//! fragment and synthesizes a function declaration plus the call that
//! replaces the selection. [`Extractor`] drives the whole thing against an
//! [`Editor`].
use std::{collections::BTreeSet, mem::take, ops::Range};
use indexmap::{IndexMap, IndexSet};
use swc_atoms::Atom;
use swc_common::{BytePos, FileName, SourceMap, Span, Spanned, input::StringInput, sync::Lrc};
use swc_ecma_ast::{
    ArrayPat, ArrowExpr, AssignExpr, AssignTarget, AssignTargetPat, BindingIdent, BlockStmt,
    BlockStmtOrExpr, CatchClause, Class, ClassDecl, ClassExpr, ClassMember, ClassMethod,
    Constructor, EsVersion, Expr, FnDecl, FnExpr, ForHead, ForInStmt, ForOfStmt, ForStmt, Function,
    GetterProp, Ident, ImportDecl, ImportSpecifier, MethodProp, ModuleDecl, ModuleItem, ObjectPat,
    ObjectPatProp, Param, ParamOrTsParamProp, Pat, PrivateMethod, Program, Prop, PropName,
    SetterProp, SimpleAssignTarget, Stmt, SwitchStmt, ThisExpr, UpdateExpr, VarDecl, VarDeclKind,
    VarDeclOrExpr, VarDeclarator,
};
use swc_ecma_parser::{EsSyntax, Lexer, Parser, Syntax};
use swc_ecma_visit::{Visit, VisitWith};
use tracing::{debug, info, warn};

pub mod analyze;
pub mod builder;
pub mod editor;
pub mod error;
pub mod extract;
pub mod scope;
pub mod selection;
pub mod synthesize;
#[cfg(test)]
pub mod test;

pub use analyze::{Analysis, analyze};
pub use builder::CodeBuilder;
pub use editor::{EditBatch, Editor, Pos, TextBuffer, TextEdit};
pub use error::{ExtractError, ExtractResult};
pub use extract::{
    DestinationChooser, ExtractFlags, ExtractState, ExtractionContext, Extractor, Outcome,
    ScopeDiscovery,
};
pub use scope::{Binding, BindingKind, LexicalScopes, Origin, Scope, ScopeChain, ScopeId, ScopeKind};
pub use selection::{ExtractionRange, FragmentKind, classify};
pub use synthesize::{Synthesis, synthesize};
use scope::{array_idents, object_idents, pattern_idents, root_ident};

/// A parsed JavaScript document together with its source text.
///
/// swc spans are positions inside a [`SourceMap`]; `base` is where this
/// document starts in that map so spans can be turned into byte offsets
/// into `text`.
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    pub text: String,
    pub program: Program,
    base: BytePos,
}
impl ParsedDocument {
    /// Parses `text` as an ES-next script or module.
    ///
    /// Recoverable parser errors are treated as fatal: the refactoring never
    /// works on a partially understood program.
    pub fn parse(text: &str) -> ExtractResult<Self> {
        Self::parse_with(text, EsSyntax::default())
    }
    /// Parses a selected fragment on its own. `return` and `super` are
    /// accepted outside of functions since the fragment was cut out of one.
    pub fn parse_fragment(text: &str) -> ExtractResult<Self> {
        Self::parse_with(
            text,
            EsSyntax {
                allow_return_outside_function: true,
                allow_super_outside_method: true,
                ..Default::default()
            },
        )
    }
    fn parse_with(text: &str, syntax: EsSyntax) -> ExtractResult<Self> {
        let cm: Lrc<SourceMap> = Default::default();
        let fm = cm.new_source_file(Lrc::new(FileName::Anon), text.to_owned());
        let base = fm.start_pos;
        let lexer = Lexer::new(
            Syntax::Es(syntax),
            EsVersion::EsNext,
            StringInput::from(&*fm),
            None,
        );
        let mut parser = Parser::new_from(lexer);
        let program = parser
            .parse_program()
            .map_err(|e| parse_error(&e, base))?;
        if let Some(e) = parser.take_errors().first() {
            return Err(parse_error(e, base));
        }
        Ok(Self {
            text: text.to_owned(),
            program,
            base,
        })
    }
    pub fn offset(&self, pos: BytePos) -> usize {
        pos.0.saturating_sub(self.base.0) as usize
    }
    pub fn range(&self, span: Span) -> Range<usize> {
        self.offset(span.lo)..self.offset(span.hi)
    }
}
fn parse_error(e: &swc_ecma_parser::error::Error, base: BytePos) -> ExtractError {
    ExtractError::parse(
        e.span().lo.0.saturating_sub(base.0) as usize,
        e.kind().msg(),
    )
}

/// Start of the line containing `offset`.
pub fn line_start(text: &str, offset: usize) -> usize {
    let offset = offset.min(text.len());
    text.get(..offset)
        .and_then(|head| head.rfind('\n'))
        .map_or(0, |i| i + 1)
}
