//! Lexical scope chains for JavaScript documents.
//!
//! A [`ScopeChain`] lists every scope enclosing a position, from the program
//! scope (id 0) down to the innermost one, together with the names each
//! scope declares. [`LexicalScopes`] computes such a chain by walking the
//! swc AST of a [`ParsedDocument`].

use super::*;

/// Index of a scope in its [`ScopeChain`]; the program scope is 0.
pub type ScopeId = usize;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum ScopeKind {
    Program,
    Function,
    Class,
    Block,
    Catch,
}

/// How a name came into existence in its scope.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum BindingKind {
    Var,
    Let,
    Const,
    Function,
    Class,
    Param,
    Catch,
    Import,
}
impl From<VarDeclKind> for BindingKind {
    fn from(kind: VarDeclKind) -> Self {
        match kind {
            VarDeclKind::Var => BindingKind::Var,
            VarDeclKind::Let => BindingKind::Let,
            VarDeclKind::Const => BindingKind::Const,
        }
    }
}

/// Metadata about a declared name.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Binding {
    pub kind: BindingKind,
    /// Byte offset of the binding identifier.
    pub offset: usize,
}

/// The node that opened a scope.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Origin {
    /// Byte range of the originating node.
    pub range: Range<usize>,
    /// Start of the statement (or class member) that holds the node in the
    /// parent scope. New declarations meant to precede this scope go here.
    pub anchor: usize,
}

/// One level of lexical nesting.
#[derive(Clone, Debug)]
pub struct Scope {
    pub id: ScopeId,
    pub kind: ScopeKind,
    /// Label shown when offering the scope as a destination.
    pub name: String,
    pub names: IndexMap<Atom, Binding>,
    /// `None` only for the program scope.
    pub origin: Option<Origin>,
}
impl Scope {
    /// Whether a function declared here gets its own home: the program,
    /// function bodies and class bodies.
    pub fn is_function_creating(&self) -> bool {
        matches!(
            self.kind,
            ScopeKind::Program | ScopeKind::Function | ScopeKind::Class
        )
    }
    pub fn is_class(&self) -> bool {
        self.kind == ScopeKind::Class
    }
    pub fn declares(&self, name: &str) -> bool {
        self.names.keys().any(|k| &**k == name)
    }
}

/// Scopes enclosing a position, outermost first.
#[derive(Clone, Debug, Default)]
pub struct ScopeChain {
    scopes: Vec<Scope>,
}
impl ScopeChain {
    /// Builds a chain, renumbering the scopes by position.
    pub fn new(mut scopes: Vec<Scope>) -> Self {
        for (id, scope) in scopes.iter_mut().enumerate() {
            scope.id = id;
        }
        Self { scopes }
    }
    pub fn get(&self, id: ScopeId) -> Option<&Scope> {
        self.scopes.get(id)
    }
    pub fn innermost(&self) -> Option<&Scope> {
        self.scopes.last()
    }
    pub fn iter(&self) -> impl Iterator<Item = &Scope> {
        self.scopes.iter()
    }
    pub fn len(&self) -> usize {
        self.scopes.len()
    }
    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }
    pub fn function_scopes(&self) -> impl Iterator<Item = &Scope> {
        self.scopes.iter().filter(|s| s.is_function_creating())
    }
    /// The innermost function-creating scope at or above `id`.
    pub fn enclosing_function(&self, id: ScopeId) -> Option<&Scope> {
        self.scopes
            .iter()
            .take(id + 1)
            .rev()
            .find(|s| s.is_function_creating())
    }
    /// Names declared by the scopes strictly inside `outer`, down to and
    /// including `inner`.
    pub fn names_between(&self, outer: ScopeId, inner: ScopeId) -> IndexSet<Atom> {
        self.scopes
            .iter()
            .skip(outer + 1)
            .take(inner.saturating_sub(outer))
            .flat_map(|s| s.names.keys().cloned())
            .collect()
    }
    /// Whether any scope of the chain declares `name`.
    pub fn declares(&self, name: &str) -> bool {
        self.scopes.iter().any(|s| s.declares(name))
    }
}

/// Scope discovery over the swc AST.
///
/// Function-like constructs (functions, methods, constructors, accessors,
/// arrows), classes, `catch` clauses and blocks or `for` heads that declare
/// lexical names each open a scope when they strictly contain the offset.
#[derive(Clone, Copy, Debug, Default)]
pub struct LexicalScopes {}
impl LexicalScopes {
    pub fn scope_chain(&self, document: &ParsedDocument, offset: usize) -> ExtractResult<ScopeChain> {
        if offset > document.text.len() {
            return Err(ExtractError::scope_resolution(format!(
                "offset {offset} is outside the document"
            )));
        }
        let mut decls = DeclCollector::new(document, false);
        document.program.visit_with(&mut decls);
        let mut collector = ScopeCollector {
            document,
            offset,
            chain: vec![Scope {
                id: 0,
                kind: ScopeKind::Program,
                name: "global".to_owned(),
                names: decls.names,
                origin: None,
            }],
            anchors: vec![],
        };
        document.program.visit_with(&mut collector);
        debug!(
            offset,
            scopes = collector.chain.len(),
            innermost = %collector.chain.last().map_or("global", |s| s.name.as_str()),
            "discovered scope chain"
        );
        Ok(ScopeChain::new(collector.chain))
    }
}

/// Collects the names a statement list declares.
///
/// In `lexical` mode only `let`/`const`/`class`/`function` declarations made
/// directly in the list count (block scopes). Otherwise `var`s are hoisted
/// out of nested blocks too (function and program scopes). Nested functions
/// and classes are never entered.
struct DeclCollector<'a> {
    document: &'a ParsedDocument,
    names: IndexMap<Atom, Binding>,
    lexical: bool,
    depth: usize,
}
impl<'a> DeclCollector<'a> {
    fn new(document: &'a ParsedDocument, lexical: bool) -> Self {
        Self {
            document,
            names: IndexMap::new(),
            lexical,
            depth: 0,
        }
    }
    fn declare(&mut self, ident: &Ident, kind: BindingKind) {
        let offset = self.document.offset(ident.span.lo);
        self.names
            .entry(ident.sym.clone())
            .or_insert(Binding { kind, offset });
    }
    fn nested(&mut self, f: impl FnOnce(&mut Self)) {
        self.depth += 1;
        f(self);
        self.depth -= 1;
    }
}
impl Visit for DeclCollector<'_> {
    fn visit_var_decl(&mut self, node: &VarDecl) {
        let hoisted = node.kind == VarDeclKind::Var && !self.lexical;
        let lexical = node.kind != VarDeclKind::Var && self.depth == 0;
        if hoisted || lexical {
            for decl in node.decls.iter() {
                let mut idents = vec![];
                pattern_idents(&decl.name, &mut idents);
                for ident in idents {
                    self.declare(ident, node.kind.into());
                }
            }
        }
    }
    fn visit_fn_decl(&mut self, node: &FnDecl) {
        if self.depth == 0 {
            self.declare(&node.ident, BindingKind::Function);
        }
    }
    fn visit_class_decl(&mut self, node: &ClassDecl) {
        if self.depth == 0 {
            self.declare(&node.ident, BindingKind::Class);
        }
    }
    fn visit_import_decl(&mut self, node: &ImportDecl) {
        for specifier in node.specifiers.iter() {
            let local = match specifier {
                ImportSpecifier::Named(s) => &s.local,
                ImportSpecifier::Default(s) => &s.local,
                ImportSpecifier::Namespace(s) => &s.local,
            };
            self.declare(local, BindingKind::Import);
        }
    }
    fn visit_expr(&mut self, _: &Expr) {}
    fn visit_function(&mut self, _: &Function) {}
    fn visit_class(&mut self, _: &Class) {}
    fn visit_block_stmt(&mut self, node: &BlockStmt) {
        self.nested(|this| node.visit_children_with(this));
    }
    fn visit_for_stmt(&mut self, node: &ForStmt) {
        self.nested(|this| node.visit_children_with(this));
    }
    fn visit_for_in_stmt(&mut self, node: &ForInStmt) {
        self.nested(|this| node.visit_children_with(this));
    }
    fn visit_for_of_stmt(&mut self, node: &ForOfStmt) {
        self.nested(|this| node.visit_children_with(this));
    }
    fn visit_switch_stmt(&mut self, node: &SwitchStmt) {
        self.nested(|this| node.visit_children_with(this));
    }
    fn visit_catch_clause(&mut self, node: &CatchClause) {
        self.nested(|this| node.visit_children_with(this));
    }
}

fn declared_names(document: &ParsedDocument, stmts: &[Stmt], lexical: bool) -> IndexMap<Atom, Binding> {
    let mut decls = DeclCollector::new(document, lexical);
    stmts.visit_with(&mut decls);
    decls.names
}

fn prop_name(key: &PropName) -> String {
    match key {
        PropName::Ident(i) => i.sym.to_string(),
        _ => "method".to_owned(),
    }
}

/// Walks down to `offset`, pushing a scope for every construct around it.
struct ScopeCollector<'a> {
    document: &'a ParsedDocument,
    offset: usize,
    chain: Vec<Scope>,
    /// Starts of the statements enclosing the current node.
    anchors: Vec<usize>,
}
impl ScopeCollector<'_> {
    fn contains(&self, span: Span) -> bool {
        let range = self.document.range(span);
        range.start < self.offset && self.offset < range.end
    }
    fn touches(&self, span: Span) -> bool {
        let range = self.document.range(span);
        range.start <= self.offset && self.offset <= range.end
    }
    fn push(
        &mut self,
        kind: ScopeKind,
        name: String,
        names: IndexMap<Atom, Binding>,
        origin: Span,
        anchor: Option<usize>,
    ) {
        let range = self.document.range(origin);
        let anchor = anchor
            .or_else(|| self.anchors.last().copied())
            .unwrap_or(range.start);
        self.chain.push(Scope {
            id: self.chain.len(),
            kind,
            name,
            names,
            origin: Some(Origin { range, anchor }),
        });
    }
    /// Opens a function scope when `origin` contains the offset. The caller
    /// descends into params and body only when this returns true.
    fn enter_function<'p>(
        &mut self,
        name: String,
        origin: Span,
        anchor: Option<usize>,
        own: Option<&Ident>,
        params: impl IntoIterator<Item = &'p Pat>,
        body: Option<&[Stmt]>,
    ) -> bool {
        if !self.contains(origin) {
            return false;
        }
        let mut names = IndexMap::new();
        let mut bind = |ident: &Ident, kind: BindingKind| {
            names.entry(ident.sym.clone()).or_insert(Binding {
                kind,
                offset: self.document.offset(ident.span.lo),
            });
        };
        if let Some(ident) = own {
            bind(ident, BindingKind::Function);
        }
        for pat in params {
            let mut idents = vec![];
            pattern_idents(pat, &mut idents);
            for ident in idents {
                bind(ident, BindingKind::Param);
            }
        }
        if let Some(stmts) = body {
            for (sym, binding) in declared_names(self.document, stmts, false) {
                names.entry(sym).or_insert(binding);
            }
        }
        self.push(ScopeKind::Function, name, names, origin, anchor);
        true
    }
    fn function(&mut self, function: &Function, name: String, own: Option<&Ident>, origin: Span, anchor: Option<usize>) {
        let body = function.body.as_ref().map(|b| &b.stmts[..]);
        if self.enter_function(name, origin, anchor, own, function.params.iter().map(|p| &p.pat), body) {
            function.params.visit_with(self);
            if let Some(body) = body {
                body.visit_with(self);
            }
        }
    }
    fn class(&mut self, class: &Class, name: String) {
        if !self.contains(class.span) {
            return;
        }
        self.push(ScopeKind::Class, name, IndexMap::new(), class.span, None);
        class.visit_children_with(self);
    }
    fn block(&mut self, stmts: &[Stmt], span: Span) {
        let names = declared_names(self.document, stmts, true);
        if !names.is_empty() {
            self.push(ScopeKind::Block, "block".to_owned(), names, span, None);
        }
    }
    fn loop_head(&mut self, decl: Option<&VarDecl>, span: Span) {
        let Some(decl) = decl.filter(|d| d.kind != VarDeclKind::Var) else {
            return;
        };
        let mut names = IndexMap::new();
        for d in decl.decls.iter() {
            let mut idents = vec![];
            pattern_idents(&d.name, &mut idents);
            for ident in idents {
                names.entry(ident.sym.clone()).or_insert(Binding {
                    kind: decl.kind.into(),
                    offset: self.document.offset(ident.span.lo),
                });
            }
        }
        self.push(ScopeKind::Block, "block".to_owned(), names, span, None);
    }
}
impl Visit for ScopeCollector<'_> {
    fn visit_stmt(&mut self, node: &Stmt) {
        let span = node.span();
        if !self.touches(span) {
            return;
        }
        self.anchors.push(self.document.offset(span.lo));
        node.visit_children_with(self);
        self.anchors.pop();
    }
    fn visit_module_item(&mut self, node: &ModuleItem) {
        match node {
            ModuleItem::Stmt(stmt) => stmt.visit_with(self),
            ModuleItem::ModuleDecl(decl) => {
                let span = decl.span();
                if !self.touches(span) {
                    return;
                }
                self.anchors.push(self.document.offset(span.lo));
                decl.visit_children_with(self);
                self.anchors.pop();
            }
        }
    }
    fn visit_fn_decl(&mut self, node: &FnDecl) {
        self.function(&node.function, node.ident.sym.to_string(), None, node.function.span, None);
    }
    fn visit_fn_expr(&mut self, node: &FnExpr) {
        let name = node
            .ident
            .as_ref()
            .map_or_else(|| "anonymous function".to_owned(), |i| i.sym.to_string());
        self.function(&node.function, name, node.ident.as_ref(), node.function.span, None);
    }
    fn visit_function(&mut self, node: &Function) {
        self.function(node, "function".to_owned(), None, node.span, None);
    }
    fn visit_method_prop(&mut self, node: &MethodProp) {
        self.function(&node.function, prop_name(&node.key), None, node.function.span, None);
    }
    fn visit_class_method(&mut self, node: &ClassMethod) {
        let anchor = self.document.offset(node.span.lo);
        self.function(&node.function, prop_name(&node.key), None, node.span, Some(anchor));
    }
    fn visit_private_method(&mut self, node: &PrivateMethod) {
        let anchor = self.document.offset(node.span.lo);
        self.function(&node.function, "private method".to_owned(), None, node.span, Some(anchor));
    }
    fn visit_constructor(&mut self, node: &Constructor) {
        let anchor = self.document.offset(node.span.lo);
        let params = node.params.iter().filter_map(|p| match p {
            ParamOrTsParamProp::Param(Param { pat, .. }) => Some(pat),
            _ => None,
        });
        let body = node.body.as_ref().map(|b| &b.stmts[..]);
        if self.enter_function("constructor".to_owned(), node.span, Some(anchor), None, params, body) {
            node.params.visit_with(self);
            if let Some(body) = body {
                body.visit_with(self);
            }
        }
    }
    fn visit_getter_prop(&mut self, node: &GetterProp) {
        let body = node.body.as_ref().map(|b| &b.stmts[..]);
        if self.enter_function(prop_name(&node.key), node.span, None, None, [] as [&Pat; 0], body) {
            if let Some(body) = body {
                body.visit_with(self);
            }
        }
    }
    fn visit_setter_prop(&mut self, node: &SetterProp) {
        let body = node.body.as_ref().map(|b| &b.stmts[..]);
        if self.enter_function(prop_name(&node.key), node.span, None, None, [&*node.param], body) {
            node.param.visit_with(self);
            if let Some(body) = body {
                body.visit_with(self);
            }
        }
    }
    fn visit_arrow_expr(&mut self, node: &ArrowExpr) {
        let body = match &*node.body {
            BlockStmtOrExpr::BlockStmt(b) => Some(&b.stmts[..]),
            BlockStmtOrExpr::Expr(_) => None,
        };
        if self.enter_function("arrow function".to_owned(), node.span, None, None, node.params.iter(), body) {
            node.params.visit_with(self);
            match &*node.body {
                BlockStmtOrExpr::BlockStmt(b) => b.stmts.visit_with(self),
                BlockStmtOrExpr::Expr(e) => e.visit_with(self),
            }
        }
    }
    fn visit_class_decl(&mut self, node: &ClassDecl) {
        self.class(&node.class, format!("class {}", node.ident.sym));
    }
    fn visit_class_expr(&mut self, node: &ClassExpr) {
        let name = node
            .ident
            .as_ref()
            .map_or_else(|| "class".to_owned(), |i| format!("class {}", i.sym));
        self.class(&node.class, name);
    }
    fn visit_class(&mut self, node: &Class) {
        self.class(node, "class".to_owned());
    }
    fn visit_block_stmt(&mut self, node: &BlockStmt) {
        if !self.contains(node.span) {
            return;
        }
        self.block(&node.stmts, node.span);
        node.stmts.visit_with(self);
    }
    fn visit_for_stmt(&mut self, node: &ForStmt) {
        if !self.contains(node.span) {
            return;
        }
        let decl = match &node.init {
            Some(VarDeclOrExpr::VarDecl(d)) => Some(&**d),
            _ => None,
        };
        self.loop_head(decl, node.span);
        node.visit_children_with(self);
    }
    fn visit_for_in_stmt(&mut self, node: &ForInStmt) {
        if !self.contains(node.span) {
            return;
        }
        let decl = match &node.left {
            ForHead::VarDecl(d) => Some(&**d),
            _ => None,
        };
        self.loop_head(decl, node.span);
        node.visit_children_with(self);
    }
    fn visit_for_of_stmt(&mut self, node: &ForOfStmt) {
        if !self.contains(node.span) {
            return;
        }
        let decl = match &node.left {
            ForHead::VarDecl(d) => Some(&**d),
            _ => None,
        };
        self.loop_head(decl, node.span);
        node.visit_children_with(self);
    }
    fn visit_catch_clause(&mut self, node: &CatchClause) {
        if !self.contains(node.span) {
            return;
        }
        let mut names = IndexMap::new();
        if let Some(param) = &node.param {
            let mut idents = vec![];
            pattern_idents(param, &mut idents);
            for ident in idents {
                names.entry(ident.sym.clone()).or_insert(Binding {
                    kind: BindingKind::Catch,
                    offset: self.document.offset(ident.span.lo),
                });
            }
        }
        for (sym, binding) in declared_names(self.document, &node.body.stmts, true) {
            names.entry(sym).or_insert(binding);
        }
        self.push(ScopeKind::Catch, "catch".to_owned(), names, node.span, None);
        node.param.visit_with(self);
        node.body.stmts.visit_with(self);
    }
}

/// Recursively collects every identifier a pattern binds (or, for
/// expression patterns, the identifier at the root of the target).
pub(crate) fn pattern_idents<'a>(pat: &'a Pat, out: &mut Vec<&'a Ident>) {
    match pat {
        Pat::Ident(binding_ident) => out.push(&binding_ident.id),
        Pat::Array(array_pat) => array_idents(array_pat, out),
        Pat::Rest(rest_pat) => pattern_idents(&rest_pat.arg, out),
        Pat::Object(object_pat) => object_idents(object_pat, out),
        Pat::Assign(assign_pat) => pattern_idents(&assign_pat.left, out),
        Pat::Expr(expr) => out.extend(root_ident(expr)),
        Pat::Invalid(_) => {}
    }
}
pub(crate) fn array_idents<'a>(array_pat: &'a ArrayPat, out: &mut Vec<&'a Ident>) {
    for elem in array_pat.elems.iter().flatten() {
        pattern_idents(elem, out);
    }
}
pub(crate) fn object_idents<'a>(object_pat: &'a ObjectPat, out: &mut Vec<&'a Ident>) {
    for prop in object_pat.props.iter() {
        match prop {
            ObjectPatProp::KeyValue(key_value) => pattern_idents(&key_value.value, out),
            ObjectPatProp::Assign(assign) => out.push(&assign.key.id),
            ObjectPatProp::Rest(rest) => pattern_idents(&rest.arg, out),
        }
    }
}
/// `a` for `a`, `a.b.c`, `(a).b` and `a[i]`.
pub(crate) fn root_ident(expr: &Expr) -> Option<&Ident> {
    match expr {
        Expr::Ident(ident) => Some(ident),
        Expr::Member(member) => root_ident(&member.obj),
        Expr::Paren(paren) => root_ident(&paren.expr),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::{document, marked};
    use pretty_assertions::assert_eq;

    fn chain(src: &str) -> (ParsedDocument, Range<usize>, ScopeChain) {
        let (text, range) = marked(src);
        let doc = document(&text);
        let chain = LexicalScopes::default()
            .scope_chain(&doc, range.start)
            .expect("scope chain");
        (doc, range, chain)
    }
    fn kinds(chain: &ScopeChain) -> Vec<ScopeKind> {
        chain.iter().map(|s| s.kind).collect()
    }
    fn names(scope: &Scope) -> Vec<String> {
        scope.names.keys().map(|k| k.to_string()).collect()
    }

    #[test]
    fn function_inside_program() {
        let (doc, _, chain) = chain("var a = 1;\nfunction f(b) {\n    var c;\n    «c = b;»\n}\n");
        assert_eq!(kinds(&chain), vec![ScopeKind::Program, ScopeKind::Function]);
        assert_eq!(names(&chain.get(0).unwrap()), vec!["a", "f"]);
        assert_eq!(names(&chain.get(1).unwrap()), vec!["b", "c"]);
        let origin = chain.get(1).unwrap().origin.clone().unwrap();
        assert_eq!(origin.anchor, doc.text.find("function").unwrap());
        assert_eq!(origin.range.end, doc.text.rfind('}').unwrap() + 1);
        assert!(chain.get(0).unwrap().origin.is_none());
    }

    #[test]
    fn var_hoists_out_of_blocks_but_let_does_not() {
        let (_, _, chain) = chain("function f() {\n    if (x) { var h = 1; let l = 2; }\n    «h;»\n}\n");
        assert_eq!(kinds(&chain), vec![ScopeKind::Program, ScopeKind::Function]);
        assert_eq!(names(&chain.get(1).unwrap()), vec!["h"]);
    }

    #[test]
    fn class_method_opens_class_and_function_scopes() {
        let (doc, _, chain) = chain("class A {\n    m(x) {\n        «x + 1;»\n    }\n}\n");
        assert_eq!(
            kinds(&chain),
            vec![ScopeKind::Program, ScopeKind::Class, ScopeKind::Function]
        );
        let class = chain.get(1).unwrap();
        assert!(class.is_class());
        assert!(class.names.is_empty());
        assert_eq!(class.name, "class A");
        let method = chain.get(2).unwrap();
        assert_eq!(method.name, "m");
        assert_eq!(method.origin.as_ref().unwrap().anchor, doc.text.find("m(x)").unwrap());
        assert_eq!(chain.function_scopes().count(), 3);
    }

    #[test]
    fn lexical_block_and_catch_scopes() {
        let (_, _, chain) = chain(
            "function f() {\n    try {} catch (e) {\n        if (e) {\n            let t = e;\n            «t;»\n        }\n    }\n}\n",
        );
        assert_eq!(
            kinds(&chain),
            vec![
                ScopeKind::Program,
                ScopeKind::Function,
                ScopeKind::Catch,
                ScopeKind::Block
            ]
        );
        assert_eq!(names(&chain.get(2).unwrap()), vec!["e"]);
        assert_eq!(chain.function_scopes().count(), 2);
        assert_eq!(chain.innermost().unwrap().id, 3);
    }

    #[test]
    fn arrow_in_call_is_anchored_at_the_statement() {
        let (doc, _, chain) = chain("items.forEach((item) => {\n    «use(item);»\n});\n");
        let arrow = chain.get(1).unwrap();
        assert_eq!(arrow.kind, ScopeKind::Function);
        assert_eq!(names(arrow), vec!["item"]);
        assert_eq!(arrow.origin.as_ref().unwrap().anchor, 0);
        assert_eq!(doc.text.len(), arrow.origin.as_ref().unwrap().range.end + 3);
    }

    #[test]
    fn names_between_excludes_outer_and_includes_inner() {
        let (_, _, chain) = chain(
            "var g;\nfunction outer(o) {\n    function inner(i) {\n        «o + i;»\n    }\n}\n",
        );
        let between: Vec<String> = chain.names_between(0, 2).iter().map(|a| a.to_string()).collect();
        assert_eq!(between, vec!["o", "inner", "i"]);
        assert!(chain.names_between(2, 2).is_empty());
        assert!(chain.declares("g"));
        assert!(!chain.declares("missing"));
    }

    #[test]
    fn offset_outside_document_fails() {
        let doc = document("a;");
        let err = LexicalScopes::default().scope_chain(&doc, 10).unwrap_err();
        assert!(matches!(err, ExtractError::ScopeResolution { .. }));
    }
}
