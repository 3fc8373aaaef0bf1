//! Data-flow classification of a selected fragment.
//!
//! Which names must be passed into the extracted function, which must flow
//! back out of it, and whether it needs the enclosing `this`.
use super::*;

#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Analysis {
    pub pass_params: Vec<Atom>,
    pub return_params: Vec<Atom>,
    pub uses_receiver: bool,
    /// Declaration kind of every return parameter declared in the fragment.
    pub declarations: IndexMap<Atom, VarDeclKind>,
}

pub fn analyze(
    document: &ParsedDocument,
    range: &ExtractionRange,
    scopes: &ScopeChain,
    source: ScopeId,
    destination: ScopeId,
) -> ExtractResult<Analysis> {
    let Some(source_scope) = scopes.get(source) else {
        return Err(ExtractError::scope_resolution(format!("no scope with id {source}")));
    };
    if destination > source {
        return Err(ExtractError::InvalidDestination { id: destination });
    }
    let fragment = ParsedDocument::parse_fragment(&range.text).map_err(|e| match e {
        ExtractError::Parse { offset, message } => ExtractError::Parse {
            offset: offset + range.start,
            message,
        },
        e => e,
    })?;

    let mut usage = Usage::default();
    fragment.program.visit_with(&mut usage);

    // `var` and function declarations outlive blocks, so liveness runs to the
    // end of the enclosing function rather than the innermost scope.
    let limit = scopes
        .enclosing_function(source_scope.id)
        .and_then(|s| s.origin.as_ref())
        .map_or(document.text.len(), |o| o.range.end);
    let mut trailing = Trailing {
        document,
        window: range.end..limit,
        names: IndexSet::new(),
        declaring: false,
    };
    document.program.visit_with(&mut trailing);

    let in_scope = scopes.names_between(destination, source);
    let pass_params = usage
        .referenced
        .iter()
        .filter(|n| !usage.local.contains(*n) && in_scope.contains(*n))
        .cloned()
        .collect();
    let return_params: Vec<Atom> = usage
        .changed
        .iter()
        .filter(|n| trailing.names.contains(*n))
        .filter(|n| in_scope.contains(*n) || usage.local.contains(*n))
        .cloned()
        .collect();
    let declarations = usage
        .kinds
        .into_iter()
        .filter(|(n, _)| return_params.contains(n))
        .collect();

    let analysis = Analysis {
        pass_params,
        return_params,
        uses_receiver: usage.receiver,
        declarations,
    };
    debug!(
        source,
        destination,
        pass = ?analysis.pass_params,
        returns = ?analysis.return_params,
        receiver = analysis.uses_receiver,
        "analyzed fragment"
    );
    Ok(analysis)
}

/// What the fragment reads, writes and declares.
#[derive(Default)]
struct Usage {
    referenced: IndexSet<Atom>,
    changed: IndexSet<Atom>,
    local: IndexSet<Atom>,
    kinds: IndexMap<Atom, VarDeclKind>,
    receiver: bool,
    /// Nesting of constructs that rebind `this`.
    rebound: usize,
}
impl Usage {
    fn rebinding(&mut self, f: impl FnOnce(&mut Self)) {
        self.rebound += 1;
        f(self);
        self.rebound -= 1;
    }
    fn write(&mut self, idents: &[&Ident]) {
        for ident in idents {
            self.referenced.insert(ident.sym.clone());
            self.changed.insert(ident.sym.clone());
        }
    }
    /// A function or class declared by the fragment. It flows back like an
    /// initialized binding of `kind`.
    fn declare(&mut self, ident: &Ident, kind: VarDeclKind) {
        self.local.insert(ident.sym.clone());
        self.changed.insert(ident.sym.clone());
        self.kinds.insert(ident.sym.clone(), kind);
    }
}
impl Visit for Usage {
    fn visit_expr(&mut self, node: &Expr) {
        if let Expr::Ident(ident) = node {
            self.referenced.insert(ident.sym.clone());
        }
        node.visit_children_with(self);
    }
    fn visit_prop(&mut self, node: &Prop) {
        if let Prop::Shorthand(ident) = node {
            self.referenced.insert(ident.sym.clone());
        }
        node.visit_children_with(self);
    }
    fn visit_assign_expr(&mut self, node: &AssignExpr) {
        let mut idents = vec![];
        match &node.left {
            AssignTarget::Simple(SimpleAssignTarget::Ident(binding)) => idents.push(&binding.id),
            AssignTarget::Simple(SimpleAssignTarget::Member(member)) => {
                idents.extend(root_ident(&member.obj))
            }
            AssignTarget::Simple(SimpleAssignTarget::Paren(paren)) => {
                idents.extend(root_ident(&paren.expr))
            }
            AssignTarget::Simple(_) => {}
            AssignTarget::Pat(AssignTargetPat::Array(array)) => array_idents(array, &mut idents),
            AssignTarget::Pat(AssignTargetPat::Object(object)) => object_idents(object, &mut idents),
            AssignTarget::Pat(AssignTargetPat::Invalid(_)) => {}
        }
        self.write(&idents);
        node.visit_children_with(self);
    }
    fn visit_update_expr(&mut self, node: &UpdateExpr) {
        let idents: Vec<&Ident> = root_ident(&node.arg).into_iter().collect();
        self.write(&idents);
        node.visit_children_with(self);
    }
    fn visit_var_decl(&mut self, node: &VarDecl) {
        for decl in node.decls.iter() {
            let mut idents = vec![];
            pattern_idents(&decl.name, &mut idents);
            for ident in idents {
                self.local.insert(ident.sym.clone());
                self.kinds.insert(ident.sym.clone(), node.kind);
                if decl.init.is_some() {
                    self.changed.insert(ident.sym.clone());
                }
            }
        }
        node.visit_children_with(self);
    }
    fn visit_fn_decl(&mut self, node: &FnDecl) {
        self.declare(&node.ident, VarDeclKind::Var);
        node.visit_children_with(self);
    }
    fn visit_class_decl(&mut self, node: &ClassDecl) {
        self.declare(&node.ident, VarDeclKind::Let);
        node.visit_children_with(self);
    }
    fn visit_this_expr(&mut self, _: &ThisExpr) {
        if self.rebound == 0 {
            self.receiver = true;
        }
    }
    fn visit_function(&mut self, node: &Function) {
        self.rebinding(|this| node.visit_children_with(this));
    }
    fn visit_class(&mut self, node: &Class) {
        self.rebinding(|this| node.visit_children_with(this));
    }
    fn visit_getter_prop(&mut self, node: &GetterProp) {
        self.rebinding(|this| node.visit_children_with(this));
    }
    fn visit_setter_prop(&mut self, node: &SetterProp) {
        self.rebinding(|this| node.visit_children_with(this));
    }
}

/// Every identifier of the document that sits inside `window`, except the
/// ones being declared there.
struct Trailing<'a> {
    document: &'a ParsedDocument,
    window: Range<usize>,
    names: IndexSet<Atom>,
    /// Set while walking a binding pattern.
    declaring: bool,
}
impl Trailing<'_> {
    fn binding(&mut self, f: impl FnOnce(&mut Self)) {
        let outer = std::mem::replace(&mut self.declaring, true);
        f(self);
        self.declaring = outer;
    }
}
impl Visit for Trailing<'_> {
    fn visit_ident(&mut self, node: &Ident) {
        let range = self.document.range(node.span);
        if self.window.start <= range.start && range.end <= self.window.end {
            self.names.insert(node.sym.clone());
        }
    }
    fn visit_binding_ident(&mut self, node: &BindingIdent) {
        if !self.declaring {
            node.visit_children_with(self);
        }
    }
    fn visit_expr(&mut self, node: &Expr) {
        let outer = std::mem::replace(&mut self.declaring, false);
        node.visit_children_with(self);
        self.declaring = outer;
    }
    fn visit_var_declarator(&mut self, node: &VarDeclarator) {
        self.binding(|this| node.name.visit_with(this));
        node.init.visit_with(self);
    }
    fn visit_param(&mut self, node: &Param) {
        node.decorators.visit_with(self);
        self.binding(|this| node.pat.visit_with(this));
    }
    fn visit_arrow_expr(&mut self, node: &ArrowExpr) {
        self.binding(|this| node.params.visit_with(this));
        node.body.visit_with(self);
    }
    fn visit_catch_clause(&mut self, node: &CatchClause) {
        self.binding(|this| node.param.visit_with(this));
        node.body.visit_with(self);
    }
    fn visit_fn_decl(&mut self, node: &FnDecl) {
        node.function.visit_with(self);
    }
    fn visit_fn_expr(&mut self, node: &FnExpr) {
        node.function.visit_with(self);
    }
    fn visit_class_decl(&mut self, node: &ClassDecl) {
        node.class.visit_with(self);
    }
    fn visit_class_expr(&mut self, node: &ClassExpr) {
        node.class.visit_with(self);
    }
    fn visit_stmt(&mut self, node: &Stmt) {
        if self.document.range(node.span()).end > self.window.start {
            node.visit_children_with(self);
        }
    }
}
