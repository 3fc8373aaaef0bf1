//! Generation of the extracted function and the code replacing the fragment.
use super::*;
use crate::builder::indentation_at;

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Synthesis {
    pub name: String,
    /// Full declaration text, followed by a blank line.
    pub declaration: String,
    /// Text that replaces the selection.
    pub call: String,
    /// Line start where the declaration is inserted.
    pub insertion_point: usize,
}

pub fn synthesize(
    analysis: &Analysis,
    scopes: &ScopeChain,
    destination: ScopeId,
    range: &ExtractionRange,
    kind: FragmentKind,
    text: &str,
    flags: &ExtractFlags,
) -> ExtractResult<Synthesis> {
    let function_scopes: Vec<&Scope> = scopes.function_scopes().collect();
    let Some(position) = function_scopes.iter().position(|s| s.id == destination) else {
        return Err(ExtractError::InvalidDestination { id: destination });
    };
    let in_class = function_scopes[position].is_class();

    let name = unique_name(scopes, &flags.function_prefix);
    let params = analysis
        .pass_params
        .iter()
        .map(|p| &**p)
        .collect::<Vec<&str>>()
        .join(", ");
    let invocation = if in_class {
        format!("this.{name}({params})")
    } else if analysis.uses_receiver && params.is_empty() {
        format!("{name}.call(this)")
    } else if analysis.uses_receiver {
        format!("{name}.call(this, {params})")
    } else {
        format!("{name}({params})")
    };

    let mut body = CodeBuilder::new(&*flags.indent_unit);
    if in_class {
        body.line(format!("{name}({params}) {{"));
    } else {
        body.line(format!("function {name}({params}) {{"));
    }
    body.indent();
    let call = match kind {
        FragmentKind::Expression => {
            body.text(&format!("return {};", range.text));
            invocation
        }
        FragmentKind::Statements => {
            if range.text.ends_with([';', '}']) {
                body.text(&range.text);
            } else {
                body.text(&format!("{};", range.text));
            }
            match &analysis.return_params[..] {
                [] => format!("{invocation};"),
                [single] => {
                    body.line(format!("return {single};"));
                    format!("{}{single} = {invocation};", declaration_prefix(analysis, single))
                }
                many => {
                    let fields = many
                        .iter()
                        .map(|n| format!("{n}: {n}"))
                        .collect::<Vec<_>>()
                        .join(", ");
                    body.line(format!("return {{{fields}}};"));
                    let binding = unique_name(scopes, &flags.result_binding);
                    let indent = indentation_at(text, range.start);
                    let mut call = format!("var {binding} = {invocation};");
                    for n in many {
                        call.push('\n');
                        call.push_str(indent);
                        call.push_str(&format!("{}{n} = {binding}.{n};", declaration_prefix(analysis, n)));
                    }
                    call
                }
            }
        }
    };
    body.dedent().line("}").blank();

    let anchor = function_scopes
        .get(position + 1)
        .and_then(|s| s.origin.as_ref())
        .map_or(range.anchor, |o| o.anchor);
    let synthesis = Synthesis {
        name,
        declaration: body.finish(),
        call,
        insertion_point: line_start(text, anchor),
    };
    debug!(
        name = %synthesis.name,
        destination,
        in_class,
        insertion_point = synthesis.insertion_point,
        returns = analysis.return_params.len(),
        "synthesized function"
    );
    Ok(synthesis)
}

/// `prefix` if nothing in the chain declares it, else the first free
/// `prefix1`, `prefix2`, ...
fn unique_name(scopes: &ScopeChain, prefix: &str) -> String {
    if !scopes.declares(prefix) {
        return prefix.to_owned();
    }
    let mut n = 1usize;
    loop {
        let candidate = format!("{prefix}{n}");
        if !scopes.declares(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

fn declaration_prefix(analysis: &Analysis, name: &Atom) -> &'static str {
    match analysis.declarations.get(name) {
        Some(VarDeclKind::Var) => "var ",
        Some(VarDeclKind::Let) => "let ",
        Some(VarDeclKind::Const) => "const ",
        None => "",
    }
}
