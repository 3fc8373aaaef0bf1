//! Line-oriented source text builder.
use super::*;

/// Accumulates lines of JavaScript at a tracked indentation level.
#[derive(Clone, Debug)]
pub struct CodeBuilder {
    indent_unit: String,
    level: usize,
    out: String,
}
impl CodeBuilder {
    pub fn new(indent_unit: impl Into<String>) -> Self {
        Self {
            indent_unit: indent_unit.into(),
            level: 0,
            out: String::new(),
        }
    }
    pub fn indent(&mut self) -> &mut Self {
        self.level += 1;
        self
    }
    pub fn dedent(&mut self) -> &mut Self {
        self.level = self.level.saturating_sub(1);
        self
    }
    /// Writes one line at the current level. Empty lines get no indentation.
    pub fn line(&mut self, text: impl AsRef<str>) -> &mut Self {
        let text = text.as_ref();
        if !text.trim().is_empty() {
            for _ in 0..self.level {
                self.out.push_str(&self.indent_unit);
            }
        }
        self.out.push_str(text.trim_end());
        self.out.push('\n');
        self
    }
    pub fn blank(&mut self) -> &mut Self {
        self.out.push('\n');
        self
    }
    /// Writes a multi-line snippet cut out of a document.
    ///
    /// The first line is taken as is; the remaining ones lose the
    /// indentation they have in common before being re-indented at the
    /// current level.
    pub fn text(&mut self, snippet: &str) -> &mut Self {
        let mut lines = snippet.lines();
        let Some(first) = lines.next() else {
            return self;
        };
        let rest: Vec<&str> = lines.collect();
        let common = rest
            .iter()
            .filter(|l| !l.trim().is_empty())
            .map(|l| leading_whitespace(l))
            .min()
            .unwrap_or(0);
        self.line(first.trim_start());
        for line in rest {
            self.line(line.get(common..).unwrap_or_else(|| line.trim_start()));
        }
        self
    }
    pub fn build(&self) -> String {
        self.out.clone()
    }
    pub fn finish(self) -> String {
        self.out
    }
}

fn leading_whitespace(line: &str) -> usize {
    line.len() - line.trim_start_matches([' ', '\t']).len()
}

/// Indentation of the line holding `offset`.
pub fn indentation_at(text: &str, offset: usize) -> &str {
    let start = line_start(text, offset);
    let line = &text[start..];
    &line[..leading_whitespace(line.lines().next().unwrap_or(""))]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn nested_blocks() {
        let mut b = CodeBuilder::new("  ");
        b.line("function f() {")
            .indent()
            .line("if (x) {")
            .indent()
            .line("y();")
            .dedent()
            .line("}")
            .dedent()
            .line("}")
            .blank();
        assert_eq!(b.finish(), "function f() {\n  if (x) {\n    y();\n  }\n}\n\n");
    }

    #[test]
    fn snippet_loses_common_indentation() {
        let mut b = CodeBuilder::new("    ");
        b.indent().text("var x = 1;\n        if (x) {\n            x++;\n        }");
        assert_eq!(
            b.finish(),
            "    var x = 1;\n    if (x) {\n        x++;\n    }\n"
        );
    }

    #[test]
    fn blank_lines_inside_snippet_stay_empty() {
        let mut b = CodeBuilder::new("\t");
        b.indent().text("a();\n\n    b();");
        assert_eq!(b.build(), "\ta();\n\n\tb();\n");
    }

    #[test]
    fn dedent_saturates() {
        let mut b = CodeBuilder::new("    ");
        b.dedent().line("x;");
        assert_eq!(b.finish(), "x;\n");
    }

    #[test]
    fn indentation_of_line() {
        let text = "a;\n    b;\n\tc;";
        assert_eq!(indentation_at(text, 8), "    ");
        assert_eq!(indentation_at(text, text.len()), "\t");
        assert_eq!(indentation_at(text, 0), "");
    }
}
