//! Method and constructor emitters, including overload unification.
//!
//! Java overloads collapse into a single Python `def` taking the ordered
//! union of all parameter names, each defaulting to `None`, with the
//! original bodies dispatched by presence guards in declaration order: an
//! overload declaring parameters P gets "each of P is not None", the
//! zero-parameter overload gets "every union parameter is None". The guards
//! are by presence, not by type, so two overloads distinguished only by
//! parameter type keep the first-declared body. That ambiguity is accepted
//! and visible in the output rather than silently resolved.

use tracing::debug;

use super::classes::docstring_lines;
use super::{indent_lines, indent_or_pass, Generator};
use crate::mappings::is_python_keyword;
use crate::node::Node;

/// Structural children of a callable that carry no body statements.
const IGNORE_IN_BODY: &[&str] = &[
    "Parameter",
    "Modifier",
    "SimpleName",
    "Name",
    "VoidType",
    "PrimitiveType",
    "ClassOrInterfaceType",
    "TypeParameter",
    "ReferenceType",
    "ReturnType",
    "Javadoc",
    "JavadocComment",
];

impl Generator {
    /// Emit a single method or constructor.
    pub(crate) fn generate_callable(&mut self, node: &Node) -> Vec<String> {
        let is_ctor = matches!(
            node.kind.as_str(),
            "Constructor" | "ConstructorDeclaration"
        );
        if is_ctor {
            return self.generate_constructors(&[node]);
        }

        let name = node.name_or("method").to_string();
        let params = self.parameter_names(node);
        let is_static = node.has_modifier("static");
        let docstring = docstring_lines(node);

        let body = self.callable_body(node, &params, !docstring.is_empty());

        // A "static" method whose body ended up touching self is demoted to
        // an instance method.
        let uses_self = body.iter().any(|ln| ln.contains("self."));
        let emit_static = is_static && !uses_self;

        let mut lines = Vec::new();
        if emit_static && name == "main" {
            lines.push("@staticmethod".to_string());
            lines.push("def main(args=None):".to_string());
            lines.extend(indent_lines(&docstring));
            lines.push("    if args is None:".to_string());
            lines.push("        args = []".to_string());
            lines.extend(indent_lines(&body));
        } else {
            let sig_params = if emit_static || !self.ctx.in_class() {
                params.join(", ")
            } else if params.is_empty() {
                "self".to_string()
            } else {
                format!("self, {}", params.join(", "))
            };
            if emit_static {
                lines.push("@staticmethod".to_string());
            }
            lines.push(format!("def {name}({sig_params}):"));
            lines.extend(indent_lines(&docstring));
            lines.extend(indent_or_pass(&body));
        }
        lines.push(String::new());
        lines
    }

    /// Emit one `__init__` from one or more constructor declarations.
    /// Accumulated instance-field assignments come first, then the
    /// constructor body (guard-dispatched when overloaded).
    pub(crate) fn generate_constructors(&mut self, ctors: &[&Node]) -> Vec<String> {
        self.class_has_ctor = true;
        let field_lines = self.pending_field_assignments();

        let mut lines = Vec::new();
        if ctors.len() == 1 {
            let ctor = ctors[0];
            let params = self.parameter_names(ctor);
            let docstring = docstring_lines(ctor);
            let body = self.callable_body(ctor, &params, !docstring.is_empty());
            let sig_params = if params.is_empty() {
                "self".to_string()
            } else {
                format!("self, {}", params.join(", "))
            };
            lines.push(format!("def __init__({sig_params}):"));
            lines.extend(indent_lines(&docstring));
            lines.extend(indent_lines(&field_lines));
            if body.is_empty() && field_lines.is_empty() && docstring.is_empty() {
                lines.push("    pass".to_string());
            } else {
                lines.extend(indent_lines(&body));
            }
        } else {
            debug!(count = ctors.len(), "unifying overloaded constructors");
            let unified = self.unify_overloads("__init__", ctors, true, false, &field_lines);
            lines.extend(unified);
        }
        lines.push(String::new());
        lines
    }

    /// Emit one `def` from a group of same-named method overloads.
    pub(crate) fn generate_overloads(&mut self, group: &[&Node]) -> Vec<String> {
        let name = group[0].name_or("method").to_string();
        debug!(method = %name, count = group.len(), "unifying overloaded methods");
        let is_static = group[0].has_modifier("static");
        let mut lines =
            self.unify_overloads(&name, group, self.ctx.in_class(), is_static, &[]);
        lines.push(String::new());
        lines
    }

    fn unify_overloads(
        &mut self,
        name: &str,
        group: &[&Node],
        in_class: bool,
        is_static: bool,
        preamble: &[String],
    ) -> Vec<String> {
        // Ordered union of parameter names across all overloads. Each body is
        // rendered under a scope holding only its own parameters, so a field
        // name another overload takes as a parameter still qualifies.
        let mut union: Vec<String> = Vec::new();
        let mut per_overload: Vec<(Vec<String>, Vec<String>)> = Vec::new();
        for overload in group {
            let params = self.parameter_names(overload);
            for p in &params {
                if !union.contains(p) {
                    union.push(p.clone());
                }
            }
            let docstring = docstring_lines(overload);
            let body = self.callable_body(overload, &params, !docstring.is_empty());
            per_overload.push((params, body));
        }

        let uses_self = per_overload
            .iter()
            .flat_map(|(_, body)| body.iter())
            .any(|ln| ln.contains("self."));
        let emit_static = is_static && !uses_self;
        let takes_self = in_class && !emit_static;

        let defaults: Vec<String> = union.iter().map(|p| format!("{p}=None")).collect();
        let sig_params = if takes_self {
            if defaults.is_empty() {
                "self".to_string()
            } else {
                format!("self, {}", defaults.join(", "))
            }
        } else {
            defaults.join(", ")
        };

        let mut lines = Vec::new();
        if emit_static && in_class {
            lines.push("@staticmethod".to_string());
        }
        lines.push(format!("def {name}({sig_params}):"));
        lines.extend(indent_lines(preamble));

        for (idx, (params, body)) in per_overload.iter().enumerate() {
            let condition = if params.is_empty() {
                union
                    .iter()
                    .map(|p| format!("{p} is None"))
                    .collect::<Vec<_>>()
                    .join(" and ")
            } else {
                params
                    .iter()
                    .map(|p| format!("{p} is not None"))
                    .collect::<Vec<_>>()
                    .join(" and ")
            };
            let head = if idx == 0 {
                if condition.is_empty() {
                    "if True:".to_string()
                } else {
                    format!("if {condition}:")
                }
            } else if condition.is_empty() {
                "else:".to_string()
            } else {
                format!("elif {condition}:")
            };
            lines.push(format!("    {head}"));

            for ln in indent_or_pass(body) {
                if ln.trim().is_empty() {
                    lines.push(String::new());
                } else {
                    lines.push(format!("    {ln}"));
                }
            }
        }
        lines
    }

    /// Parameter names in declaration order, sanitized against Python
    /// reserved words. A rename is recorded so body references follow.
    fn parameter_names(&mut self, node: &Node) -> Vec<String> {
        node.children_of_kind(&["Parameter"])
            .filter_map(|p| p.name.as_deref())
            .map(|raw| {
                if is_python_keyword(raw) {
                    let alias = format!("{raw}_");
                    self.ctx
                        .param_alias
                        .insert(raw.to_string(), alias.clone());
                    alias
                } else {
                    raw.to_string()
                }
            })
            .collect()
    }

    /// Body lines of a callable, converted inside a scope holding its
    /// parameters. Javadoc-style comment children are suppressed while a
    /// docstring was emitted for the same declaration.
    fn callable_body(&mut self, node: &Node, params: &[String], has_docstring: bool) -> Vec<String> {
        if has_docstring {
            self.ctx.doc_comment_suppression += 1;
        }
        let lines = self.with_scope(params.to_vec(), |this| {
            let mut lines = Vec::new();
            let stmts = body_statements(node);
            for child in stmts {
                lines.extend(this.convert_node(child));
            }
            lines
        });
        if has_docstring {
            self.ctx.doc_comment_suppression -= 1;
        }
        lines
    }
}

/// The statement-bearing children of a callable: the contents of an explicit
/// block child when present, else the direct children minus structural noise.
fn body_statements(node: &Node) -> Vec<&Node> {
    if let Some(block) = node.first_child_of_kind(&["BlockStmt", "Block", "Body"]) {
        return block.children.iter().collect();
    }
    node.children
        .iter()
        .filter(|ch| !IGNORE_IN_BODY.contains(&ch.kind.as_str()))
        .collect()
}
