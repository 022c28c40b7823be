//! Recursive dispatch-based generation of Python source lines.
//!
//! Every emitter returns an ordered `Vec<String>` of lines with no leading
//! indentation of its own; the caller wrapping a child block applies the
//! indentation. The dispatcher routes each node by its closed [`NodeKind`]
//! classification and records conversion statistics as it goes. No handler
//! may fail: unrecognized input degrades to a visible placeholder line.

pub mod classes;
pub mod control;
pub mod exprs;
pub mod fields;
pub mod methods;
pub mod postprocess;

use tracing::debug;

use crate::context::Context;
use crate::node::{Node, NodeKind};

/// One accumulated instance field awaiting constructor synthesis.
#[derive(Debug, Clone)]
pub struct PendingField {
    pub name: String,
    pub annotation: Option<String>,
    pub initializer: Option<String>,
}

/// The code generator: owns the shared conversion state and drives the
/// whole-tree walk.
pub struct Generator {
    pub(crate) ctx: Context,
    /// Instance fields of the class currently being emitted.
    pub(crate) pending_fields: Vec<PendingField>,
    /// Whether that class declared an explicit constructor.
    pub(crate) class_has_ctor: bool,
}

impl Default for Generator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator {
    pub fn new() -> Self {
        Self {
            ctx: Context::new(),
            pending_fields: Vec::new(),
            class_has_ctor: false,
        }
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    pub fn into_context(self) -> Context {
        self.ctx
    }

    /// Convert one node into output lines. Total over any input: never
    /// panics, never errors, at worst emits a diagnostic placeholder.
    pub fn convert_node(&mut self, node: &Node) -> Vec<String> {
        let kind = NodeKind::classify(&node.kind);
        let lines = match kind {
            NodeKind::Project => self.convert_children(node),
            NodeKind::File => self.generate_file(node),
            NodeKind::Package => vec![
                format!("# package: {}", node.name_or("")),
                String::new(),
            ],
            NodeKind::Import => vec![
                format!("# import: {}", node.name_or("")),
                String::new(),
            ],
            // Javadoc is consumed by the declaration emitters as docstrings.
            NodeKind::Javadoc => Vec::new(),
            NodeKind::Comment => self.generate_comment(node),
            NodeKind::TypeDecl(decl) => self.generate_type_decl(node, decl),
            NodeKind::Field => self.generate_field(node),
            NodeKind::Variable => self.generate_variable(node),
            NodeKind::Method | NodeKind::Constructor => self.generate_callable(node),
            NodeKind::Stmt(stmt) => self.generate_statement(node, stmt),
            NodeKind::Literal => self.generate_literal(node),
            NodeKind::Expression => self.generate_expression(node),
            NodeKind::Unknown => {
                debug!(kind = %node.kind, "no handler bound for node kind");
                vec![format!("# Unhandled node type: {}", node.kind)]
            }
        };
        self.record_stats(kind, &node.kind, &lines);
        lines
    }

    /// Generator-level mirror of [`Context::with_scope`]: the emitters need
    /// `&mut self` inside the scope, not just the context.
    pub(crate) fn with_scope<R>(
        &mut self,
        names: Vec<String>,
        body: impl FnOnce(&mut Self) -> R,
    ) -> R {
        self.ctx.push_scope(names);
        let result = body(self);
        self.ctx.pop_scope();
        result
    }

    pub(crate) fn with_class<R>(
        &mut self,
        name: &str,
        nested_types: Vec<String>,
        body: impl FnOnce(&mut Self) -> R,
    ) -> R {
        self.ctx.push_class(name, nested_types);
        let result = body(self);
        self.ctx.pop_class();
        result
    }

    pub(crate) fn convert_children(&mut self, node: &Node) -> Vec<String> {
        let mut lines = Vec::new();
        for child in &node.children {
            lines.extend(self.convert_node(child));
        }
        lines
    }

    fn generate_file(&mut self, node: &Node) -> Vec<String> {
        let mut lines = vec![format!("# --- File: {} ---", node.name_or("<file>")), String::new()];
        lines.extend(self.convert_children(node));
        lines.push(String::new());
        lines
    }

    fn generate_comment(&self, node: &Node) -> Vec<String> {
        let content = node
            .descriptor
            .as_deref()
            .or(node.name.as_deref())
            .unwrap_or("");
        if content.is_empty() {
            return Vec::new();
        }
        if self.ctx.doc_comment_suppression > 0 {
            let stripped = content.trim();
            if stripped.starts_with('*')
                || stripped.starts_with('@')
                || stripped.contains("@param")
                || stripped.contains("@return")
            {
                return Vec::new();
            }
        }
        content
            .lines()
            .map(|ln| {
                if ln.trim().is_empty() {
                    "#".to_string()
                } else {
                    format!("# {ln}")
                }
            })
            .collect()
    }

    fn generate_literal(&self, node: &Node) -> Vec<String> {
        let value = match node.name.as_deref().or(node.descriptor.as_deref()) {
            Some(v) => v,
            None => return vec!["None".to_string()],
        };
        if value.starts_with('"') && value.ends_with('"') && value.len() >= 2 {
            return vec![value.to_string()];
        }
        if value.parse::<f64>().is_ok() {
            return vec![value.to_string()];
        }
        match value {
            "true" => vec!["True".to_string()],
            "false" => vec!["False".to_string()],
            "null" => vec!["None".to_string()],
            other => vec![format!("{other:?}")],
        }
    }

    /// Variable declarator outside an expression fragment: record the coarse
    /// type, mark the name local, and render `name = initializer`.
    fn generate_variable(&mut self, node: &Node) -> Vec<String> {
        let name = match node.name.as_deref() {
            Some(n) if !n.is_empty() => n.to_string(),
            _ => return Vec::new(),
        };
        let declared_type = node.descriptor.clone();
        if let Some(base) = declared_type
            .as_deref()
            .and_then(crate::mappings::short_base_type)
        {
            self.ctx.symtab.insert(name.clone(), base.to_string());
        }
        self.ctx.add_local(&name);

        let init = match node.attr("initializer") {
            Some(init) => init.trim().to_string(),
            None => return Vec::new(),
        };
        if let Some(dtype) = declared_type.as_deref() {
            if dtype.contains("PriorityQueue") {
                if let Some(lines) = self.capture_pq_comparator(&name, &init) {
                    return lines;
                }
            }
        }
        let value = self.rewrite_inline(&init);
        vec![format!("{name} = {value}")]
    }

    fn record_stats(&mut self, kind: NodeKind, raw_kind: &str, lines: &[String]) {
        if !kind.is_actionable() {
            return;
        }
        self.ctx.stats.actionable += 1;
        let code_lines: Vec<&str> = lines
            .iter()
            .map(|ln| ln.trim())
            .filter(|ln| !ln.is_empty() && !ln.starts_with('#'))
            .collect();
        if !code_lines.is_empty() {
            let all_trivial = code_lines
                .iter()
                .all(|ln| *ln == "pass" || *ln == "raise NotImplementedError");
            if all_trivial {
                self.ctx.stats.converted_trivial += 1;
            } else {
                self.ctx.stats.converted_ok += 1;
            }
            return;
        }
        if kind.comment_only_ok() && !lines.is_empty() {
            self.ctx.stats.converted_trivial += 1;
            return;
        }
        for line in lines {
            let s = line.trim_start();
            if s.starts_with("# Unhandled node type:")
                || s.starts_with("# expr:")
                || s.starts_with("# control:")
            {
                self.ctx.stats.fallback_lines += 1;
                self.ctx.stats.record_unhandled(raw_kind);
            }
        }
    }
}

/// Indent lines one level; blank lines stay empty so trailing whitespace is
/// never emitted.
pub(crate) fn indent_lines(lines: &[String]) -> Vec<String> {
    lines
        .iter()
        .map(|ln| {
            if ln.trim().is_empty() {
                String::new()
            } else {
                format!("    {ln}")
            }
        })
        .collect()
}

/// Indent a statement body; a body with no code lines (empty, or comments
/// only) gets a trailing `pass` so the suite stays syntactically valid.
pub(crate) fn indent_or_pass(lines: &[String]) -> Vec<String> {
    let has_code = lines
        .iter()
        .map(|ln| ln.trim())
        .any(|ln| !ln.is_empty() && !ln.starts_with('#'));
    let mut out = indent_lines(lines);
    if !has_code {
        out.push("    pass".to_string());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(json: &str) -> Node {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_unhandled_kind_single_diagnostic_line() {
        let mut generator = Generator::new();
        let lines = generator.convert_node(&node(r#"{"kind": "MysteryDecl"}"#));
        assert_eq!(lines, vec!["# Unhandled node type: MysteryDecl"]);
    }

    #[test]
    fn test_unhandled_kind_does_not_abort_siblings() {
        let mut generator = Generator::new();
        let lines = generator.convert_node(&node(
            r#"{"kind": "CompilationUnit", "children": [
                {"kind": "MysteryDecl"},
                {"kind": "BreakStmt"}
            ]}"#,
        ));
        assert_eq!(lines, vec!["# Unhandled node type: MysteryDecl", "break"]);
    }

    #[test]
    fn test_package_and_import_are_trivial_conversions() {
        let mut generator = Generator::new();
        generator.convert_node(&node(r#"{"kind": "PackageDeclaration", "name": "com.example"}"#));
        generator.convert_node(&node(r#"{"kind": "ImportDeclaration", "name": "java.util.List"}"#));
        assert_eq!(generator.context().stats.actionable, 2);
        assert_eq!(generator.context().stats.converted_trivial, 2);
        assert_eq!(generator.context().stats.converted_ok, 0);
    }

    #[test]
    fn test_variable_declarator_records_symbol_type() {
        let mut generator = Generator::new();
        let lines = generator.convert_node(&node(
            r#"{"kind": "VariableDeclarator", "name": "names",
                "value": "List<String>",
                "attrs": {"initializer": "new ArrayList<>()"}}"#,
        ));
        assert_eq!(lines, vec!["names = []"]);
        assert_eq!(generator.context().symtab.get("names").map(String::as_str), Some("List"));
    }

    #[test]
    fn test_literal_rendering() {
        let mut generator = Generator::new();
        assert_eq!(
            generator.convert_node(&node(r#"{"kind": "StringLiteralExpr", "name": "\"hi\""}"#)),
            vec!["\"hi\""]
        );
        assert_eq!(
            generator.convert_node(&node(r#"{"kind": "IntegerLiteralExpr", "name": "42"}"#)),
            vec!["42"]
        );
        assert_eq!(
            generator.convert_node(&node(r#"{"kind": "BooleanLiteralExpr", "name": "true"}"#)),
            vec!["True"]
        );
    }

    #[test]
    fn test_indent_or_pass() {
        assert_eq!(indent_or_pass(&[]), vec!["    pass"]);
        assert_eq!(
            indent_or_pass(&["x = 1".to_string(), String::new()]),
            vec!["    x = 1", ""]
        );
    }
}
