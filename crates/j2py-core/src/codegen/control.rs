//! Control-flow reshaping.
//!
//! Python has no three-clause `for`, no `do/while`, and no `switch`, so
//! these constructs are rebuilt rather than transliterated: counted loops
//! become `range()` calls when the clauses match the canonical shape,
//! `do/while` becomes `while True` with an inverted break, and `switch`
//! degrades to a commented selector over its translated body. A loop whose
//! clauses resist reconstruction keeps its body and leaves the header as a
//! visible comment instead of guessing.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

use super::{indent_or_pass, Generator};
use crate::mappings::map_exception;
use crate::node::{Node, StmtKind};

static INIT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[\w<>\[\],.\s]+\s+)?([A-Za-z_][A-Za-z0-9_]*)\s*=\s*(.+)$").unwrap()
});
static NEW_EXCEPTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^new\s+([A-Za-z0-9_$.<>]+)\s*\((.*)\)\s*$").unwrap());
static CATCH_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([A-Za-z0-9_$.]+)\s+([A-Za-z_][A-Za-z0-9_]*)\s*$").unwrap());

const BLOCK_KINDS: &[&str] = &["BlockStmt", "Block"];

impl Generator {
    pub(crate) fn generate_statement(&mut self, node: &Node, stmt: StmtKind) -> Vec<String> {
        match stmt {
            StmtKind::Block => self.convert_children(node),
            StmtKind::If => self.generate_if(node),
            StmtKind::For => self.generate_for(node),
            StmtKind::ForEach => self.generate_foreach(node),
            StmtKind::While => self.generate_while(node),
            StmtKind::DoWhile => self.generate_do_while(node),
            StmtKind::Try => self.generate_try(node),
            StmtKind::Catch => self.generate_catch(node),
            StmtKind::Switch => self.generate_switch(node),
            StmtKind::SwitchExpr => vec!["# switch-expr".to_string()],
            StmtKind::Return => self.generate_return(node),
            StmtKind::Break => vec!["break".to_string()],
            StmtKind::Continue => vec!["continue".to_string()],
            StmtKind::Throw => self.generate_throw(node),
            StmtKind::ExprStmt => self.generate_expr_stmt(node),
        }
    }

    fn generate_if(&mut self, node: &Node) -> Vec<String> {
        let condition = node
            .attr("condition")
            .map(|c| self.rewrite_inline(c))
            .unwrap_or_else(|| "True".to_string());

        let branches: Vec<&Node> = node
            .children
            .iter()
            .filter(|ch| !matches!(ch.kind.as_str(), "Javadoc"))
            .collect();
        let then_branch = branches.first().copied();
        let else_branch = branches.get(1).copied();

        let mut lines = vec![format!("if {condition}:")];
        let then_lines = match then_branch {
            Some(branch) => self.convert_node(branch),
            None => Vec::new(),
        };
        lines.extend(indent_or_pass(&then_lines));
        if let Some(branch) = else_branch {
            // else-if chains arrive as a nested IfStmt in the else slot.
            let else_lines = self.convert_node(branch);
            if branch.kind.starts_with("If") {
                if let Some(first) = else_lines.first() {
                    lines.push(format!("el{first}"));
                    lines.extend(else_lines[1..].iter().cloned());
                }
            } else {
                lines.push("else:".to_string());
                lines.extend(indent_or_pass(&else_lines));
            }
        }
        lines
    }

    /// Rebuild a three-clause `for` as `range()` when the clauses are the
    /// canonical counted shape. Anything else keeps the body and leaves the
    /// header as a comment.
    fn generate_for(&mut self, node: &Node) -> Vec<String> {
        let init = node.attr("init").unwrap_or("").trim().to_string();
        let compare = node
            .attr("compare")
            .or_else(|| node.attr("condition"))
            .unwrap_or("")
            .trim()
            .to_string();
        let update = node.attr("update").unwrap_or("").trim().to_string();

        let body = self.for_body(node);

        if let Some(header) = self.reconstruct_range(&init, &compare, &update) {
            let mut lines = vec![header];
            lines.extend(indent_or_pass(&body));
            return lines;
        }

        trace!(%init, %compare, %update, "for clauses not in canonical shape");
        let mut lines = vec![format!("# for({init}; {compare}; {update})")];
        lines.extend(body);
        lines
    }

    fn reconstruct_range(&mut self, init: &str, compare: &str, update: &str) -> Option<String> {
        // A comparison already using `in` is not a counted loop.
        if compare.contains(" in ") {
            return None;
        }
        let caps = INIT_RE.captures(init)?;
        let var = caps.get(1)?.as_str().to_string();
        let start = caps.get(2)?.as_str().trim().to_string();

        // Two-char operators checked first.
        let (op, rest) = if let Some(idx) = compare.find("<=") {
            ("<=", (&compare[..idx], &compare[idx + 2..]))
        } else if let Some(idx) = compare.find(">=") {
            (">=", (&compare[..idx], &compare[idx + 2..]))
        } else if let Some(idx) = compare.find('<') {
            ("<", (&compare[..idx], &compare[idx + 1..]))
        } else if let Some(idx) = compare.find('>') {
            (">", (&compare[..idx], &compare[idx + 1..]))
        } else {
            return None;
        };
        if rest.0.trim() != var {
            return None;
        }
        let limit = self.qualify_field_refs(rest.1.trim());

        let step = parse_step(&var, update)?;
        let descending = step.starts_with('-');
        let end = match (op, descending) {
            ("<", false) => limit,
            ("<=", false) => format!("({limit}) + 1"),
            (">", true) => limit,
            (">=", true) => format!("({limit}) - 1"),
            _ => return None,
        };

        self.ctx.add_local(&var);
        let header = if step == "1" {
            if start == "0" {
                format!("for {var} in range({end}):")
            } else {
                format!("for {var} in range({start}, {end}):")
            }
        } else {
            format!("for {var} in range({start}, {end}, {step}):")
        };
        Some(header)
    }

    /// The loop body is the last child; earlier children are clause nodes
    /// some parsers emit alongside the attribute strings.
    fn for_body(&mut self, node: &Node) -> Vec<String> {
        match node.children.last() {
            Some(body) => self.convert_node(body),
            None => Vec::new(),
        }
    }

    fn generate_foreach(&mut self, node: &Node) -> Vec<String> {
        // The variable attribute may carry the declared type too; the name
        // is the last token.
        let var = node
            .attr("var")
            .and_then(|v| v.split_whitespace().last())
            .unwrap_or("item")
            .to_string();
        let iterable = node
            .attr("iterable")
            .map(|it| self.rewrite_inline(it))
            .unwrap_or_else(|| "[]".to_string());
        self.ctx.add_local(&var);
        let body = self.for_body(node);
        let mut lines = vec![format!("for {var} in {iterable}:")];
        lines.extend(indent_or_pass(&body));
        lines
    }

    fn generate_while(&mut self, node: &Node) -> Vec<String> {
        let condition = node
            .attr("condition")
            .map(|c| self.rewrite_inline(c))
            .unwrap_or_else(|| "True".to_string());
        let body = self.for_body(node);
        let mut lines = vec![format!("while {condition}:")];
        lines.extend(indent_or_pass(&body));
        lines
    }

    /// `do { body } while (cond)` has no Python counterpart; the body runs
    /// once before the test, so the test moves to an inverted break at the
    /// bottom of a `while True`.
    fn generate_do_while(&mut self, node: &Node) -> Vec<String> {
        let condition = node
            .attr("condition")
            .map(|c| self.rewrite_inline(c))
            .unwrap_or_else(|| "True".to_string());
        let body = self.for_body(node);
        let mut lines = vec!["while True:".to_string()];
        lines.extend(indent_or_pass(&body));
        lines.push(format!("    if not ({condition}):"));
        lines.push("        break".to_string());
        lines
    }

    fn generate_try(&mut self, node: &Node) -> Vec<String> {
        let blocks: Vec<&Node> = node.children_of_kind(BLOCK_KINDS).collect();
        let catches: Vec<&Node> = node.children_of_kind(&["CatchClause"]).collect();

        let mut lines = vec!["try:".to_string()];
        let body = match blocks.first() {
            Some(block) => self.convert_node(block),
            None => Vec::new(),
        };
        lines.extend(indent_or_pass(&body));

        for catch in &catches {
            lines.extend(self.generate_catch(catch));
        }

        // Second block child is the finally block; try/finally without
        // except is legal Python, so no handler is synthesized.
        if let Some(finally_block) = blocks.get(1) {
            let finally_lines = self.convert_node(finally_block);
            lines.push("finally:".to_string());
            lines.extend(indent_or_pass(&finally_lines));
        }
        lines
    }

    fn generate_catch(&mut self, node: &Node) -> Vec<String> {
        let (java_type, binding) = catch_parameter(node);
        let py_type = map_exception(&java_type);
        let body = match node.first_child_of_kind(BLOCK_KINDS) {
            Some(block) => self.with_scope(vec![binding.clone()], |this| this.convert_node(block)),
            None => Vec::new(),
        };
        let mut lines = vec![format!("except {py_type} as {binding}:")];
        lines.extend(indent_or_pass(&body));
        lines
    }

    /// `switch` keeps its translated body under a commented selector; case
    /// dispatch is left to the reader rather than mistranslated.
    fn generate_switch(&mut self, node: &Node) -> Vec<String> {
        let selector = node.attr("selector").or_else(|| node.expr_text()).unwrap_or("");
        let mut lines = vec![format!("# switch {}", selector.trim())];
        lines.extend(self.convert_children(node));
        lines
    }

    fn generate_return(&mut self, node: &Node) -> Vec<String> {
        let expr = node
            .attr("expression")
            .or_else(|| node.expr_text())
            .map(str::trim)
            .filter(|s| !s.is_empty());
        match expr {
            Some(e) => vec![format!("return {}", self.rewrite_inline(e))],
            None => vec!["return".to_string()],
        }
    }

    fn generate_throw(&mut self, node: &Node) -> Vec<String> {
        let expr = node
            .attr("expression")
            .or_else(|| node.expr_text())
            .unwrap_or("")
            .trim()
            .to_string();
        if let Some(caps) = NEW_EXCEPTION_RE.captures(&expr) {
            let class = caps
                .get(1)
                .map(|m| m.as_str())
                .unwrap_or("")
                .rsplit('.')
                .next()
                .unwrap_or("");
            let py_type = map_exception(class);
            let args = self.rewrite_inline(caps.get(2).map(|m| m.as_str()).unwrap_or(""));
            return vec![format!("raise {py_type}({args})")];
        }
        if expr.is_empty() {
            vec!["raise".to_string()]
        } else {
            vec![format!("raise {}", self.rewrite_inline(&expr))]
        }
    }

    fn generate_expr_stmt(&mut self, node: &Node) -> Vec<String> {
        let text = node
            .attr("code")
            .or_else(|| node.attr("expression"))
            .or_else(|| node.expr_text());
        match text {
            Some(s) if !s.trim().is_empty() => self.convert_expression_text(s.trim()),
            _ => self.convert_children(node),
        }
    }
}

/// Step operand from the canonical update clause shapes; any expression is
/// accepted as the operand, with a decrement rendered as its negation.
/// `None` means the clause is not one of the shapes.
fn parse_step(var: &str, update: &str) -> Option<String> {
    let compact: String = update.chars().filter(|c| !c.is_whitespace()).collect();
    if compact == format!("{var}++") || compact == format!("++{var}") {
        return Some("1".to_string());
    }
    if compact == format!("{var}--") || compact == format!("--{var}") {
        return Some("-1".to_string());
    }
    let forward = |rest: &str| (!rest.is_empty()).then(|| rest.to_string());
    let backward = |rest: &str| (!rest.is_empty()).then(|| format!("-{rest}"));
    if let Some(rest) = compact.strip_prefix(&format!("{var}+=")) {
        return forward(rest);
    }
    if let Some(rest) = compact.strip_prefix(&format!("{var}-=")) {
        return backward(rest);
    }
    if let Some(rest) = compact.strip_prefix(&format!("{var}={var}+")) {
        return forward(rest);
    }
    if let Some(rest) = compact.strip_prefix(&format!("{var}={var}-")) {
        return backward(rest);
    }
    None
}

/// Exception type and binding name of a catch clause. Tolerates the
/// attribute spelling and the `Type name` descriptor spelling.
fn catch_parameter(node: &Node) -> (String, String) {
    if let Some(p_type) = node.attr("paramType") {
        let binding = node.attr("paramName").unwrap_or("ex").to_string();
        let short = p_type.rsplit('.').next().unwrap_or(p_type).to_string();
        return (short, binding);
    }
    let raw = node
        .name
        .as_deref()
        .or(node.descriptor.as_deref())
        .unwrap_or("");
    if let Some(caps) = CATCH_NAME_RE.captures(raw) {
        let full = caps.get(1).map(|m| m.as_str()).unwrap_or("");
        let short = full.rsplit('.').next().unwrap_or(full).to_string();
        let binding = caps.get(2).map(|m| m.as_str()).unwrap_or("ex").to_string();
        return (short, binding);
    }
    (raw.trim().to_string(), "ex".to_string())
}
