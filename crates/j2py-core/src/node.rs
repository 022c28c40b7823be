//! Input tree data model.
//!
//! The upstream Java parser emits a JSON tree of generic nodes. Nodes are
//! read-only for the whole run; the generator never mutates or revisits one.
//! Both the `kind`/`secondaryDescriptor`/`attributes` spelling and the legacy
//! `type`/`value`/`attrs` spelling are accepted.

use rustc_hash::FxHashMap;
use serde::Deserialize;

/// One syntactic construct from the upstream parser.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Node {
    #[serde(default, alias = "type")]
    pub kind: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Declared type, modifier string, or similar secondary text.
    #[serde(default, alias = "value", alias = "secondaryDescriptor")]
    pub descriptor: Option<String>,
    /// Open bag of string fragments (loop init/condition/update, raw
    /// expression source, parameter type, ...).
    #[serde(default, alias = "attrs", alias = "attributes")]
    pub attributes: FxHashMap<String, String>,
    #[serde(default)]
    pub children: Vec<Node>,
}

/// Top-level input: a single tree or a list of trees.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NodeDocument {
    One(Node),
    Many(Vec<Node>),
}

impl NodeDocument {
    pub fn roots(&self) -> &[Node] {
        match self {
            NodeDocument::One(node) => std::slice::from_ref(node),
            NodeDocument::Many(nodes) => nodes,
        }
    }
}

impl Node {
    /// Look up an attribute by key.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Raw expression text carried by this node, wherever upstream put it.
    pub fn expr_text(&self) -> Option<&str> {
        self.attr("expr")
            .or_else(|| self.attr("code"))
            .or(self.name.as_deref())
            .or(self.descriptor.as_deref())
    }

    pub fn name_or(&self, default: &'static str) -> &str {
        self.name.as_deref().unwrap_or(default)
    }

    pub fn children_of_kind<'a>(&'a self, kinds: &'a [&str]) -> impl Iterator<Item = &'a Node> {
        self.children.iter().filter(move |ch| kinds.contains(&ch.kind.as_str()))
    }

    pub fn first_child_of_kind(&self, kinds: &[&str]) -> Option<&Node> {
        self.children.iter().find(|ch| kinds.contains(&ch.kind.as_str()))
    }

    /// Modifier tokens, lowercased. Tolerates `[public, static]` and
    /// `public static` spellings.
    pub fn modifiers(&self) -> Vec<String> {
        let raw = match self.attr("modifiers") {
            Some(raw) => raw,
            None => return Vec::new(),
        };
        raw.trim()
            .trim_matches(|c| c == '[' || c == ']')
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|tok| !tok.is_empty())
            .map(|tok| tok.to_ascii_lowercase())
            .collect()
    }

    pub fn has_modifier(&self, modifier: &str) -> bool {
        self.modifiers().iter().any(|m| m == modifier)
    }

    /// Javadoc text attached as child nodes, if any. Ordinary comments are
    /// excluded so they are not duplicated into docstrings.
    pub fn javadoc(&self) -> Option<String> {
        let parts: Vec<&str> = self
            .children
            .iter()
            .filter(|ch| ch.kind == "Javadoc")
            .filter_map(|ch| ch.descriptor.as_deref().or(ch.name.as_deref()))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join("\n"))
        }
    }
}

/// Statement category for the control-flow reshaper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StmtKind {
    If,
    For,
    ForEach,
    While,
    DoWhile,
    Try,
    Catch,
    Switch,
    SwitchExpr,
    Return,
    Break,
    Continue,
    Throw,
    ExprStmt,
    Block,
}

/// Declaration shape for the class emitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeDeclKind {
    /// `ClassOrInterfaceDeclaration`: class unless the descriptor says
    /// `interface`.
    ClassOrInterface,
    Class,
    Interface,
    Enum,
    Record,
    Annotation,
}

/// Closed classification of the open-ended kind strings the upstream parser
/// emits. Every dispatch site matches on this exhaustively; `Unknown` is the
/// explicit non-fatal fallback arm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Project,
    File,
    Package,
    Import,
    Javadoc,
    Comment,
    TypeDecl(TypeDeclKind),
    Field,
    Variable,
    Method,
    Constructor,
    Stmt(StmtKind),
    Literal,
    /// Routed to the expression engine, either by explicit kind or by the
    /// `...Expr`/`...Expression` suffix heuristic.
    Expression,
    Unknown,
}

impl NodeKind {
    pub fn classify(kind: &str) -> NodeKind {
        match kind {
            "Project" | "CompilationUnit" => NodeKind::Project,
            "File" => NodeKind::File,
            "Package" | "PackageDeclaration" => NodeKind::Package,
            "Import" | "ImportDeclaration" => NodeKind::Import,
            "Javadoc" => NodeKind::Javadoc,
            "LineComment" | "BlockComment" | "OrphanComment" => NodeKind::Comment,
            "ClassOrInterfaceDeclaration" => NodeKind::TypeDecl(TypeDeclKind::ClassOrInterface),
            "Class" => NodeKind::TypeDecl(TypeDeclKind::Class),
            "Interface" | "InterfaceDeclaration" => NodeKind::TypeDecl(TypeDeclKind::Interface),
            "Enum" | "EnumDeclaration" => NodeKind::TypeDecl(TypeDeclKind::Enum),
            "Record" | "RecordDeclaration" => NodeKind::TypeDecl(TypeDeclKind::Record),
            "AnnotationDeclaration" => NodeKind::TypeDecl(TypeDeclKind::Annotation),
            "Field" | "FieldDeclaration" => NodeKind::Field,
            "Variable" | "VariableDeclarator" => NodeKind::Variable,
            "Method" | "MethodDeclaration" | "Function" => NodeKind::Method,
            "Constructor" | "ConstructorDeclaration" => NodeKind::Constructor,
            "IfStmt" | "IfStatement" => NodeKind::Stmt(StmtKind::If),
            "ForStmt" | "ForStatement" => NodeKind::Stmt(StmtKind::For),
            "ForEachStmt" | "ForeachStmt" | "EnhancedFor" => NodeKind::Stmt(StmtKind::ForEach),
            "WhileStmt" | "WhileStatement" => NodeKind::Stmt(StmtKind::While),
            "DoStmt" | "DoWhileStatement" | "DoStatement" => NodeKind::Stmt(StmtKind::DoWhile),
            "TryStmt" | "TryStatement" => NodeKind::Stmt(StmtKind::Try),
            "CatchClause" => NodeKind::Stmt(StmtKind::Catch),
            "SwitchStmt" | "SwitchStatement" => NodeKind::Stmt(StmtKind::Switch),
            "SwitchExpr" => NodeKind::Stmt(StmtKind::SwitchExpr),
            "ReturnStmt" => NodeKind::Stmt(StmtKind::Return),
            "BreakStmt" => NodeKind::Stmt(StmtKind::Break),
            "ContinueStmt" => NodeKind::Stmt(StmtKind::Continue),
            "ThrowStmt" => NodeKind::Stmt(StmtKind::Throw),
            "ExpressionStmt" => NodeKind::Stmt(StmtKind::ExprStmt),
            "BlockStmt" => NodeKind::Stmt(StmtKind::Block),
            "Block" => NodeKind::Stmt(StmtKind::Block),
            "StringLiteralExpr" | "IntegerLiteralExpr" | "BooleanLiteralExpr" | "Constant" => {
                NodeKind::Literal
            }
            _ if kind == "Expression"
                || kind.ends_with("Expr")
                || kind.ends_with("Expression") =>
            {
                NodeKind::Expression
            }
            _ => NodeKind::Unknown,
        }
    }

    /// Kinds that count toward the conversion-efficiency denominator.
    /// Unknown kinds count too: an unhandled construct is a failed
    /// conversion, not a free pass.
    pub fn is_actionable(self) -> bool {
        matches!(
            self,
            NodeKind::TypeDecl(_)
                | NodeKind::Field
                | NodeKind::Variable
                | NodeKind::Method
                | NodeKind::Constructor
                | NodeKind::Stmt(_)
                | NodeKind::Package
                | NodeKind::Import
                | NodeKind::Unknown
        )
    }

    /// Kinds whose comment-only rendering is still a successful (trivial)
    /// conversion.
    pub fn comment_only_ok(self) -> bool {
        matches!(self, NodeKind::Package | NodeKind::Import)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node_from_json(json: &str) -> Node {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_legacy_field_spellings() {
        let node = node_from_json(
            r#"{"type": "Field", "name": "count", "value": "int",
                "attrs": {"modifiers": "[private, static]"}}"#,
        );
        assert_eq!(node.kind, "Field");
        assert_eq!(node.descriptor.as_deref(), Some("int"));
        assert!(node.has_modifier("static"));
        assert!(node.has_modifier("private"));
        assert!(!node.has_modifier("public"));
    }

    #[test]
    fn test_canonical_field_spellings() {
        let node = node_from_json(
            r#"{"kind": "Method", "name": "run",
                "secondaryDescriptor": "void",
                "attributes": {"modifiers": "public static"}}"#,
        );
        assert_eq!(NodeKind::classify(&node.kind), NodeKind::Method);
        assert!(node.has_modifier("static"));
    }

    #[test]
    fn test_missing_fields_tolerated() {
        let node = node_from_json(r#"{"kind": "BreakStmt"}"#);
        assert!(node.name.is_none());
        assert!(node.children.is_empty());
        assert!(node.attributes.is_empty());
    }

    #[test]
    fn test_expression_suffix_heuristic() {
        assert_eq!(NodeKind::classify("MethodCallExpr"), NodeKind::Expression);
        assert_eq!(NodeKind::classify("WeirdExpression"), NodeKind::Expression);
        assert_eq!(NodeKind::classify("Expression"), NodeKind::Expression);
        assert_eq!(NodeKind::classify("TotallyNovel"), NodeKind::Unknown);
    }

    #[test]
    fn test_literal_kinds_not_expression() {
        // Literal kinds end in Expr but have a dedicated emitter.
        assert_eq!(NodeKind::classify("StringLiteralExpr"), NodeKind::Literal);
        assert_eq!(NodeKind::classify("IntegerLiteralExpr"), NodeKind::Literal);
    }

    #[test]
    fn test_document_accepts_list_of_trees() {
        let doc: NodeDocument =
            serde_json::from_str(r#"[{"kind": "File", "name": "A.java"}, {"kind": "File"}]"#)
                .unwrap();
        assert_eq!(doc.roots().len(), 2);
    }

    #[test]
    fn test_javadoc_excludes_plain_comments() {
        let node = node_from_json(
            r#"{"kind": "Class", "name": "A", "children": [
                {"kind": "Javadoc", "value": "Does things."},
                {"kind": "LineComment", "value": "not a docstring"}
            ]}"#,
        );
        assert_eq!(node.javadoc().as_deref(), Some("Does things."));
    }
}
