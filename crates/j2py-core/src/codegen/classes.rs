//! Declaration emitters for the four type shapes: enum, record, interface,
//! class.

use super::{indent_lines, Generator};
use crate::mappings::map_type;
use crate::node::{Node, TypeDeclKind};

const TYPE_DECL_KINDS: &[&str] = &[
    "ClassOrInterfaceDeclaration",
    "EnumDeclaration",
    "RecordDeclaration",
    "AnnotationDeclaration",
    "Class",
    "Interface",
];
const FIELD_KINDS: &[&str] = &["Field", "FieldDeclaration"];
const METHOD_KINDS: &[&str] = &["Method", "MethodDeclaration", "Function"];
const CTOR_KINDS: &[&str] = &["Constructor", "ConstructorDeclaration"];

impl Generator {
    pub(crate) fn generate_type_decl(&mut self, node: &Node, decl: TypeDeclKind) -> Vec<String> {
        match decl {
            TypeDeclKind::Enum => self.generate_enum(node),
            TypeDeclKind::Record => self.generate_record(node),
            TypeDeclKind::Interface => self.generate_interface(node),
            TypeDeclKind::ClassOrInterface => {
                let is_interface = node
                    .descriptor
                    .as_deref()
                    .map(|d| d.trim().eq_ignore_ascii_case("interface"))
                    .unwrap_or(false);
                if is_interface {
                    self.generate_interface(node)
                } else {
                    self.generate_class(node)
                }
            }
            // Annotation declarations carry no translatable behavior; render
            // the shell the same way a class renders.
            TypeDeclKind::Class | TypeDeclKind::Annotation => self.generate_class(node),
        }
    }

    /// Enum: one class with a scalar value per constant, in declaration
    /// order.
    fn generate_enum(&mut self, node: &Node) -> Vec<String> {
        self.ctx.require_import("import enum");
        let name = node.name_or("Enum");
        let mut lines = vec![format!("class {name}(enum.Enum):")];
        lines.extend(indent_lines(&docstring_lines(node)));
        let constants: Vec<&str> = node
            .children_of_kind(&["EnumConstantDeclaration", "EnumConstant"])
            .filter_map(|ch| ch.name.as_deref())
            .collect();
        if constants.is_empty() {
            lines.push("    pass".to_string());
        } else {
            for (ordinal, constant) in constants.iter().enumerate() {
                lines.push(format!("    {constant} = {ordinal}"));
            }
        }
        lines.push(String::new());
        lines
    }

    /// Record: a dataclass with one typed attribute per component,
    /// defaulting to `None`. Components come from the explicit component
    /// list when present, else from field declarations.
    fn generate_record(&mut self, node: &Node) -> Vec<String> {
        self.ctx.require_import("from dataclasses import dataclass");
        let name = node.name_or("Record");
        let mut lines = vec!["@dataclass".to_string(), format!("class {name}:")];
        lines.extend(indent_lines(&docstring_lines(node)));

        let mut attributes: Vec<(String, Option<String>)> = node
            .children_of_kind(&["Parameter", "RecordComponent", "Component"])
            .map(|p| {
                let p_type = p.attr("type").map(str::to_string).or(p.descriptor.clone());
                (p.name_or("field").to_string(), p_type)
            })
            .collect();
        if attributes.is_empty() {
            for field in node.children_of_kind(FIELD_KINDS) {
                let element_type = field.descriptor.clone();
                for var in field.children_of_kind(&["VariableDeclarator", "Variable"]) {
                    let v_type = var.descriptor.clone().or(element_type.clone());
                    attributes.push((var.name_or("field").to_string(), v_type));
                }
            }
        }

        if attributes.is_empty() {
            lines.push("    pass".to_string());
        } else {
            for (attr_name, attr_type) in attributes {
                let annotation = attr_type
                    .as_deref()
                    .and_then(map_type)
                    .unwrap_or_else(|| "object".to_string());
                lines.push(format!("    {attr_name}: {annotation} = None"));
            }
        }
        lines.push(String::new());
        lines
    }

    /// Interface: an abstract base with one raising stub per declared
    /// method.
    fn generate_interface(&mut self, node: &Node) -> Vec<String> {
        self.ctx.require_import("import abc");
        let name = node.name_or("Interface");
        let mut lines = vec![format!("class {name}(abc.ABC):")];
        lines.extend(indent_lines(&docstring_lines(node)));
        let methods: Vec<&Node> = node.children_of_kind(METHOD_KINDS).collect();
        if methods.is_empty() {
            lines.push("    pass".to_string());
        } else {
            for method in methods {
                let method_name = method.name_or("method");
                let params: Vec<&str> = method
                    .children_of_kind(&["Parameter"])
                    .filter_map(|p| p.name.as_deref())
                    .collect();
                let joined = if params.is_empty() {
                    String::new()
                } else {
                    format!(", {}", params.join(", "))
                };
                lines.push("    @abc.abstractmethod".to_string());
                lines.push(format!("    def {method_name}(self{joined}):"));
                lines.push("        raise NotImplementedError".to_string());
            }
        }
        lines.push(String::new());
        lines
    }

    fn generate_class(&mut self, node: &Node) -> Vec<String> {
        let name = node.name_or("Class").to_string();
        let nested_names: Vec<String> = node
            .children_of_kind(TYPE_DECL_KINDS)
            .filter_map(|ch| ch.name.clone())
            .collect();

        // Field accumulation is per class; stash the enclosing class's
        // pending state around the nested emission.
        let saved_pending = std::mem::take(&mut self.pending_fields);
        let saved_has_ctor = std::mem::replace(&mut self.class_has_ctor, false);

        let lines = self.with_class(&name, nested_names, |this| {
            let mut lines = vec![format!("class {name}:")];
            lines.extend(indent_lines(&docstring_lines(node)));

            for field in node.children_of_kind(FIELD_KINDS) {
                let field_lines = this.generate_field(field);
                lines.extend(indent_lines(&field_lines));
            }

            let constructors: Vec<&Node> = node.children_of_kind(CTOR_KINDS).collect();
            if !constructors.is_empty() {
                let ctor_lines = this.generate_constructors(&constructors);
                lines.extend(indent_lines(&ctor_lines));
            }

            for group in group_methods(node) {
                let method_lines = if group.len() > 1 {
                    this.generate_overloads(&group)
                } else {
                    this.generate_callable(group[0])
                };
                lines.extend(indent_lines(&method_lines));
            }

            if constructors.is_empty() {
                let init_lines = this.synthesize_init();
                if !init_lines.is_empty() {
                    lines.push(String::new());
                    lines.extend(indent_lines(&init_lines));
                }
            }

            for nested in node.children_of_kind(TYPE_DECL_KINDS) {
                let nested_lines = this.convert_node(nested);
                lines.push(String::new());
                lines.extend(indent_lines(&nested_lines));
            }

            let has_code = lines[1..]
                .iter()
                .map(|ln| ln.trim())
                .any(|ln| !ln.is_empty() && !ln.starts_with('#'));
            if !has_code {
                lines.push("    pass".to_string());
            }
            lines.push(String::new());
            lines
        });

        self.pending_fields = saved_pending;
        self.class_has_ctor = saved_has_ctor;
        lines
    }
}

/// Docstring from Javadoc children only, triple quotes escaped. Unindented;
/// the caller places it.
pub(crate) fn docstring_lines(node: &Node) -> Vec<String> {
    match node.javadoc() {
        Some(doc) => {
            let safe = doc.replace("\"\"\"", "\\\"\\\"\\\"");
            vec![format!("\"\"\"{safe}\"\"\"")]
        }
        None => Vec::new(),
    }
}

/// Group method declarations by (name, staticness) preserving declaration
/// order, so overloads unify per group.
fn group_methods(node: &Node) -> Vec<Vec<&Node>> {
    let mut order: Vec<(String, bool)> = Vec::new();
    let mut grouped: Vec<Vec<&Node>> = Vec::new();
    for method in node.children_of_kind(METHOD_KINDS) {
        let key = (
            method.name_or("<method>").to_string(),
            method.has_modifier("static"),
        );
        match order.iter().position(|k| *k == key) {
            Some(idx) => grouped[idx].push(method),
            None => {
                order.push(key);
                grouped.push(vec![method]);
            }
        }
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(json: &str) -> Node {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_enum_constants_get_declaration_order() {
        let mut generator = Generator::new();
        let lines = generator.convert_node(&node(
            r#"{"kind": "EnumDeclaration", "name": "Color", "children": [
                {"kind": "EnumConstant", "name": "RED"},
                {"kind": "EnumConstant", "name": "GREEN"},
                {"kind": "EnumConstant", "name": "BLUE"}
            ]}"#,
        ));
        assert_eq!(lines[0], "class Color(enum.Enum):");
        assert_eq!(lines[1], "    RED = 0");
        assert_eq!(lines[2], "    GREEN = 1");
        assert_eq!(lines[3], "    BLUE = 2");
        assert!(generator.context().required_imports.contains("import enum"));
    }

    #[test]
    fn test_record_components() {
        let mut generator = Generator::new();
        let lines = generator.convert_node(&node(
            r#"{"kind": "RecordDeclaration", "name": "Point", "children": [
                {"kind": "RecordComponent", "name": "x", "attrs": {"type": "int"}},
                {"kind": "RecordComponent", "name": "y", "attrs": {"type": "int"}}
            ]}"#,
        ));
        assert_eq!(lines[0], "@dataclass");
        assert_eq!(lines[1], "class Point:");
        assert_eq!(lines[2], "    x: int = None");
        assert_eq!(lines[3], "    y: int = None");
    }

    #[test]
    fn test_record_falls_back_to_field_declarations() {
        let mut generator = Generator::new();
        let lines = generator.convert_node(&node(
            r#"{"kind": "RecordDeclaration", "name": "Pair", "children": [
                {"kind": "FieldDeclaration", "value": "String", "children": [
                    {"kind": "VariableDeclarator", "name": "left"},
                    {"kind": "VariableDeclarator", "name": "right"}
                ]}
            ]}"#,
        ));
        assert!(lines.contains(&"    left: str = None".to_string()));
        assert!(lines.contains(&"    right: str = None".to_string()));
    }

    #[test]
    fn test_interface_abstract_stubs() {
        let mut generator = Generator::new();
        let lines = generator.convert_node(&node(
            r#"{"kind": "ClassOrInterfaceDeclaration", "name": "Shape",
                "value": "interface",
                "children": [
                    {"kind": "MethodDeclaration", "name": "area", "children": [
                        {"kind": "Parameter", "name": "scale"}
                    ]}
                ]}"#,
        ));
        assert_eq!(lines[0], "class Shape(abc.ABC):");
        assert_eq!(lines[1], "    @abc.abstractmethod");
        assert_eq!(lines[2], "    def area(self, scale):");
        assert_eq!(lines[3], "        raise NotImplementedError");
    }

    #[test]
    fn test_empty_class_gets_pass() {
        let mut generator = Generator::new();
        let lines = generator.convert_node(&node(r#"{"kind": "Class", "name": "Empty"}"#));
        assert_eq!(lines[0], "class Empty:");
        assert_eq!(lines[1], "    pass");
    }

    #[test]
    fn test_nested_class_reindented() {
        let mut generator = Generator::new();
        let lines = generator.convert_node(&node(
            r#"{"kind": "Class", "name": "Outer", "children": [
                {"kind": "Class", "name": "Inner"}
            ]}"#,
        ));
        assert!(lines.contains(&"    class Inner:".to_string()));
        assert!(lines.contains(&"        pass".to_string()));
    }
}
