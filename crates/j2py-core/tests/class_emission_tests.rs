use j2py_core::codegen::Generator;
use j2py_core::node::Node;

fn convert(json: &str) -> Vec<String> {
    let node: Node = serde_json::from_str(json).expect("test input must be valid JSON");
    let mut generator = Generator::new();
    generator.convert_node(&node)
}

// ============================================================================
// Field handling and self-qualification
// ============================================================================

#[test]
fn test_instance_fields_synthesize_init_after_methods() {
    let lines = convert(
        r#"{"kind": "ClassOrInterfaceDeclaration", "name": "Counter", "children": [
            {"kind": "FieldDeclaration", "value": "int",
             "attrs": {"modifiers": "private"},
             "children": [{"kind": "VariableDeclarator", "name": "count",
                           "attrs": {"initializer": "0"}}]},
            {"kind": "MethodDeclaration", "name": "bump", "children": [
                {"kind": "ExpressionStmt", "attrs": {"code": "count++"}}
            ]}
        ]}"#,
    );
    let text = lines.join("\n");
    assert!(text.contains("class Counter:"));
    // The field reference inside the method is qualified.
    assert!(text.contains("        self.count += 1"));
    // No declared constructor, so one is synthesized from the fields.
    let init_pos = text.find("def __init__(self):").expect("synthesized init");
    let method_pos = text.find("def bump(self):").expect("method");
    assert!(init_pos > method_pos);
    assert!(text.contains("        self.count = 0"));
}

#[test]
fn test_field_shadowed_by_parameter_stays_bare() {
    let lines = convert(
        r#"{"kind": "ClassOrInterfaceDeclaration", "name": "Box", "children": [
            {"kind": "FieldDeclaration", "value": "int",
             "children": [{"kind": "VariableDeclarator", "name": "size"}]},
            {"kind": "MethodDeclaration", "name": "resize", "children": [
                {"kind": "Parameter", "name": "size"},
                {"kind": "ReturnStmt", "attrs": {"expression": "size + 1"}}
            ]}
        ]}"#,
    );
    let text = lines.join("\n");
    assert!(text.contains("        return size + 1"));
    assert!(!text.contains("return self.size + 1"));
}

#[test]
fn test_static_fields_emitted_in_place() {
    let lines = convert(
        r#"{"kind": "ClassOrInterfaceDeclaration", "name": "Config", "children": [
            {"kind": "FieldDeclaration", "value": "int",
             "attrs": {"modifiers": "public static final"},
             "children": [{"kind": "VariableDeclarator", "name": "MAX_RETRIES",
                           "attrs": {"initializer": "3"}}]}
        ]}"#,
    );
    assert_eq!(lines[0], "class Config:");
    assert_eq!(lines[1], "    MAX_RETRIES: int = 3");
}

#[test]
fn test_constructor_receives_field_assignments_first() {
    let lines = convert(
        r#"{"kind": "ClassOrInterfaceDeclaration", "name": "Point", "children": [
            {"kind": "FieldDeclaration", "value": "int",
             "children": [
                 {"kind": "VariableDeclarator", "name": "x"},
                 {"kind": "VariableDeclarator", "name": "y"}
             ]},
            {"kind": "ConstructorDeclaration", "name": "Point", "children": [
                {"kind": "Parameter", "name": "x"},
                {"kind": "Parameter", "name": "y"},
                {"kind": "ExpressionStmt", "attrs": {"code": "this.x = x"}},
                {"kind": "ExpressionStmt", "attrs": {"code": "this.y = y"}}
            ]}
        ]}"#,
    );
    let text = lines.join("\n");
    assert!(text.contains("    def __init__(self, x, y):"));
    let default_x = text.find("self.x = None").expect("field default");
    let assigned_x = text.find("self.x = x").expect("ctor assignment");
    assert!(default_x < assigned_x);
}

// ============================================================================
// Overload unification
// ============================================================================

#[test]
fn test_overloads_unify_with_presence_guards() {
    let lines = convert(
        r#"{"kind": "ClassOrInterfaceDeclaration", "name": "Log", "children": [
            {"kind": "MethodDeclaration", "name": "write", "children": [
                {"kind": "Parameter", "name": "msg"},
                {"kind": "Parameter", "name": "level"},
                {"kind": "ExpressionStmt", "attrs": {"code": "emit(msg, level)"}}
            ]},
            {"kind": "MethodDeclaration", "name": "write", "children": [
                {"kind": "Parameter", "name": "msg"},
                {"kind": "ExpressionStmt", "attrs": {"code": "emit(msg, 0)"}}
            ]}
        ]}"#,
    );
    let text = lines.join("\n");
    assert!(text.contains("    def write(self, msg=None, level=None):"));
    assert!(text.contains("        if msg is not None and level is not None:"));
    assert!(text.contains("        elif msg is not None:"));
    // Single def only.
    assert_eq!(text.matches("def write(").count(), 1);
}

#[test]
fn test_parameterless_overload_guarded_by_all_none() {
    let lines = convert(
        r#"{"kind": "ClassOrInterfaceDeclaration", "name": "T", "children": [
            {"kind": "MethodDeclaration", "name": "reset", "children": [
                {"kind": "Parameter", "name": "hard"},
                {"kind": "ExpressionStmt", "attrs": {"code": "clear(hard)"}}
            ]},
            {"kind": "MethodDeclaration", "name": "reset", "children": [
                {"kind": "ExpressionStmt", "attrs": {"code": "clear(False)"}}
            ]}
        ]}"#,
    );
    let text = lines.join("\n");
    assert!(text.contains("        if hard is not None:"));
    assert!(text.contains("        elif hard is None:"));
    assert!(text.contains("            clear(False)"));
}

#[test]
fn test_overloaded_constructors_collapse_to_one_init() {
    let lines = convert(
        r#"{"kind": "ClassOrInterfaceDeclaration", "name": "Buf", "children": [
            {"kind": "ConstructorDeclaration", "name": "Buf", "children": [
                {"kind": "Parameter", "name": "capacity"},
                {"kind": "ExpressionStmt", "attrs": {"code": "this.capacity = capacity"}}
            ]},
            {"kind": "ConstructorDeclaration", "name": "Buf", "children": [
                {"kind": "ExpressionStmt", "attrs": {"code": "this.capacity = 16"}}
            ]}
        ]}"#,
    );
    let text = lines.join("\n");
    assert_eq!(text.matches("def __init__(").count(), 1);
    assert!(text.contains("    def __init__(self, capacity=None):"));
    assert!(text.contains("        if capacity is not None:"));
    assert!(text.contains("        elif capacity is None:"));
}

// ============================================================================
// Declaration shapes
// ============================================================================

#[test]
fn test_enum_declaration() {
    let lines = convert(
        r#"{"kind": "EnumDeclaration", "name": "State", "children": [
            {"kind": "EnumConstant", "name": "IDLE"},
            {"kind": "EnumConstant", "name": "RUNNING"}
        ]}"#,
    );
    assert_eq!(lines[0], "class State(enum.Enum):");
    assert_eq!(lines[1], "    IDLE = 0");
    assert_eq!(lines[2], "    RUNNING = 1");
}

#[test]
fn test_record_declaration() {
    let lines = convert(
        r#"{"kind": "RecordDeclaration", "name": "Pair", "children": [
            {"kind": "RecordComponent", "name": "first", "attrs": {"type": "String"}},
            {"kind": "RecordComponent", "name": "second", "attrs": {"type": "int"}}
        ]}"#,
    );
    assert_eq!(lines[0], "@dataclass");
    assert_eq!(lines[1], "class Pair:");
    assert_eq!(lines[2], "    first: str = None");
    assert_eq!(lines[3], "    second: int = None");
}

#[test]
fn test_interface_declaration() {
    let lines = convert(
        r#"{"kind": "ClassOrInterfaceDeclaration", "name": "Walker",
            "value": "interface",
            "children": [
                {"kind": "MethodDeclaration", "name": "step"}
            ]}"#,
    );
    assert_eq!(lines[0], "class Walker(abc.ABC):");
    assert_eq!(lines[1], "    @abc.abstractmethod");
    assert_eq!(lines[2], "    def step(self):");
    assert_eq!(lines[3], "        raise NotImplementedError");
}

#[test]
fn test_nested_class_call_qualified_from_sibling_method() {
    let lines = convert(
        r#"{"kind": "ClassOrInterfaceDeclaration", "name": "Graph", "children": [
            {"kind": "MethodDeclaration", "name": "makeNode", "children": [
                {"kind": "ReturnStmt", "attrs": {"expression": "new Node(1)"}}
            ]},
            {"kind": "ClassOrInterfaceDeclaration", "name": "Node", "children": [
                {"kind": "FieldDeclaration", "value": "int",
                 "children": [{"kind": "VariableDeclarator", "name": "id"}]}
            ]}
        ]}"#,
    );
    let text = lines.join("\n");
    assert!(text.contains("        return Graph.Node(1)"));
    assert!(text.contains("    class Node:"));
}

#[test]
fn test_javadoc_becomes_docstring_and_is_not_duplicated() {
    let lines = convert(
        r#"{"kind": "ClassOrInterfaceDeclaration", "name": "Doc", "children": [
            {"kind": "Javadoc", "value": "Holds documentation."},
            {"kind": "MethodDeclaration", "name": "run", "children": [
                {"kind": "Javadoc", "value": "Runs it."},
                {"kind": "LineComment", "value": "* @param none"},
                {"kind": "ExpressionStmt", "attrs": {"code": "go()"}}
            ]}
        ]}"#,
    );
    let text = lines.join("\n");
    assert!(text.contains("    \"\"\"Holds documentation.\"\"\""));
    assert!(text.contains("        \"\"\"Runs it.\"\"\""));
    // Javadoc-style comment lines in the body are suppressed.
    assert!(!text.contains("@param"));
}
