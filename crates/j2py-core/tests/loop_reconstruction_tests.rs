use j2py_core::codegen::Generator;
use j2py_core::node::Node;

fn convert(json: &str) -> Vec<String> {
    let node: Node = serde_json::from_str(json).expect("test input must be valid JSON");
    let mut generator = Generator::new();
    generator.convert_node(&node)
}

// ============================================================================
// Canonical counted loops
// ============================================================================

#[test]
fn test_ascending_exclusive_loop() {
    let lines = convert(
        r#"{"kind": "ForStmt",
            "attrs": {"init": "int i = 0", "compare": "i < 10", "update": "i++"},
            "children": [{"kind": "BlockStmt", "children": [
                {"kind": "ExpressionStmt", "attrs": {"code": "sum += i"}}
            ]}]}"#,
    );
    assert_eq!(lines[0], "for i in range(10):");
    assert_eq!(lines[1], "    sum += i");
}

#[test]
fn test_ascending_inclusive_loop_widens_bound() {
    let lines = convert(
        r#"{"kind": "ForStmt",
            "attrs": {"init": "int i = 1", "compare": "i <= 5", "update": "i++"},
            "children": [{"kind": "BlockStmt"}]}"#,
    );
    assert_eq!(lines[0], "for i in range(1, (5) + 1):");
}

#[test]
fn test_descending_loop_gets_negative_step() {
    let lines = convert(
        r#"{"kind": "ForStmt",
            "attrs": {"init": "int i = n", "compare": "i > 0", "update": "i--"},
            "children": [{"kind": "BlockStmt"}]}"#,
    );
    assert_eq!(lines[0], "for i in range(n, 0, -1):");
}

#[test]
fn test_stepped_loop() {
    let lines = convert(
        r#"{"kind": "ForStmt",
            "attrs": {"init": "int i = 0", "compare": "i < 100", "update": "i += 10"},
            "children": [{"kind": "BlockStmt"}]}"#,
    );
    assert_eq!(lines[0], "for i in range(0, 100, 10):");
}

// ============================================================================
// Non-canonical loops fall back without losing the body
// ============================================================================

#[test]
fn test_pointer_chase_loop_keeps_body() {
    let lines = convert(
        r#"{"kind": "ForStmt",
            "attrs": {"init": "Node n = head", "compare": "n != null", "update": "n = n.next"},
            "children": [{"kind": "BlockStmt", "children": [
                {"kind": "ExpressionStmt", "attrs": {"code": "count++"}}
            ]}]}"#,
    );
    assert_eq!(lines[0], "# for(Node n = head; n != null; n = n.next)");
    assert_eq!(lines[1], "count += 1");
}

#[test]
fn test_wrong_variable_in_update_falls_back() {
    let lines = convert(
        r#"{"kind": "ForStmt",
            "attrs": {"init": "int i = 0", "compare": "i < 10", "update": "j++"},
            "children": [{"kind": "BlockStmt"}]}"#,
    );
    assert!(lines[0].starts_with("# for("));
}

// ============================================================================
// Other loop forms
// ============================================================================

#[test]
fn test_foreach_loop() {
    let lines = convert(
        r#"{"kind": "ForEachStmt",
            "attrs": {"var": "String name", "iterable": "names"},
            "children": [{"kind": "BlockStmt", "children": [
                {"kind": "ExpressionStmt", "attrs": {"code": "System.out.println(name)"}}
            ]}]}"#,
    );
    assert_eq!(lines[0], "for name in names:");
    assert_eq!(lines[1], "    print(name)");
}

#[test]
fn test_while_loop() {
    let lines = convert(
        r#"{"kind": "WhileStmt",
            "attrs": {"condition": "x > 0 && y > 0"},
            "children": [{"kind": "BlockStmt", "children": [
                {"kind": "ExpressionStmt", "attrs": {"code": "x--"}}
            ]}]}"#,
    );
    assert_eq!(lines[0], "while x > 0 and y > 0:");
    assert_eq!(lines[1], "    x -= 1");
}

#[test]
fn test_do_while_runs_body_before_test() {
    let lines = convert(
        r#"{"kind": "DoStmt",
            "attrs": {"condition": "queue.isEmpty()"},
            "children": [{"kind": "BlockStmt", "children": [
                {"kind": "ExpressionStmt", "attrs": {"code": "step()"}}
            ]}]}"#,
    );
    assert_eq!(lines[0], "while True:");
    assert_eq!(lines[1], "    step()");
    assert!(lines[2].starts_with("    if not ("));
    assert_eq!(lines[3], "        break");
}

#[test]
fn test_nested_loops_indent_once_per_level() {
    let lines = convert(
        r#"{"kind": "ForStmt",
            "attrs": {"init": "int i = 0", "compare": "i < 3", "update": "i++"},
            "children": [{"kind": "BlockStmt", "children": [
                {"kind": "ForStmt",
                 "attrs": {"init": "int j = 0", "compare": "j < 3", "update": "j++"},
                 "children": [{"kind": "BlockStmt", "children": [
                     {"kind": "ExpressionStmt", "attrs": {"code": "grid[i][j] = 0"}}
                 ]}]}
            ]}]}"#,
    );
    assert_eq!(lines[0], "for i in range(3):");
    assert_eq!(lines[1], "    for j in range(3):");
    assert_eq!(lines[2], "        grid[i][j] = 0");
}
