//! Whole-output text passes run after generation: entry-point hoisting,
//! duplicate-line cleanup, and the `__main__` guard.

/// Run every post-generation pass in order.
pub fn postprocess(source: &str, hoist: bool) -> String {
    let mut text = remove_adjacent_duplicates(source);
    if hoist {
        text = hoist_entry_point(&text);
    }
    ensure_main_guard(&text)
}

/// Emitters occasionally produce the same line twice in a row when a
/// construct is reachable through two dispatch paths; collapse exact
/// adjacent duplicates of non-blank lines.
pub fn remove_adjacent_duplicates(source: &str) -> String {
    let mut out: Vec<&str> = Vec::new();
    for line in source.lines() {
        if !line.trim().is_empty() && out.last() == Some(&line) {
            continue;
        }
        out.push(line);
    }
    let mut joined = out.join("\n");
    if source.ends_with('\n') {
        joined.push('\n');
    }
    joined
}

/// Move a class-level `main` method to module level: Java entry points live
/// inside a class, Python ones do not. The method (with any decorators) is
/// removed from the class body, dedented one level, stripped of decorators,
/// rewritten from `self.` to `instance.` references, and appended as a
/// top-level `def main(args=None)`.
pub fn hoist_entry_point(source: &str) -> String {
    let lines: Vec<&str> = source.lines().collect();

    let def_idx = match lines.iter().position(|ln| {
        indent_of(ln) == 4 && ln.trim_start().starts_with("def main(")
    }) {
        Some(idx) => idx,
        None => return source.to_string(),
    };

    // Include decorator lines directly above.
    let mut block_start = def_idx;
    while block_start > 0
        && indent_of(lines[block_start - 1]) == 4
        && lines[block_start - 1].trim_start().starts_with('@')
    {
        block_start -= 1;
    }

    // The block runs through every following line that is blank or indented
    // deeper than the def itself.
    let mut block_end = def_idx + 1;
    while block_end < lines.len() {
        let ln = lines[block_end];
        if ln.trim().is_empty() || indent_of(ln) > 4 {
            block_end += 1;
        } else {
            break;
        }
    }
    while block_end > def_idx + 1 && lines[block_end - 1].trim().is_empty() {
        block_end -= 1;
    }

    let mut hoisted: Vec<String> = Vec::new();
    for ln in &lines[block_start..block_end] {
        let trimmed = ln.trim_start();
        if trimmed.starts_with('@') {
            continue;
        }
        if trimmed.starts_with("def main(") {
            hoisted.push(rewrite_main_signature(trimmed));
        } else if ln.trim().is_empty() {
            hoisted.push(String::new());
        } else {
            // Hoisted out of the class, instance references no longer have a
            // self to bind to.
            let dedented = ln.strip_prefix("    ").unwrap_or(ln);
            hoisted.push(dedented.replace("self.", "instance."));
        }
    }

    let mut out: Vec<String> = Vec::new();
    for (idx, ln) in lines.iter().enumerate() {
        if idx >= block_start && idx < block_end {
            continue;
        }
        out.push((*ln).to_string());
    }

    // If the enclosing class lost its only member, keep it syntactically
    // valid.
    if let Some(class_idx) = (0..block_start)
        .rev()
        .find(|&i| indent_of(lines[i]) == 0 && lines[i].trim_start().starts_with("class "))
    {
        let insert_at = out
            .iter()
            .position(|ln| ln.as_str() == lines[class_idx])
            .map(|i| i + 1);
        if let Some(insert_at) = insert_at {
            let mut has_member = false;
            for ln in out.iter().skip(insert_at) {
                if indent_of(ln) == 0 && !ln.trim().is_empty() {
                    break;
                }
                if !ln.trim().is_empty() {
                    has_member = true;
                    break;
                }
            }
            if !has_member {
                out.insert(insert_at, "    pass".to_string());
            }
        }
    }

    while out.last().is_some_and(|ln| ln.trim().is_empty()) {
        out.pop();
    }
    let mut result = out.join("\n");
    result.push_str("\n\n\n");
    result.push_str(&hoisted.join("\n"));
    while result.ends_with(['\n', ' ']) {
        result.pop();
    }
    result.push('\n');
    result
}

/// Append the standard entry guard unless one is already present. With a
/// top-level `main` the guard calls it; without one it is a `pass` stub, so
/// every emitted module carries the guard.
pub fn ensure_main_guard(source: &str) -> String {
    if source.contains("if __name__") {
        return source.to_string();
    }
    let has_main = source
        .lines()
        .any(|ln| indent_of(ln) == 0 && ln.starts_with("def main("));
    let body = if has_main { "main()" } else { "pass" };
    let mut out = source.trim_end().to_string();
    out.push_str(&format!("\n\n\nif __name__ == \"__main__\":\n    {body}\n"));
    out
}

fn indent_of(line: &str) -> usize {
    line.len() - line.trim_start().len()
}

// Normalize whatever parameter list main carried to the conventional
// optional argv.
fn rewrite_main_signature(_def_line: &str) -> String {
    "def main(args=None):".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn test_adjacent_duplicates_removed() {
        let src = "x = 1\nx = 1\ny = 2\n\n\nz = 3\n";
        assert_eq!(remove_adjacent_duplicates(src), "x = 1\ny = 2\n\n\nz = 3\n");
    }

    #[test]
    fn test_hoist_moves_main_to_module_level() {
        let src = indoc! {r#"
            class App:
                @staticmethod
                def main(args=None):
                    if args is None:
                        args = []
                    print("hi")

                def helper(self):
                    pass
        "#};
        let out = hoist_entry_point(src);
        assert!(out.contains("\ndef main(args=None):"));
        assert!(!out.contains("@staticmethod"));
        assert!(out.contains("    def helper(self):"));
        // Hoisted body dedented one level.
        assert!(out.contains("\n    print(\"hi\")"));
    }

    #[test]
    fn test_hoist_leaves_pass_in_emptied_class() {
        let src = indoc! {r#"
            class App:
                @staticmethod
                def main(args=None):
                    print("hi")
        "#};
        let out = hoist_entry_point(src);
        assert!(out.contains("class App:\n    pass"));
    }

    #[test]
    fn test_guard_appended_once() {
        let src = "def main(args=None):\n    pass\n";
        let out = ensure_main_guard(src);
        assert!(out.ends_with("if __name__ == \"__main__\":\n    main()\n"));
        let again = ensure_main_guard(&out);
        assert_eq!(out, again);
    }

    #[test]
    fn test_guard_stubbed_without_main() {
        let src = "class A:\n    pass\n";
        let out = ensure_main_guard(src);
        assert!(out.ends_with("if __name__ == \"__main__\":\n    pass\n"));
        assert_eq!(ensure_main_guard(&out), out);
    }

    #[test]
    fn test_hoist_rewrites_self_to_instance() {
        let src = indoc! {r#"
            class App:
                def main(args=None):
                    self.run(args)

                def run(self, args):
                    pass
        "#};
        let out = hoist_entry_point(src);
        assert!(out.contains("\n    instance.run(args)"));
        assert!(!out.contains("\n    self.run(args)"));
        // Members still inside the class keep their self.
        assert!(out.contains("    def run(self, args):"));
    }

    #[test]
    fn test_full_pipeline() {
        let src = indoc! {r#"
            class App:
                @staticmethod
                def main(args=None):
                    print("hi")
                    print("hi")
        "#};
        let out = postprocess(src, true);
        assert!(out.contains("def main(args=None):"));
        assert!(out.trim_end().ends_with("main()"));
        assert_eq!(out.matches("print(\"hi\")").count(), 1);
    }
}
