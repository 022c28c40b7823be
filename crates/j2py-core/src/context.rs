//! Shared conversion state for one run.
//!
//! A single `Context` is constructed per run, threaded by reference through
//! every emitter, and discarded at the end. Scope and class frames are only
//! reachable through the closure-scoped helpers so push/pop pairing holds on
//! every exit path.

use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::BTreeSet;

/// Visibility recorded for instance fields of the class being emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldVisibility {
    Public,
    Protected,
    Private,
    Package,
    Unknown,
}

#[derive(Debug, Clone)]
struct ClassFrame {
    name: String,
    nested_types: FxHashSet<String>,
    // Field state of the enclosing class, restored on pop.
    saved_fields: FxHashSet<String>,
    saved_field_info: FxHashMap<String, FieldVisibility>,
}

/// Conversion counters feeding the efficiency score and the appended report.
#[derive(Debug, Clone, Default)]
pub struct ConversionStats {
    pub actionable: usize,
    pub converted_ok: usize,
    pub converted_trivial: usize,
    pub fallback_lines: usize,
    pub unhandled_by_kind: IndexMap<String, usize>,
    pub unmapped_methods: IndexMap<String, usize>,
}

impl ConversionStats {
    pub fn record_unhandled(&mut self, kind: &str) {
        *self.unhandled_by_kind.entry(kind.to_string()).or_insert(0) += 1;
    }

    pub fn record_unmapped(&mut self, owner_type: &str, method: &str) {
        let key = format!("{owner_type}.{method}");
        *self.unmapped_methods.entry(key).or_insert(0) += 1;
    }

    /// `(ok + 0.25 * trivial) / actionable`, with a floor of one on the
    /// denominator so an empty input scores zero rather than dividing by
    /// zero.
    pub fn efficiency(&self) -> f64 {
        let actionable = self.actionable.max(1) as f64;
        (self.converted_ok as f64 + 0.25 * self.converted_trivial as f64) / actionable
    }

    pub fn top_unhandled(&self, limit: usize) -> Vec<(&str, usize)> {
        Self::top_of(&self.unhandled_by_kind, limit)
    }

    pub fn top_unmapped(&self, limit: usize) -> Vec<(&str, usize)> {
        Self::top_of(&self.unmapped_methods, limit)
    }

    fn top_of(map: &IndexMap<String, usize>, limit: usize) -> Vec<(&str, usize)> {
        let mut entries: Vec<(&str, usize)> =
            map.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        // Stable sort keeps insertion order among equal counts.
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries.truncate(limit);
        entries
    }
}

/// Mutable state shared by every emitter for the duration of one run.
#[derive(Debug, Default)]
pub struct Context {
    /// Variable/field name -> coarse declared Java type. Run-wide and
    /// monotonic: entries are never removed, and deliberately not re-scoped
    /// per class.
    pub symtab: FxHashMap<String, String>,
    scope_stack: Vec<FxHashSet<String>>,
    field_names: FxHashSet<String>,
    field_info: FxHashMap<String, FieldVisibility>,
    class_stack: Vec<ClassFrame>,
    /// Reserved-word parameter renames, original -> alias.
    pub param_alias: FxHashMap<String, String>,
    /// Python import lines demanded by translations, prepended sorted.
    pub required_imports: BTreeSet<&'static str>,
    /// Priority-queue variable -> synthesized comparator key function name.
    pub pq_keys: FxHashMap<String, String>,
    /// While > 0, Javadoc-style comment lines inside bodies are dropped so
    /// they do not duplicate an emitted docstring.
    pub doc_comment_suppression: u32,
    pub stats: ConversionStats,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `body` with a fresh lexical scope holding `names`. The scope is
    /// popped when `body` returns, on every path.
    pub fn with_scope<R>(
        &mut self,
        names: impl IntoIterator<Item = String>,
        body: impl FnOnce(&mut Self) -> R,
    ) -> R {
        self.push_scope(names);
        let result = body(self);
        self.pop_scope();
        result
    }

    /// Run `body` with `name` pushed as the current class, its nested type
    /// names registered, and fresh per-class field tracking. The previous
    /// class's field state is restored on exit.
    pub fn with_class<R>(
        &mut self,
        name: &str,
        nested_types: impl IntoIterator<Item = String>,
        body: impl FnOnce(&mut Self) -> R,
    ) -> R {
        self.push_class(name, nested_types);
        let result = body(self);
        self.pop_class();
        result
    }

    // Raw stack operations. Only the scoped wrappers above (and the
    // generator's equivalents) may call these, so pairing holds on every
    // exit path.
    pub(crate) fn push_scope(&mut self, names: impl IntoIterator<Item = String>) {
        self.scope_stack.push(names.into_iter().collect());
    }

    pub(crate) fn pop_scope(&mut self) {
        self.scope_stack.pop();
    }

    pub(crate) fn push_class(&mut self, name: &str, nested_types: impl IntoIterator<Item = String>) {
        let frame = ClassFrame {
            name: name.to_string(),
            nested_types: nested_types.into_iter().collect(),
            saved_fields: std::mem::take(&mut self.field_names),
            saved_field_info: std::mem::take(&mut self.field_info),
        };
        self.class_stack.push(frame);
    }

    pub(crate) fn pop_class(&mut self) {
        if let Some(frame) = self.class_stack.pop() {
            self.field_names = frame.saved_fields;
            self.field_info = frame.saved_field_info;
        }
    }

    pub fn add_local(&mut self, name: &str) {
        if name.is_empty() {
            return;
        }
        if let Some(scope) = self.scope_stack.last_mut() {
            scope.insert(name.to_string());
        }
    }

    /// A name is local if any active scope frame declares it.
    pub fn is_local(&self, name: &str) -> bool {
        !name.is_empty() && self.scope_stack.iter().rev().any(|s| s.contains(name))
    }

    pub fn add_field(&mut self, name: &str, visibility: FieldVisibility) {
        if name.is_empty() {
            return;
        }
        self.field_names.insert(name.to_string());
        self.field_info.entry(name.to_string()).or_insert(visibility);
    }

    /// True when `name` is a tracked instance field of the current class and
    /// is not shadowed by a parameter or local.
    pub fn is_field_ref(&self, name: &str) -> bool {
        !name.is_empty() && self.field_names.contains(name) && !self.is_local(name)
    }

    pub fn has_fields(&self) -> bool {
        !self.field_names.is_empty()
    }

    /// Qualify a bare call to a type nested inside an enclosing class:
    /// innermost enclosing match wins.
    pub fn enclosing_class_for_nested(&self, type_name: &str) -> Option<&str> {
        self.class_stack
            .iter()
            .rev()
            .find(|frame| frame.nested_types.contains(type_name))
            .map(|frame| frame.name.as_str())
    }

    pub fn in_class(&self) -> bool {
        !self.class_stack.is_empty()
    }

    pub fn require_import(&mut self, line: &'static str) {
        self.required_imports.insert(line);
    }
}
