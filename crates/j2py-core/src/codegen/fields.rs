//! Field declaration emitter.
//!
//! Static fields become class attributes emitted in place. Instance fields
//! are accumulated on the generator and materialize later as `self.name`
//! assignments, either inside the class's translated constructor or in a
//! synthesized `__init__`.

use super::{Generator, PendingField};
use crate::context::FieldVisibility;
use crate::mappings::{map_type, short_base_type};
use crate::node::Node;

impl Generator {
    pub(crate) fn generate_field(&mut self, node: &Node) -> Vec<String> {
        let element_type = node
            .attr("type")
            .map(str::to_string)
            .or_else(|| node.descriptor.clone());
        let is_static = node.has_modifier("static");
        let visibility = field_visibility(node);

        let mut lines = Vec::new();
        for var in declarators(node) {
            let name = match var.name.as_deref() {
                Some(n) if !n.is_empty() => n.to_string(),
                _ => continue,
            };
            let declared = var
                .descriptor
                .clone()
                .or_else(|| element_type.clone());
            if let Some(base) = declared.as_deref().and_then(short_base_type) {
                self.ctx.symtab.insert(name.clone(), base.to_string());
            }
            let annotation = declared.as_deref().and_then(map_type);
            let initializer = var
                .attr("initializer")
                .or_else(|| var.attr("init"))
                .map(|init| self.rewrite_inline(init.trim()));

            if is_static {
                let value = initializer.unwrap_or_else(|| "None".to_string());
                match &annotation {
                    Some(ann) => lines.push(format!("{name}: {ann} = {value}")),
                    None => lines.push(format!("{name} = {value}")),
                }
            } else {
                self.ctx.add_field(&name, visibility);
                self.pending_fields.push(PendingField {
                    name,
                    annotation: annotation.clone(),
                    initializer,
                });
            }
        }
        lines
    }

    /// `__init__` synthesized from accumulated instance fields, in
    /// declaration order. Empty when the class had no instance fields.
    /// Drains the pending list either way.
    pub(crate) fn synthesize_init(&mut self) -> Vec<String> {
        let pending = std::mem::take(&mut self.pending_fields);
        if pending.is_empty() {
            return Vec::new();
        }
        let mut lines = vec!["def __init__(self):".to_string()];
        for field in pending {
            let value = field.initializer.unwrap_or_else(|| "None".to_string());
            lines.push(format!("    self.{} = {}", field.name, value));
        }
        lines
    }

    /// Field assignments injected at the top of a translated constructor
    /// body, before the constructor's own statements.
    pub(crate) fn pending_field_assignments(&mut self) -> Vec<String> {
        let pending = std::mem::take(&mut self.pending_fields);
        pending
            .into_iter()
            .map(|field| {
                let value = field.initializer.unwrap_or_else(|| "None".to_string());
                format!("self.{} = {}", field.name, value)
            })
            .collect()
    }
}

fn declarators(node: &Node) -> Vec<&Node> {
    let vars: Vec<&Node> = node
        .children_of_kind(&["VariableDeclarator", "Variable"])
        .collect();
    if vars.is_empty() {
        // Flat shape: the field node itself carries the name.
        vec![node]
    } else {
        vars
    }
}

fn field_visibility(node: &Node) -> FieldVisibility {
    if node.has_modifier("private") {
        FieldVisibility::Private
    } else if node.has_modifier("protected") {
        FieldVisibility::Protected
    } else if node.has_modifier("public") {
        FieldVisibility::Public
    } else if !node.modifiers().is_empty() {
        FieldVisibility::Package
    } else {
        FieldVisibility::Unknown
    }
}
