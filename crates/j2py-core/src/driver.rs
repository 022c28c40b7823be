//! End-to-end conversion driver: tree in, Python text plus reports out.

use tracing::info;

use crate::codegen::postprocess::postprocess;
use crate::codegen::Generator;
use crate::config::ConverterOptions;
use crate::context::ConversionStats;
use crate::errors::ConversionError;
use crate::node::NodeDocument;
use crate::verify::{self, VerificationReport};

/// Everything one conversion run produces.
#[derive(Debug)]
pub struct ConversionOutcome {
    /// The generated Python module, report comment included when enabled.
    pub content: String,
    pub stats: ConversionStats,
    pub verification: VerificationReport,
    pub efficiency: f64,
}

/// Convert a parsed input document.
pub fn convert_document(doc: &NodeDocument, options: &ConverterOptions) -> ConversionOutcome {
    let mut generator = Generator::new();
    let mut lines = Vec::new();
    for root in doc.roots() {
        lines.extend(generator.convert_node(root));
    }
    let ctx = generator.into_context();

    let mut body = lines.join("\n");
    body.truncate(body.trim_end().len());
    body.push('\n');

    let mut text = String::new();
    if !ctx.required_imports.is_empty() {
        // BTreeSet iteration gives the sorted import prelude.
        for import in &ctx.required_imports {
            text.push_str(import);
            text.push('\n');
        }
        text.push('\n');
    }
    text.push_str(&body);

    let text = postprocess(&text, options.hoist_entry_point);
    let verification = verify::syntax_check(&text);
    let stats = ctx.stats;
    let efficiency = stats.efficiency();

    info!(
        efficiency = format!("{efficiency:.3}"),
        parse_rate = format!("{:.3}", verification.parse_rate()),
        blocks = verification.blocks_total(),
        "conversion finished"
    );

    let mut content = text;
    if options.append_report {
        content.push_str(&format_report(&stats, &verification, efficiency));
    }

    ConversionOutcome {
        content,
        stats,
        verification,
        efficiency,
    }
}

/// Convert a raw JSON document string.
pub fn convert_str(json: &str, options: &ConverterOptions) -> Result<ConversionOutcome, ConversionError> {
    let doc: NodeDocument = serde_json::from_str(json)?;
    Ok(convert_document(&doc, options))
}

/// The trailing report comment block: conversion efficiency, parse health,
/// and the top offenders among unhandled node kinds and unmapped methods.
fn format_report(
    stats: &ConversionStats,
    verification: &VerificationReport,
    efficiency: f64,
) -> String {
    let mut out = String::new();
    out.push_str("\n# --- conversion report ---\n");
    out.push_str(&format!("# efficiency: {efficiency:.3}\n"));
    out.push_str(&format!(
        "# python parse rate: {:.3} ({}/{})\n",
        verification.parse_rate(),
        verification.blocks_ok(),
        verification.blocks_total()
    ));
    if let Some(issue) = &verification.module_error {
        out.push_str(&format!(
            "# module syntax error: line {}: {}\n",
            issue.line, issue.message
        ));
    }
    for block in verification.blocks.iter().filter(|b| !b.ok) {
        if let Some(issue) = &block.error {
            out.push_str(&format!(
                "# failing block: {} (line {}, block line {}): {}\n",
                block.name, issue.line, issue.block_line, issue.message
            ));
        }
    }
    let unhandled = stats.top_unhandled(8);
    if !unhandled.is_empty() {
        out.push_str("# unhandled node kinds:\n");
        for (kind, count) in unhandled {
            out.push_str(&format!("#   {kind} x{count}\n"));
        }
    }
    let unmapped = stats.top_unmapped(8);
    if !unmapped.is_empty() {
        out.push_str("# unmapped methods:\n");
        for (method, count) in unmapped {
            out.push_str(&format!("#   {method} x{count}\n"));
        }
    }
    out
}
