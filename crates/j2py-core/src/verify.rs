//! Post-generation verification: parse the emitted Python and score it.
//!
//! The whole module is parsed once, then each top-level block (class, def,
//! decorator run, `__main__` guard) is parsed in isolation so one broken
//! block does not hide the health of the rest. The per-block pass rate is
//! the headline number in the appended report.

use rustpython_parser::{parse, Mode};
use serde::Serialize;
use tracing::debug;

/// Position-annotated syntax error. `line` locates the error in the whole
/// module, `block_line` within the parsed fragment; for the module-level
/// parse the two coincide.
#[derive(Debug, Clone, Serialize)]
pub struct SyntaxIssue {
    pub message: String,
    pub line: usize,
    pub block_line: usize,
    pub column: usize,
    /// The offending source line, when available.
    pub text: Option<String>,
}

/// One top-level block extracted from the generated module.
#[derive(Debug, Clone)]
pub struct Block {
    pub name: String,
    /// 1-based line where the block starts in the full module.
    pub start_line: usize,
    pub code: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BlockCheck {
    pub name: String,
    pub start_line: usize,
    pub ok: bool,
    pub error: Option<SyntaxIssue>,
}

/// The full verification result for one generated module.
#[derive(Debug, Clone, Serialize)]
pub struct VerificationReport {
    pub module_ok: bool,
    pub module_error: Option<SyntaxIssue>,
    pub blocks: Vec<BlockCheck>,
}

impl VerificationReport {
    pub fn blocks_total(&self) -> usize {
        self.blocks.len()
    }

    pub fn blocks_ok(&self) -> usize {
        self.blocks.iter().filter(|b| b.ok).count()
    }

    /// Fraction of blocks that parse. A module with no blocks scores on the
    /// module parse alone.
    pub fn parse_rate(&self) -> f64 {
        if self.blocks.is_empty() {
            return if self.module_ok { 1.0 } else { 0.0 };
        }
        self.blocks_ok() as f64 / self.blocks_total() as f64
    }
}

/// Parse the module and every top-level block. Pure: the source is never
/// modified, so running this twice yields identical reports.
pub fn syntax_check(source: &str) -> VerificationReport {
    let module_error = check_fragment(source, 0);
    let module_ok = module_error.is_none();
    if !module_ok {
        debug!(error = ?module_error, "generated module does not parse");
    }

    let blocks = extract_top_blocks(source)
        .into_iter()
        .map(|block| {
            let error = check_fragment(&block.code, block.start_line - 1);
            BlockCheck {
                ok: error.is_none(),
                name: block.name,
                start_line: block.start_line,
                error,
            }
        })
        .collect();

    VerificationReport {
        module_ok,
        module_error,
        blocks,
    }
}

/// Parse one fragment; errors carry line numbers offset into the full
/// module by `line_offset`.
fn check_fragment(code: &str, line_offset: usize) -> Option<SyntaxIssue> {
    match parse(code, Mode::Module, "<generated>") {
        Ok(_) => None,
        Err(err) => {
            let offset = usize::from(err.offset);
            let prefix = &code[..offset.min(code.len())];
            let local_line = prefix.matches('\n').count() + 1;
            let column = prefix
                .rfind('\n')
                .map(|nl| offset - nl - 1)
                .unwrap_or(offset)
                + 1;
            let text = code.lines().nth(local_line - 1).map(str::to_string);
            Some(SyntaxIssue {
                message: err.error.to_string(),
                line: line_offset + local_line,
                block_line: local_line,
                column,
                text,
            })
        }
    }
}

/// Split the module into top-level blocks: each `class`/`def` (with any
/// decorator run above it) and the `__main__` guard. Loose top-level
/// statements (imports, comments) are not blocks of their own.
pub fn extract_top_blocks(source: &str) -> Vec<Block> {
    let lines: Vec<&str> = source.lines().collect();
    let mut blocks = Vec::new();
    let mut i = 0;
    while i < lines.len() {
        let line = lines[i];
        let indent = line.len() - line.trim_start().len();
        if indent != 0 || line.trim().is_empty() {
            i += 1;
            continue;
        }
        let trimmed = line.trim_start();
        let is_header = trimmed.starts_with("class ")
            || trimmed.starts_with("def ")
            || trimmed.starts_with('@')
            || trimmed.starts_with("if __name__");
        if !is_header {
            i += 1;
            continue;
        }

        let start = i;
        // Swallow a decorator run plus its def/class header.
        while i < lines.len() && lines[i].trim_start().starts_with('@') {
            i += 1;
        }
        let name = lines
            .get(i)
            .map(|ln| block_name(ln.trim_start()))
            .unwrap_or_else(|| "<decorators>".to_string());
        i += 1;
        // Body: everything blank or indented.
        while i < lines.len() {
            let ln = lines[i];
            if ln.trim().is_empty() || ln.len() - ln.trim_start().len() > 0 {
                i += 1;
            } else {
                break;
            }
        }
        let mut end = i;
        while end > start + 1 && lines[end - 1].trim().is_empty() {
            end -= 1;
        }
        blocks.push(Block {
            name,
            start_line: start + 1,
            code: lines[start..end].join("\n"),
        });
    }
    blocks
}

fn block_name(header: &str) -> String {
    if header.starts_with("if __name__") {
        return "__main__".to_string();
    }
    let rest = header
        .strip_prefix("class ")
        .or_else(|| header.strip_prefix("def "))
        .unwrap_or(header);
    rest.chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect()
}
