use anyhow::{Context as _, Result};
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use j2py_core::{convert_str, extract_top_blocks, ConverterOptions};

/// j2py - convert a Java AST dump (JSON) to Python source
#[derive(Parser, Debug, Clone)]
#[command(name = "j2py")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input JSON file (Java AST dump)
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Output Python file
    #[arg(short, long, value_name = "FILE", default_value = "converted.py")]
    output: PathBuf,

    /// Additionally write each top-level block to its own file
    #[arg(long)]
    split_blocks: bool,

    /// Directory for split blocks (default: "<output stem>_blocks")
    #[arg(long, value_name = "DIR")]
    split_dir: Option<PathBuf>,

    /// Keep the entry point inside its class instead of hoisting it
    #[arg(long)]
    no_hoist_main: bool,

    /// Do not append the conversion report comment
    #[arg(long)]
    no_report: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let options = ConverterOptions {
        hoist_entry_point: !cli.no_hoist_main,
        append_report: !cli.no_report,
    };

    let json = fs::read_to_string(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;
    let outcome = convert_str(&json, &options)
        .with_context(|| format!("failed to convert {}", cli.input.display()))?;

    fs::write(&cli.output, &outcome.content)
        .with_context(|| format!("failed to write {}", cli.output.display()))?;
    info!(
        output = %cli.output.display(),
        efficiency = format!("{:.3}", outcome.efficiency),
        parse_rate = format!("{:.3}", outcome.verification.parse_rate()),
        "wrote converted module"
    );

    if cli.split_blocks {
        let dir = cli
            .split_dir
            .clone()
            .unwrap_or_else(|| default_split_dir(&cli.output));
        write_blocks(&outcome.content, &dir)?;
    }

    if !outcome.verification.module_ok {
        if let Some(issue) = &outcome.verification.module_error {
            eprintln!(
                "warning: generated module has a syntax error at line {}: {}",
                issue.line, issue.message
            );
        }
    }
    Ok(())
}

fn default_split_dir(output: &Path) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "converted".to_string());
    output.with_file_name(format!("{stem}_blocks"))
}

/// One file per top-level block, numbered in module order.
fn write_blocks(content: &str, dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
    for (idx, block) in extract_top_blocks(content).iter().enumerate() {
        let safe = sanitize_name(&block.name);
        let path = dir.join(format!("{:02}_{safe}.py", idx + 1));
        debug!(path = %path.display(), "writing block");
        let mut code = block.code.clone();
        if !code.ends_with('\n') {
            code.push('\n');
        }
        fs::write(&path, code).with_context(|| format!("failed to write {}", path.display()))?;
    }
    Ok(())
}

fn sanitize_name(name: &str) -> String {
    let mut out = String::new();
    let mut last_was_sep = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            out.push(c);
            last_was_sep = false;
        } else if !last_was_sep {
            out.push('_');
            last_was_sep = true;
        }
    }
    let trimmed = out.trim_matches('_').to_string();
    if trimmed.is_empty() {
        "block".to_string()
    } else {
        trimmed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("__main__"), "main");
        assert_eq!(sanitize_name("My Class!"), "My_Class");
        assert_eq!(sanitize_name("***"), "block");
    }

    #[test]
    fn test_default_split_dir() {
        assert_eq!(
            default_split_dir(Path::new("out/converted.py")),
            PathBuf::from("out/converted_blocks")
        );
    }
}
