pub mod codegen;
pub mod config;
pub mod context;
pub mod driver;
pub mod errors;
pub mod mappings;
pub mod node;
pub mod verify;

pub use codegen::Generator;
pub use config::ConverterOptions;
pub use context::{Context, ConversionStats, FieldVisibility};
pub use driver::{convert_document, convert_str, ConversionOutcome};
pub use errors::ConversionError;
pub use node::{Node, NodeDocument, NodeKind, StmtKind, TypeDeclKind};
pub use verify::{extract_top_blocks, syntax_check, Block, BlockCheck, SyntaxIssue, VerificationReport};
