//! Newick format reading and writing.
//!
//! The parser accepts the standard Newick format with arbitrary arity,
//! internal node names, optional branch lengths, quoted labels, and bracket
//! comments. Node names are decoded into structured
//! [NodeLabel](crate::taxonomy::NodeLabel)s on the way in and encoded back
//! on the way out.
//!
//! # Quick API
//! ```
//! use taxmark::newick;
//!
//! let tree = newick::parse_str("((a:1,b:2)x:3,c:4);").unwrap();
//! assert_eq!(tree.num_leaves(), 3);
//! assert_eq!(newick::to_newick(&tree), "((a:1,b:2)x:3,c:4);");
//! ```

pub mod parser;
pub mod writer;

use std::fs::File;
use std::path::Path;

use crate::model::Tree;
use crate::parser::{ByteParser, ParsingError};

pub use parser::NewickParser;
pub use writer::to_newick;
pub use writer::write_newick_file;

/// Parses a single Newick tree from a string.
///
/// # Errors
/// Returns a [ParsingError] if the input is not valid Newick.
pub fn parse_str(input: &str) -> Result<Tree, ParsingError> {
    let mut byte_parser = ByteParser::from_str(input);
    NewickParser::new().parse(&mut byte_parser)
}

/// Parses a single Newick tree from a file.
///
/// # Arguments
/// * `path` - Path to a file containing one Newick tree
///
/// # Errors
/// Returns a [ParsingError] if the file cannot be read or the content is
/// not valid Newick.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Tree, ParsingError> {
    let bytes = std::fs::read(path)?;
    let mut byte_parser = ByteParser::from_bytes(&bytes);
    NewickParser::new().parse(&mut byte_parser)
}

/// Writes a single tree to a file in Newick format, followed by a newline.
///
/// # Errors
/// Returns an I/O error if writing fails.
pub fn write_file(file: File, tree: &Tree) -> std::io::Result<()> {
    write_newick_file(file, tree)
}
