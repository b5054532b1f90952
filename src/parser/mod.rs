//! Low-level parsing infrastructure shared by the Newick reader.
//!
//! [ByteParser] does the byte-by-byte work (peeking, consuming, quote-aware
//! label parsing), [ParsingError] carries position and context for error
//! reporting, and [utils] handles label escaping.

pub mod byte_parser;
pub mod parsing_error;
pub mod utils;

pub use byte_parser::ByteParser;
pub use byte_parser::ConsumeMode;
pub use parsing_error::ParsingError;
pub use parsing_error::ParsingErrorKind;
