//! Error types for Newick parsing.
//!
//! This module provides [ParsingError] and [ParsingErrorKind] for
//! representing and reporting errors that occur during parsing of
//! phylogenetic tree files.

use std::fmt;

use thiserror::Error;

use crate::parser::byte_parser::ByteParser;

/// Default length of context provided by error from parser
const DEFAULT_CONTEXT_LENGTH: usize = 50;

// =#========================================================================#=
// PARSING ERROR KIND
// =#========================================================================#=
/// Error kinds that can occur during Newick parsing.
#[derive(PartialEq, Debug, Clone, Error)]
pub enum ParsingErrorKind {
    #[error("IO error - {0}")]
    Io(String),
    #[error("Unexpected end of input")]
    UnexpectedEof,
    #[error("Unclosed comment")]
    UnclosedComment,
    #[error("Invalid newick string: {0}")]
    InvalidNewickString(String),
    #[error("Invalid branch length: {0}")]
    InvalidBranchLength(String),
    #[error("Invalid rank token in node name: {0}")]
    InvalidRankToken(String),
}

// =#========================================================================#=
// PARSING ERROR
// =#========================================================================#=
/// Parsing error with contextual information (position and surrounding
/// bytes).
#[derive(Debug, Clone)]
pub struct ParsingError {
    kind: ParsingErrorKind,
    position: usize,
    context: String,
}

impl ParsingError {
    /// Create a ParsingError from an error kind and parser state
    pub fn from_parser(kind: ParsingErrorKind, parser: &ByteParser) -> Self {
        Self {
            kind,
            position: parser.position(),
            context: parser.get_context_as_string(DEFAULT_CONTEXT_LENGTH),
        }
    }

    /// Convenience constructor for UnexpectedEof
    pub fn unexpected_eof(parser: &ByteParser) -> Self {
        Self::from_parser(ParsingErrorKind::UnexpectedEof, parser)
    }

    /// Convenience constructor for UnclosedComment
    pub fn unclosed_comment(parser: &ByteParser) -> Self {
        Self::from_parser(ParsingErrorKind::UnclosedComment, parser)
    }

    /// Convenience constructor for InvalidNewickString
    pub fn invalid_newick_string(parser: &ByteParser, msg: String) -> Self {
        Self::from_parser(ParsingErrorKind::InvalidNewickString(msg), parser)
    }

    /// Convenience constructor for InvalidBranchLength
    pub fn invalid_branch_length(parser: &ByteParser, msg: String) -> Self {
        Self::from_parser(ParsingErrorKind::InvalidBranchLength(msg), parser)
    }

    /// Convenience constructor for InvalidRankToken
    pub fn invalid_rank_token(parser: &ByteParser, token: String) -> Self {
        Self::from_parser(ParsingErrorKind::InvalidRankToken(token), parser)
    }

    /// Get the error kind
    pub fn kind(&self) -> &ParsingErrorKind {
        &self.kind
    }

    /// Get the position where the error occurred
    pub fn position(&self) -> usize {
        self.position
    }
}

impl fmt::Display for ParsingError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} at position {}", self.kind, self.position)?;

        if !self.context.is_empty() {
            write!(
                f,
                "\n  Context (next {} bytes): {}",
                self.context.len(),
                self.context
            )?;
        }

        Ok(())
    }
}

impl std::error::Error for ParsingError {}

impl From<std::io::Error> for ParsingError {
    fn from(err: std::io::Error) -> Self {
        ParsingError {
            kind: ParsingErrorKind::Io(err.to_string()),
            position: 0,
            context: String::new(),
        }
    }
}
