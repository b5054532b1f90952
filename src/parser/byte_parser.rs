//! Low-level byte-by-byte parser for ASCII text.
//!
//! This module provides [ByteParser] for parsing text-based file formats
//! with support for peeking, consuming, and quote-aware label parsing. Used
//! as the foundation for the Newick parser.

use crate::parser::parsing_error::ParsingError;

// =#========================================================================#=
// BYTE PARSER
// =#========================================================================#=
/// A byte-by-byte parser over an in-memory ASCII buffer.
///
/// [ByteParser] provides parser operations for text-based formats,
/// specifically targeting Newick. It offers peek, consume, and skip
/// operations, quote-aware label parsing (single quotes with escaping), and
/// context extraction for error reporting.
///
/// # Example
/// ```
/// use taxmark::parser::ByteParser;
///
/// let mut parser = ByteParser::from_str("(A:1.0,B:1.0);");
/// assert_eq!(parser.peek(), Some(b'('));
/// parser.next();
/// let label = parser.parse_label(b",:;()").unwrap();
/// assert_eq!(label, "A");
/// ```
pub struct ByteParser {
    data: Vec<u8>,
    position: usize,
}

impl ByteParser {
    /// Creates a new `ByteParser` from a byte slice by copying it into a Vec.
    ///
    /// # Arguments
    /// * `input` - The byte slice to parse
    pub fn from_bytes(input: &[u8]) -> Self {
        ByteParser {
            data: input.to_vec(),
            position: 0,
        }
    }

    /// Creates a new `ByteParser` from a string by copying it into a Vec.
    ///
    /// # Arguments
    /// * `input` - The string to parse
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(input: &str) -> Self {
        Self::from_bytes(input.as_bytes())
    }

    /// Peeks at the current byte without consuming it.
    ///
    /// # Returns
    /// * `Some(u8)` - The current byte if available
    /// * `None` - If at end of data (EOF)
    #[inline(always)]
    pub fn peek(&self) -> Option<u8> {
        self.data.get(self.position).copied()
    }

    /// Gets the current byte and advances the position (consumes it).
    ///
    /// # Returns
    /// * `Some(u8)` - The current byte if available
    /// * `None` - If at end of data (EOF)
    #[inline(always)]
    pub fn next(&mut self) -> Option<u8> {
        let byte = self.peek();
        if byte.is_some() {
            self.position += 1;
        }
        byte
    }

    /// Skips (consumes) all consecutive whitespace characters.
    ///
    /// Whitespace includes: space (' '), tab ('\t'), newline ('\n'), and
    /// carriage return ('\r').
    pub fn skip_whitespace(&mut self) {
        while let Some(b) = self.peek() {
            if b == b' ' || b == b'\t' || b == b'\n' || b == b'\r' {
                self.next();
            } else {
                break;
            }
        }
    }

    /// Skips (consumes) a bracket comment if present.
    ///
    /// Comments are enclosed in square brackets `[...]`.
    ///
    /// # Returns
    /// * `Ok(true)` - A comment was found and consumed
    /// * `Ok(false)` - No comment at current position
    ///
    /// # Errors
    /// Returns an error if a comment starts with `[` but doesn't have a
    /// closing `]`.
    pub fn skip_comment(&mut self) -> Result<bool, ParsingError> {
        if self.consume_if(b'[') {
            if !self.consume_until(b']', ConsumeMode::Inclusive) {
                return Err(ParsingError::unclosed_comment(self));
            }
            return Ok(true);
        }

        Ok(false)
    }

    /// Skips (consumes) all consecutive whitespace and bracket comments.
    ///
    /// # Errors
    /// Returns an error if an unclosed comment is encountered.
    pub fn skip_comment_and_whitespace(&mut self) -> Result<(), ParsingError> {
        self.skip_whitespace();

        while self.skip_comment()? {
            self.skip_whitespace();
        }

        Ok(())
    }

    /// Checks if the current byte matches the target byte.
    ///
    /// # Arguments
    /// * `ch` - The byte to match against
    pub fn peek_is(&self, ch: u8) -> bool {
        self.peek() == Some(ch)
    }

    /// Consumes the current byte if it matches the target byte.
    ///
    /// # Arguments
    /// * `ch` - The byte to match and consume
    ///
    /// # Returns
    /// `true` if the byte was matched and consumed, `false` otherwise
    pub fn consume_if(&mut self, ch: u8) -> bool {
        if self.peek_is(ch) {
            self.next();
            true
        } else {
            false
        }
    }

    /// Consumes bytes until the target byte is found.
    ///
    /// # Arguments
    /// * `target` - The byte to search for
    /// * `mode` - Whether to consume the target byte (`Inclusive`) or stop
    ///   before it (`Exclusive`)
    ///
    /// # Returns
    /// `true` if the target was found, `false` if EOF was reached first
    pub fn consume_until(&mut self, target: u8, mode: ConsumeMode) -> bool {
        while let Some(b) = self.peek() {
            if b == target {
                if mode == ConsumeMode::Inclusive {
                    self.next();
                }
                return true;
            }
            self.next();
        }
        false // reached EOF without finding target
    }

    /// Returns whether the end of data (EOF) has been reached.
    pub fn is_eof(&self) -> bool {
        self.position >= self.data.len()
    }

    /// Returns the current parser position in the input.
    ///
    /// Useful for error messages and tracking parser state.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Returns a string from up to `k` bytes from the current position for
    /// error context.
    ///
    /// Invalid UTF-8 sequences are replaced with the Unicode replacement
    /// character.
    ///
    /// # Arguments
    /// * `k` - Maximum number of bytes to retrieve
    pub fn get_context_as_string(&self, k: usize) -> String {
        let end = (self.position + k).min(self.data.len());
        String::from_utf8_lossy(&self.data[self.position..end]).into_owned()
    }

    /// Parses a label (quoted or unquoted) with the given delimiter set.
    ///
    /// This method automatically detects whether the label is quoted (single
    /// quotes) or unquoted and calls the appropriate parser method.
    ///
    /// # Arguments
    /// * `delimiters` - Byte array of characters that end an unquoted label
    ///
    /// # Returns
    /// The parsed label string
    ///
    /// # Errors
    /// Returns an error if quote parsing fails
    pub fn parse_label(&mut self, delimiters: &[u8]) -> Result<String, ParsingError> {
        self.skip_comment_and_whitespace()?;

        if self.peek() == Some(b'\'') {
            self.parse_quoted_label()
        } else {
            self.parse_unquoted_label(delimiters)
        }
    }

    /// Parses a quoted label enclosed in single quotes with escape support.
    ///
    /// Assumes the opening quote has not been consumed yet. Single quotes
    /// within the label are escaped by doubling them (e.g., `'Wilson''s'`
    /// becomes `Wilson's`).
    ///
    /// # Returns
    /// The parsed label string without the enclosing quotes
    ///
    /// # Errors
    /// Returns an error if the quoted label is not properly closed
    pub fn parse_quoted_label(&mut self) -> Result<String, ParsingError> {
        self.next(); // consume opening '

        let mut label = String::new();
        let mut closed = false;
        while let Some(b) = self.next() {
            if b == b'\'' {
                // Check for escaped quote (two single quotes in a row)
                if self.peek() == Some(b'\'') {
                    label.push('\'');
                    self.next(); // consume second quote
                } else {
                    closed = true;
                    break;
                }
            } else {
                label.push(b as char);
            }
        }

        if !closed {
            return Err(ParsingError::unexpected_eof(self));
        }

        Ok(label)
    }

    /// Parses an unquoted label until any of the given delimiters is
    /// encountered.
    ///
    /// # Arguments
    /// * `delimiters` - Byte array of characters that terminate the label
    ///
    /// # Returns
    /// The parsed label string
    ///
    /// # Errors
    /// Currently does not return errors, but returns `Result` for API
    /// consistency
    pub fn parse_unquoted_label(&mut self, delimiters: &[u8]) -> Result<String, ParsingError> {
        let mut label = String::new();

        while let Some(b) = self.peek() {
            // Stop at any delimiter
            if delimiters.contains(&b) {
                break;
            }
            label.push(b as char);
            self.next();
        }

        Ok(label)
    }
}

/// Specifies whether to consume or leave the target when using
/// `consume_until`.
///
/// # Examples
/// ```
/// use taxmark::parser::{ByteParser, ConsumeMode};
///
/// let mut parser = ByteParser::from_str("[a comment](A:1.0,B:2.0);");
///
/// // Inclusive: consume up to and including ']'
/// parser.consume_until(b']', ConsumeMode::Inclusive);
/// assert_eq!(parser.peek(), Some(b'('));
///
/// // Exclusive: stop at the target
/// parser.consume_until(b';', ConsumeMode::Exclusive);
/// assert_eq!(parser.peek(), Some(b';'));
/// ```
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ConsumeMode {
    /// Consume the target byte along with everything before it.
    Inclusive,

    /// Stop before the target byte without consuming it.
    Exclusive,
}
