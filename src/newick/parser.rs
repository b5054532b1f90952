//! Parser for Newick format phylogenetic [Tree]s.

use crate::model::tree::{Tree, TreeIndex};
use crate::model::vertex::BranchLength;
use crate::parser::byte_parser::ByteParser;
use crate::parser::parsing_error::ParsingError;
use crate::taxonomy::NodeLabel;

/// Newick label delimiters: parentheses, comma, colon, semicolon, whitespace
const NEWICK_LABEL_DELIMITERS: &[u8] = b"([,:; \n\t\r)]";

/// Default guess for number of leaves, when unknown
const DEFAULT_NUM_LEAVES_GUESS: usize = 10;

/// Parser (configuration) for Newick format phylogenetic [Tree]s.
///
/// Trees may have arbitrary arity; internal vertices and the root may carry
/// names, which are decoded into structured [NodeLabel]s.
///
/// # Configuration
/// * `with_num_leaves(num_leaves)` - Can be configured with the number of
///   leaves in the tree to parse, for pre-allocation; otherwise a default
///   guess is used.
///
/// # Format
/// The accepted Newick grammar:
/// * tree ::= vertex [':' number] ';'
/// * vertex ::= leaf | internal_vertex
/// * internal_vertex ::= '(' vertex (',' vertex)* ')' [label] [branch_length]
/// * leaf ::= label [branch_length]
/// * branch_length ::= ':' number
///
/// Furthermore:
/// * Whitespace can occur between elements, just not within unquoted labels
///   or branch lengths
/// * Comments are square brackets and can occur wherever whitespace can
/// * Labels may be single-quoted, with internal quotes doubled
///
/// # Example
/// ```
/// use taxmark::newick::NewickParser;
/// use taxmark::parser::ByteParser;
///
/// let input = "((a:1.0,b:1.0)x:0.5,c:1.5);";
/// let mut byte_parser = ByteParser::from_str(input);
///
/// let mut newick_parser = NewickParser::new().with_num_leaves(3);
/// let tree = newick_parser.parse(&mut byte_parser).unwrap();
/// assert_eq!(tree.num_leaves(), 3);
/// ```
pub struct NewickParser {
    num_leaves: usize,
}

impl NewickParser {
    /// Creates a new `NewickParser` with default settings.
    pub fn new() -> Self {
        Self {
            num_leaves: DEFAULT_NUM_LEAVES_GUESS,
        }
    }

    /// Sets the expected number of leaves in the tree.
    ///
    /// This allows pre-allocation of the vertex arena; if not set, a default
    /// guess is used.
    pub fn with_num_leaves(mut self, num_leaves: usize) -> Self {
        self.num_leaves = num_leaves;
        self
    }

    /// Parses a single Newick tree from the given [ByteParser].
    ///
    /// # Arguments
    /// * `parser` - The byte parser positioned at the start of a Newick tree
    ///
    /// # Returns
    /// * `Ok(Tree)` - The parsed phylogenetic tree
    /// * `Err(ParsingError)` - If the Newick format is invalid
    pub fn parse(&mut self, parser: &mut ByteParser) -> Result<Tree, ParsingError> {
        let mut tree = Tree::new(self.num_leaves);
        self.parse_root(parser, &mut tree)?;
        Ok(tree)
    }

    /// Parses root of tree and adds it to tree:
    /// - `(child, ...)[label][:branch_length];`
    /// - Skips leading comments and whitespace
    ///
    /// Equivalent to `parse_internal_vertex` but taking care of root
    /// specialities (terminating semicolon, ignored branch length).
    fn parse_root(&mut self, parser: &mut ByteParser, tree: &mut Tree) -> Result<(), ParsingError> {
        parser.skip_comment_and_whitespace()?;

        let children = self.parse_children(parser, tree)?;
        let label = self.parse_node_label(parser)?;

        // Root may have an optional branch length (which we ignore)
        let _ = self.parse_branch_length(parser)?;

        // Consume the terminating semicolon
        parser.skip_comment_and_whitespace()?;
        if !parser.consume_if(b';') {
            return Err(ParsingError::invalid_newick_string(
                parser,
                format!(
                    "Expected ';' at end of tree but found {:?}",
                    parser.peek().map(|b| b as char)
                ),
            ));
        }

        tree.add_root(children, label);

        Ok(())
    }

    /// Parses a vertex (either internal vertex or leaf) and returns its
    /// index:
    /// - Skips leading comments and whitespace
    /// - Dispatches to `parse_internal_vertex` if starts with `(`, otherwise
    ///   `parse_leaf`
    fn parse_vertex(
        &mut self,
        parser: &mut ByteParser,
        tree: &mut Tree,
    ) -> Result<TreeIndex, ParsingError> {
        parser.skip_comment_and_whitespace()?;
        if parser.peek_is(b'(') {
            self.parse_internal_vertex(parser, tree)
        } else {
            self.parse_leaf(parser, tree)
        }
    }

    /// Parses internal vertex, adds it to tree, and returns its index:
    /// - `(child, ...)[label][:branch_length]`
    fn parse_internal_vertex(
        &mut self,
        parser: &mut ByteParser,
        tree: &mut Tree,
    ) -> Result<TreeIndex, ParsingError> {
        let children = self.parse_children(parser, tree)?;
        let label = self.parse_node_label(parser)?;
        let branch_length = self.parse_branch_length(parser)?;

        let index = tree.add_internal_vertex(children, branch_length, label);

        Ok(index)
    }

    /// Parses the child list `(child, ...)` and returns the child indices:
    /// - Expects parser at opening `(`
    ///   (caller should skip leading comments/whitespace)
    fn parse_children(
        &mut self,
        parser: &mut ByteParser,
        tree: &mut Tree,
    ) -> Result<Vec<TreeIndex>, ParsingError> {
        // Calling methods should have skipped comments and whitespace
        if !parser.consume_if(b'(') {
            return Err(ParsingError::invalid_newick_string(
                parser,
                format!(
                    "Expected '(' before children but found {:?}",
                    parser.peek().map(|b| b as char)
                ),
            ));
        }

        let mut children = vec![self.parse_vertex(parser, tree)?];

        parser.skip_comment_and_whitespace()?;
        while parser.consume_if(b',') {
            children.push(self.parse_vertex(parser, tree)?);
            parser.skip_comment_and_whitespace()?;
        }

        if !parser.consume_if(b')') {
            return Err(ParsingError::invalid_newick_string(
                parser,
                format!(
                    "Expected ')' after children but found {:?}",
                    parser.peek().map(|b| b as char)
                ),
            ));
        }

        Ok(children)
    }

    /// Parses leaf vertex and adds it to tree:
    /// - `label[:branch_length]`
    /// - Expects parser at start of label
    ///   (caller should skip leading comments/whitespace)
    fn parse_leaf(
        &mut self,
        parser: &mut ByteParser,
        tree: &mut Tree,
    ) -> Result<TreeIndex, ParsingError> {
        let label = self.parse_node_label(parser)?;
        let branch_length = self.parse_branch_length(parser)?;

        let index = tree.add_leaf(branch_length, label);

        Ok(index)
    }

    /// Parses an (optional) node name and decodes it into a [NodeLabel].
    ///
    /// An absent name yields an empty label.
    fn parse_node_label(&mut self, parser: &mut ByteParser) -> Result<NodeLabel, ParsingError> {
        let text = parser.parse_label(NEWICK_LABEL_DELIMITERS)?;

        NodeLabel::parse(&text)
            .map_err(|unknown| ParsingError::invalid_rank_token(parser, unknown.0))
    }

    /// Parses optional branch length `[:number]`:
    /// - Skips comments/whitespace before and after `:`
    /// - Supports scientific notation (e.g., `1.5e-10`)
    ///
    /// # Returns
    /// - [BranchLength] if found branch length and was able to parse it
    /// - `None` if found no branch length
    /// - [ParsingError] if it couldn't parse branch length value
    fn parse_branch_length(
        &mut self,
        parser: &mut ByteParser,
    ) -> Result<Option<BranchLength>, ParsingError> {
        parser.skip_comment_and_whitespace()?;
        if !parser.consume_if(b':') {
            return Ok(None);
        }
        parser.skip_comment_and_whitespace()?;

        let mut branch_length_str = String::new();
        while let Some(b) = parser.peek() {
            // Valid characters for a float: digits, '.', '-', '+', 'e', 'E'
            if b.is_ascii_digit() || b == b'.' || b == b'-' || b == b'+' || b == b'e' || b == b'E' {
                branch_length_str.push(b as char);
                parser.next();
            } else {
                break; // Hit a delimiter like ',', ')', ';', or whitespace
            }
        }

        let value: f64 = branch_length_str
            .parse()
            .map_err(|_| ParsingError::invalid_branch_length(parser, branch_length_str.clone()))?;

        if value < 0.0 || !value.is_finite() {
            return Err(ParsingError::invalid_branch_length(
                parser,
                branch_length_str,
            ));
        }

        Ok(Some(BranchLength::new(value)))
    }
}

impl Default for NewickParser {
    fn default() -> Self {
        Self::new()
    }
}
