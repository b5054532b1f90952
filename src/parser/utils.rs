//! Label escaping and unescaping for the Newick format.
//!
//! Node names carrying special characters (delimiters, whitespace, quotes)
//! must be wrapped in single quotes when written and unwrapped when read.
//! Encoded labels with a support value (`97:Bacilli`) contain a `:` and so
//! always come out quoted.

/// Checks if a label is already escaped:
/// - wrapped in single quotes and each internal single quote doubled, or
/// - no space and special characters
///
/// # Arguments
/// * `label` - The label string to check
///
/// # Examples
/// ```
/// # use taxmark::parser::utils::is_escaped;
/// assert_eq!(is_escaped("Bacilli"), true);
/// assert_eq!(is_escaped("97:Bacilli"), false);
/// assert_eq!(is_escaped("Escherichia coli"), false);
/// assert_eq!(is_escaped("Escherichia_coli"), true);
/// assert_eq!(is_escaped("'Escherichia coli'"), true);
/// assert_eq!(is_escaped("'Candidatus ''Accumulibacter'''"), true);
/// assert_eq!(is_escaped("'Candidatus 'Accumulibacter''"), false);
/// ```
pub fn is_escaped(label: &str) -> bool {
    if is_single_quoted(label) {
        // Check that every internal single quote is escaped
        let inner = &label[1..label.len() - 1];
        let mut prev = ' ';
        for char in inner.chars() {
            if prev == '\'' {
                if char != '\'' {
                    return false;
                }
                // A full pair of quotes, reset
                prev = ' ';
            } else {
                prev = char;
            }
        }

        true
    } else {
        !label.chars().any(is_special)
    }
}

/// Checks if a label is enclosed in single quotes.
pub fn is_single_quoted(label: &str) -> bool {
    label.starts_with('\'') && label.ends_with('\'') && label.len() >= 2
}

fn is_special(c: char) -> bool {
    matches!(
        c,
        ' ' | ',' | ';' | '\t' | '\n' | '\r' | '(' | ')' | ':' | '[' | ']' | '\''
    )
}

/// Escapes a label for safe use in the Newick format.
///
/// Labels containing special characters (delimiters, whitespace, brackets,
/// quotes) are wrapped in single quotes with internal single quotes doubled.
/// Spaces are kept and quoted, never converted to underscores; rank tokens
/// like `P__` carry underscores of their own, so underscores are ordinary
/// characters in this format. An already escaped label is returned as-is.
///
/// # Arguments
/// * `label` - The label string to escape
///
/// # Examples
/// ```
/// # use taxmark::parser::utils::escape_label;
/// assert_eq!(escape_label("Bacilli"), "Bacilli");
/// assert_eq!(escape_label("97:Bacilli"), "'97:Bacilli'");
/// assert_eq!(escape_label("Bacilli|D__;P__"), "'Bacilli|D__;P__'");
/// assert_eq!(escape_label("Escherichia coli"), "'Escherichia coli'");
/// assert_eq!(escape_label("Candidatus 'Accumulibacter'"), "'Candidatus ''Accumulibacter'''");
/// ```
pub fn escape_label(label: &str) -> String {
    // Don't double-escape
    if is_escaped(label) {
        return label.to_string();
    }

    // Already quoted, but with unescaped internal quotes; fix those
    if is_single_quoted(label) {
        let inner = &label[1..label.len() - 1];
        let mut fixed = String::with_capacity(inner.len() + 3);
        let mut chars = inner.chars().peekable();

        fixed.push('\'');
        while let Some(ch) = chars.next() {
            fixed.push(ch);
            if ch == '\'' {
                if chars.peek() == Some(&'\'') {
                    // Already escaped pair, consume and keep
                    fixed.push(chars.next().unwrap());
                } else {
                    fixed.push('\'');
                }
            }
        }
        fixed.push('\'');

        return fixed;
    }

    if label.chars().any(is_special) {
        let escaped = label.replace('\'', "''");
        format!("'{}'", escaped)
    } else {
        label.to_string()
    }
}

/// Unescapes a label that was escaped for the Newick format.
///
/// Removes surrounding single quotes if present and converts doubled single
/// quotes back to single quotes. Unquoted labels are returned unchanged.
///
/// # Arguments
/// * `label` - The escaped label string
///
/// # Examples
/// ```
/// # use taxmark::parser::utils::unescape_label;
/// assert_eq!(unescape_label("Bacilli"), "Bacilli");
/// assert_eq!(unescape_label("'97:Bacilli'"), "97:Bacilli");
/// assert_eq!(unescape_label("'Escherichia coli'"), "Escherichia coli");
/// assert_eq!(unescape_label("'Candidatus ''Accumulibacter'''"), "Candidatus 'Accumulibacter'");
/// ```
pub fn unescape_label(label: &str) -> String {
    if is_single_quoted(label) {
        label[1..label.len() - 1].replace("''", "'")
    } else {
        label.to_string()
    }
}
