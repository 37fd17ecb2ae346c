//! Whitespace Tokenizer - splits text on the C `isspace` character set.

use super::Tokenizer;

/// Splits input into maximal runs of non-whitespace characters.
///
/// Whitespace is the set recognized by C `isspace` in the default locale:
/// space, `\t`, `\n`, `\v`, `\f` and `\r`. Note that this includes the
/// vertical tab, which `char::is_ascii_whitespace` does not.
#[derive(Debug, Default, Clone, Copy)]
pub struct WhitespaceTokenizer;

impl WhitespaceTokenizer {
    pub fn new() -> Self {
        WhitespaceTokenizer
    }
}

/// Returns `true` for the bytes C `isspace` accepts in the default locale.
#[inline]
pub fn is_space_byte(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | 0x0B | 0x0C | b'\r')
}

#[inline]
fn is_separator(c: char) -> bool {
    c.is_ascii() && is_space_byte(c as u8)
}

/// Iterator over the whitespace-delimited tokens of a string.
pub struct WhitespaceTokenIterator<'a> {
    rest: &'a str,
}

impl<'a> Iterator for WhitespaceTokenIterator<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.rest.find(|c: char| !is_separator(c))?;
        let rest = &self.rest[start..];
        let end = rest.find(is_separator).unwrap_or(rest.len());
        let (token, tail) = rest.split_at(end);
        self.rest = tail;
        Some(token)
    }
}

impl Tokenizer for WhitespaceTokenizer {
    type TokenIter<'a> = WhitespaceTokenIterator<'a>;

    fn tokenize<'a>(&'a self, input: &'a str) -> Self::TokenIter<'a> {
        WhitespaceTokenIterator { rest: input }
    }
}
