//! Tokenizers split raw text into tokens.
//!
//! The tokenizers return iterators of string slices borrowed from the input, so
//! tokenizing allocates nothing.

mod whitespace;

pub use whitespace::{WhitespaceTokenIterator, WhitespaceTokenizer, is_space_byte};

/// A tokenizer extracts raw tokens from a text.
pub trait Tokenizer: Send + Sync {
    /// The iterator type returned by tokenize.
    type TokenIter<'a>: Iterator<Item = &'a str>
    where
        Self: 'a;

    /// Returns an iterator over the tokens of `input`, in order of appearance.
    fn tokenize<'a>(&'a self, input: &'a str) -> Self::TokenIter<'a>;
}
