//! Term extraction for the letter index.
//!
//! Turning raw file content into index words is a two-step process:
//!
//! 1. **Tokenization**: the text is split into raw tokens on whitespace.
//! 2. **Normalization**: each token is reduced to its canonical form, the
//!    lowercase ASCII letters it contains. Tokens without letters normalize to
//!    the empty string and are not indexed.
//!
//! ```rust
//! use lindex_text::{AsciiLetterNormalizer, Tokenizer, WhitespaceTokenizer, WordNormalizer};
//!
//! let tokenizer = WhitespaceTokenizer::new();
//! let normalizer = AsciiLetterNormalizer::new();
//! let words: Vec<String> = tokenizer
//!     .tokenize("Don't panic, 42!")
//!     .map(|token| normalizer.normalize(token))
//!     .collect();
//! assert_eq!(words, ["dont", "panic", ""]);
//! ```

mod normalizer;
mod tokenizers;

pub use normalizer::{AsciiLetterNormalizer, WordNormalizer, is_index_word};
pub use tokenizers::{Tokenizer, WhitespaceTokenIterator, WhitespaceTokenizer, is_space_byte};
