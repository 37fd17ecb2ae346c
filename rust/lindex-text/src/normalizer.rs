//! Word normalization.

/// Maps a raw token to its canonical index form.
///
/// Implementations must be idempotent: normalizing an already normalized
/// word returns it unchanged.
pub trait WordNormalizer: Send + Sync {
    /// Appends the normalized form of `token` to `out`.
    fn normalize_into(&self, token: &str, out: &mut String);

    /// Returns the normalized form of `token`, possibly empty.
    fn normalize(&self, token: &str) -> String {
        let mut out = String::with_capacity(token.len());
        self.normalize_into(token, &mut out);
        out
    }
}

/// Keeps the ASCII letters of a token and lowercases them; everything else
/// (digits, punctuation, non-ASCII characters) is dropped.
///
/// `"Don't"` becomes `"dont"`, `"C3PO"` becomes `"cpo"`, `"1984"` becomes `""`.
#[derive(Debug, Default, Clone, Copy)]
pub struct AsciiLetterNormalizer;

impl AsciiLetterNormalizer {
    pub fn new() -> Self {
        AsciiLetterNormalizer
    }
}

impl WordNormalizer for AsciiLetterNormalizer {
    fn normalize_into(&self, token: &str, out: &mut String) {
        out.extend(
            token
                .chars()
                .filter(char::is_ascii_alphabetic)
                .map(|c| c.to_ascii_lowercase()),
        );
    }
}

/// Returns `true` if `word` can be placed in the letter index: non-empty and
/// starting with a lowercase ASCII letter.
#[inline]
pub fn is_index_word(word: &str) -> bool {
    word.as_bytes().first().is_some_and(u8::is_ascii_lowercase)
}
