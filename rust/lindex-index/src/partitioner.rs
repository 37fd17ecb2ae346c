//! Assignment of the 26 lowercase letters to reducer partitions.

use std::fmt;

use lindex_common::{Result, verify_arg};

/// Number of letters covered by the index (`a` through `z`).
pub const ALPHABET_SIZE: usize = 26;

/// A contiguous run of letters owned by one partition.
///
/// Stored as an offset into the alphabet and a length; a range may be empty
/// when there are more partitions than letters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LetterRange {
    start: u8,
    len: u8,
}

impl LetterRange {
    /// Offset of the first letter (`0` for `a`).
    pub fn offset(&self) -> usize {
        self.start as usize
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns `true` if the lowercase ASCII `letter` falls in this range.
    pub fn contains(&self, letter: u8) -> bool {
        letter.is_ascii_lowercase() && {
            let pos = letter - b'a';
            pos >= self.start && pos < self.start + self.len
        }
    }

    /// The letters of the range as lowercase ASCII bytes, in order.
    pub fn letters(&self) -> impl Iterator<Item = u8> + use<> {
        let first = b'a' + self.start;
        first..first + self.len
    }
}

impl fmt::Display for LetterRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let first = (b'a' + self.start) as char;
        match self.len {
            0 => f.write_str("(none)"),
            1 => write!(f, "{first}"),
            len => write!(f, "{first}-{}", (b'a' + self.start + len - 1) as char),
        }
    }
}

/// Splits the alphabet into `num_partitions` contiguous ranges.
///
/// Each partition receives `26 / n` letters and the first `26 % n` partitions
/// receive one extra, in alphabetical order. With more partitions than
/// letters the trailing partitions are empty.
pub fn assign(num_partitions: usize) -> Result<Vec<LetterRange>> {
    verify_arg!(num_partitions, num_partitions > 0);
    let base = ALPHABET_SIZE / num_partitions;
    let extra = ALPHABET_SIZE % num_partitions;

    let mut start = 0;
    Ok((0..num_partitions)
        .map(|i| {
            let len = base + usize::from(i < extra);
            let range = LetterRange {
                start: start as u8,
                len: len as u8,
            };
            start += len;
            range
        })
        .collect())
}

/// Finds the partition owning `letter` by scanning the cumulative range
/// lengths. Returns `None` for bytes outside `a..=z`.
pub fn letter_to_partition(letter: u8, ranges: &[LetterRange]) -> Option<usize> {
    if !letter.is_ascii_lowercase() {
        return None;
    }
    let pos = (letter - b'a') as usize;
    let mut cumulative = 0;
    for (i, range) in ranges.iter().enumerate() {
        cumulative += range.len();
        if pos < cumulative {
            return Some(i);
        }
    }
    None
}

/// Letter-to-partition routing shared by the mapping and reducing phases.
///
/// The assignment is computed once with [`assign`] and flattened into a
/// lookup table, so routing a word is a single array access.
///
/// At most [`ALPHABET_SIZE`] partitions are kept: any partition past the
/// alphabet would own no letters.
#[derive(Debug, Clone)]
pub struct LetterPartitioner {
    ranges: Vec<LetterRange>,
    table: [usize; ALPHABET_SIZE],
}

impl LetterPartitioner {
    pub fn new(num_partitions: usize) -> Result<LetterPartitioner> {
        let ranges = assign(num_partitions.min(ALPHABET_SIZE))?;
        let mut table = [0; ALPHABET_SIZE];
        for (slot, letter) in table.iter_mut().zip(b'a'..=b'z') {
            if let Some(partition) = letter_to_partition(letter, &ranges) {
                *slot = partition;
            }
        }
        Ok(LetterPartitioner { ranges, table })
    }

    pub fn num_partitions(&self) -> usize {
        self.ranges.len()
    }

    pub fn ranges(&self) -> &[LetterRange] {
        &self.ranges
    }

    pub fn range(&self, partition: usize) -> LetterRange {
        self.ranges[partition]
    }

    /// Partition owning `letter`, or `None` if it is not in `a..=z`.
    #[inline]
    pub fn partition_of(&self, letter: u8) -> Option<usize> {
        letter
            .is_ascii_lowercase()
            .then(|| self.table[(letter - b'a') as usize])
    }

    /// Partition owning the first letter of `word`.
    #[inline]
    pub fn partition_of_word(&self, word: &str) -> Option<usize> {
        word.as_bytes()
            .first()
            .and_then(|&letter| self.partition_of(letter))
    }
}
