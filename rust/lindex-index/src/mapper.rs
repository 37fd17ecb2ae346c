//! Mapping phase: extract the unique words of each file and route them to
//! their partitions.

use std::{fs::File, io::Read, ops::AddAssign};

use ahash::AHashSet;
use lindex_common::{Result, error::Error};
use lindex_text::{
    AsciiLetterNormalizer, Tokenizer, WhitespaceTokenizer, WordNormalizer, is_index_word,
};

use crate::{
    document::Document, file_queue::FileQueue, partition_index::PartitionIndex,
    partitioner::LetterPartitioner,
};

/// Counters reported by a mapper once the file queue is exhausted.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MapperStats {
    /// Files read and indexed.
    pub files_indexed: usize,
    /// Files that could not be opened or read.
    pub files_skipped: usize,
    /// Distinct `(word, document)` pairs routed to partitions.
    pub words_emitted: usize,
}

impl AddAssign for MapperStats {
    fn add_assign(&mut self, other: MapperStats) {
        self.files_indexed += other.files_indexed;
        self.files_skipped += other.files_skipped;
        self.words_emitted += other.words_emitted;
    }
}

/// Pulls files from a shared [`FileQueue`] until it is empty.
///
/// Several mappers run concurrently over the same queue and partitions. A
/// file that cannot be read is logged and skipped; its document id is still
/// consumed.
pub struct Mapper<'a, T = WhitespaceTokenizer, N = AsciiLetterNormalizer> {
    files: &'a FileQueue,
    partitioner: &'a LetterPartitioner,
    partitions: &'a [PartitionIndex],
    tokenizer: T,
    normalizer: N,
}

impl<'a> Mapper<'a> {
    pub fn new(
        files: &'a FileQueue,
        partitioner: &'a LetterPartitioner,
        partitions: &'a [PartitionIndex],
    ) -> Self {
        Mapper::with_text_processing(
            files,
            partitioner,
            partitions,
            WhitespaceTokenizer::new(),
            AsciiLetterNormalizer::new(),
        )
    }
}

impl<'a, T: Tokenizer, N: WordNormalizer> Mapper<'a, T, N> {
    pub fn with_text_processing(
        files: &'a FileQueue,
        partitioner: &'a LetterPartitioner,
        partitions: &'a [PartitionIndex],
        tokenizer: T,
        normalizer: N,
    ) -> Self {
        assert_eq!(partitioner.num_partitions(), partitions.len());
        Mapper {
            files,
            partitioner,
            partitions,
            tokenizer,
            normalizer,
        }
    }

    /// Processes files until the queue is exhausted.
    pub fn run(&self) -> MapperStats {
        let mut stats = MapperStats::default();
        while let Some(doc) = self.files.next_file() {
            match self.map_document(doc) {
                Ok(words) => {
                    log::debug!(
                        "indexed {} as document {} ({words} words)",
                        doc.path.display(),
                        doc.id
                    );
                    stats.files_indexed += 1;
                    stats.words_emitted += words;
                }
                Err(e) => {
                    log::error!("skipping document {}: {e}", doc.id);
                    stats.files_skipped += 1;
                }
            }
        }
        stats
    }

    /// Indexes a single document and returns the number of distinct words
    /// routed to partitions.
    pub fn map_document(&self, doc: Document<'_>) -> Result<usize> {
        let text = read_text(doc)?;
        let words = self.unique_words(&text);

        let mut routed: Vec<Vec<&str>> = vec![Vec::new(); self.partitions.len()];
        for word in &words {
            if !is_index_word(word) {
                continue;
            }
            if let Some(partition) = self.partitioner.partition_of_word(word) {
                routed[partition].push(word);
            }
        }

        let mut emitted = 0;
        for (partition, batch) in self.partitions.iter().zip(routed) {
            if !batch.is_empty() {
                emitted += batch.len();
                partition.insert_batch(batch, doc.id);
            }
        }
        Ok(emitted)
    }

    /// Tokenizes and normalizes `text`, keeping each non-empty word once.
    pub fn unique_words(&self, text: &str) -> AHashSet<String> {
        let mut words = AHashSet::new();
        let mut buf = String::new();
        for token in self.tokenizer.tokenize(text) {
            buf.clear();
            self.normalizer.normalize_into(token, &mut buf);
            if !buf.is_empty() && !words.contains(buf.as_str()) {
                words.insert(buf.clone());
            }
        }
        words
    }
}

/// Reads a document as text. Invalid UTF-8 sequences are replaced, which
/// only affects non-ASCII bytes that normalization drops anyway.
fn read_text(doc: Document<'_>) -> Result<String> {
    let mut file = File::open(doc.path)
        .map_err(|e| Error::io(format!("open {}", doc.path.display()), e))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)
        .map_err(|e| Error::io(format!("read {}", doc.path.display()), e))?;
    Ok(match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    })
}
