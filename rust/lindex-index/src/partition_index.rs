//! Per-partition word to document-set maps.

use std::{
    cmp::Ordering,
    sync::{Mutex, MutexGuard, PoisonError},
};

use ahash::AHashMap;
use lindex_workflow::phase_barrier::PhaseBarrier;
use roaring::RoaringBitmap;

use crate::{document::DocId, partitioner::LetterRange};

type WordMap = AHashMap<String, RoaringBitmap>;

/// The words owned by one reducer partition, filled concurrently by mappers.
///
/// Every inserted word must start with a letter in the partition's
/// [`LetterRange`]. The map is guarded by its own lock, so mappers routing
/// words to different partitions never contend.
#[derive(Debug, Default)]
pub struct PartitionIndex {
    letters: LetterRange,
    words: Mutex<WordMap>,
}

impl PartitionIndex {
    pub fn new(letters: LetterRange) -> PartitionIndex {
        PartitionIndex {
            letters,
            words: Mutex::new(WordMap::default()),
        }
    }

    pub fn letters(&self) -> LetterRange {
        self.letters
    }

    /// Records that `word` occurs in document `doc`.
    pub fn insert(&self, word: &str, doc: DocId) {
        let mut words = self.lock();
        self.upsert(&mut words, word, doc);
    }

    /// Records that every word of `words` occurs in document `doc`, taking
    /// the lock once for the whole batch.
    pub fn insert_batch<'w>(&self, words: impl IntoIterator<Item = &'w str>, doc: DocId) {
        let mut map = self.lock();
        for word in words {
            self.upsert(&mut map, word, doc);
        }
    }

    /// Blocks until `barrier` opens, then moves the accumulated words out of
    /// the partition.
    ///
    /// Mappers must not insert after the barrier has been signalled; the
    /// returned snapshot is owned exclusively by the caller.
    pub fn take_after(&self, barrier: &PhaseBarrier) -> PartitionSnapshot {
        barrier.await_done();
        let words = std::mem::take(&mut *self.lock());
        PartitionSnapshot {
            letters: self.letters,
            words,
        }
    }

    fn upsert(&self, map: &mut WordMap, word: &str, doc: DocId) {
        debug_assert!(
            word.as_bytes()
                .first()
                .is_some_and(|&l| self.letters.contains(l)),
            "word '{word}' routed to partition {}",
            self.letters
        );
        match map.get_mut(word) {
            Some(docs) => {
                docs.insert(doc);
            }
            None => {
                let mut docs = RoaringBitmap::new();
                docs.insert(doc);
                map.insert(word.to_owned(), docs);
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, WordMap> {
        // A mapper that panicked mid-insert leaves a map that is still
        // structurally valid; the pipeline aborts the run in that case.
        self.words.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Exclusive, read-only view of a partition after the mapping phase.
#[derive(Debug, Default)]
pub struct PartitionSnapshot {
    letters: LetterRange,
    words: WordMap,
}

impl PartitionSnapshot {
    pub fn letters(&self) -> LetterRange {
        self.letters
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn get(&self, word: &str) -> Option<&RoaringBitmap> {
        self.words.get(word)
    }

    /// Groups all entries by first letter in a single pass. Returns one
    /// bucket per letter of the partition's range, in alphabetical order;
    /// buckets may be empty.
    pub fn entries_by_letter(&self) -> Vec<(u8, Vec<WordEntry<'_>>)> {
        let mut buckets: Vec<(u8, Vec<WordEntry<'_>>)> = self
            .letters
            .letters()
            .map(|letter| (letter, Vec::new()))
            .collect();
        let offset = self.letters.offset();
        for (word, docs) in &self.words {
            let Some(&first) = word.as_bytes().first() else {
                continue;
            };
            if self.letters.contains(first) {
                buckets[(first - b'a') as usize - offset]
                    .1
                    .push(WordEntry { word, docs });
            }
        }
        buckets
    }
}

/// A word and the set of documents containing it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WordEntry<'a> {
    pub word: &'a str,
    pub docs: &'a RoaringBitmap,
}

impl WordEntry<'_> {
    /// Number of distinct documents containing the word.
    pub fn doc_count(&self) -> u64 {
        self.docs.len()
    }

    /// Output order: more documents first, ties broken by ascending word.
    pub fn output_order(&self, other: &WordEntry<'_>) -> Ordering {
        other
            .doc_count()
            .cmp(&self.doc_count())
            .then_with(|| self.word.cmp(other.word))
    }
}

/// Sorts entries into output order (see [`WordEntry::output_order`]).
pub fn sort_entries(entries: &mut [WordEntry<'_>]) {
    entries.sort_unstable_by(|a, b| a.output_order(b));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partitioner::assign;
    use std::{sync::Arc, thread};

    fn full_range() -> LetterRange {
        assign(1).unwrap()[0]
    }

    #[test]
    fn test_insert_and_take() {
        let partition = PartitionIndex::new(full_range());
        partition.insert("cat", 2);
        partition.insert("cat", 1);
        partition.insert("cat", 2);
        partition.insert_batch(["dog", "cow"], 1);

        let barrier = PhaseBarrier::new();
        barrier.signal_done();
        let snapshot = partition.take_after(&barrier);
        assert_eq!(snapshot.len(), 3);
        assert_eq!(
            snapshot.get("cat").unwrap().iter().collect::<Vec<_>>(),
            [1, 2]
        );
        assert!(partition.take_after(&barrier).is_empty());
    }

    #[test]
    fn test_take_waits_for_barrier() {
        let partition = Arc::new(PartitionIndex::new(full_range()));
        let barrier = Arc::new(PhaseBarrier::new());

        let reader = {
            let partition = partition.clone();
            let barrier = barrier.clone();
            thread::spawn(move || partition.take_after(&barrier).len())
        };

        for id in 1..=100 {
            partition.insert("apple", id);
            partition.insert(&format!("w{id}"), id);
        }
        barrier.signal_done();
        assert_eq!(reader.join().unwrap(), 101);
    }

    #[test]
    fn test_concurrent_inserts() {
        let partition = PartitionIndex::new(full_range());
        thread::scope(|s| {
            for t in 0..4u32 {
                let partition = &partition;
                s.spawn(move || {
                    for i in 0..250 {
                        partition.insert_batch(["shared", "also"], t * 250 + i + 1);
                    }
                });
            }
        });
        let barrier = PhaseBarrier::new();
        barrier.signal_done();
        let snapshot = partition.take_after(&barrier);
        assert_eq!(snapshot.get("shared").unwrap().len(), 1000);
        assert_eq!(snapshot.get("also").unwrap().len(), 1000);
    }

    #[test]
    fn test_entries_by_letter() {
        let ranges = assign(2).unwrap();
        let partition = PartitionIndex::new(ranges[1]);
        partition.insert_batch(["nut", "zoo", "nap"], 1);
        partition.insert("zoo", 3);

        let barrier = PhaseBarrier::new();
        barrier.signal_done();
        let snapshot = partition.take_after(&barrier);

        let buckets = snapshot.entries_by_letter();
        assert_eq!(buckets.len(), 13);
        assert_eq!(buckets[0].0, b'n');
        assert_eq!(buckets[0].1.len(), 2);
        assert_eq!(buckets[12].0, b'z');
        assert_eq!(buckets[12].1.len(), 1);
        assert!(buckets[1..12].iter().all(|(_, e)| e.is_empty()));

        let mut n_words = buckets[0].1.clone();
        sort_entries(&mut n_words);
        let words: Vec<_> = n_words.iter().map(|e| e.word).collect();
        assert_eq!(words, ["nap", "nut"]);
    }

    #[test]
    fn test_output_order() {
        let two: RoaringBitmap = [1, 2].into_iter().collect();
        let one_a: RoaringBitmap = [3].into_iter().collect();
        let one_b: RoaringBitmap = [1].into_iter().collect();
        let mut entries = vec![
            WordEntry { word: "dog", docs: &one_a },
            WordEntry { word: "cat", docs: &one_b },
            WordEntry { word: "emu", docs: &two },
        ];
        sort_entries(&mut entries);
        let words: Vec<_> = entries.iter().map(|e| e.word).collect();
        assert_eq!(words, ["emu", "cat", "dog"]);
    }
}
