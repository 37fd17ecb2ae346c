//! Thread-safe dispenser of input files.

use std::{
    path::PathBuf,
    sync::atomic::{AtomicUsize, Ordering},
};

use crate::document::{DocId, Document};

/// Ordered list of input files with a shared cursor.
///
/// Files are added during setup through `&mut self`. Afterwards any number of
/// threads may call [`next_file`](Self::next_file) concurrently: each call
/// advances the cursor and assigns the document id in a single atomic step,
/// so every file is dispensed exactly once and ids follow list order
/// regardless of which thread receives which file.
#[derive(Debug, Default)]
pub struct FileQueue {
    files: Vec<PathBuf>,
    cursor: AtomicUsize,
}

impl FileQueue {
    pub fn new() -> FileQueue {
        FileQueue::default()
    }

    /// Appends a file to the end of the list.
    ///
    /// # Panics
    ///
    /// Panics if the list already holds `DocId::MAX` files.
    pub fn add_file(&mut self, path: impl Into<PathBuf>) {
        assert!(
            self.files.len() < DocId::MAX as usize,
            "document id space exhausted"
        );
        self.files.push(path.into());
    }

    /// Returns the next undispensed file and its document id, or `None` once
    /// every file has been handed out. Never blocks.
    pub fn next_file(&self) -> Option<Document<'_>> {
        let len = self.files.len();
        let index = self
            .cursor
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |cursor| {
                (cursor < len).then_some(cursor + 1)
            })
            .ok()?;
        Some(Document {
            // `add_file` keeps the list length within `DocId` range.
            id: (index + 1) as DocId,
            path: &self.files[index],
        })
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Number of files handed out so far.
    pub fn dispensed(&self) -> usize {
        self.cursor.load(Ordering::Acquire)
    }
}

impl<P: Into<PathBuf>> FromIterator<P> for FileQueue {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        let mut queue = FileQueue::new();
        for path in iter {
            queue.add_file(path);
        }
        queue
    }
}
