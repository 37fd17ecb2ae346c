use std::path::{Path, PathBuf};

use lindex_common::{Result, verify_arg};

/// Parameters of an indexing run.
#[derive(Debug, Clone)]
pub struct IndexOptions {
    num_mappers: usize,
    num_reducers: usize,
    output_dir: PathBuf,
}

impl Default for IndexOptions {
    fn default() -> Self {
        let threads = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        IndexOptions {
            num_mappers: threads,
            num_reducers: threads.min(crate::partitioner::ALPHABET_SIZE),
            output_dir: PathBuf::from("."),
        }
    }
}

impl IndexOptions {
    pub fn new() -> IndexOptions {
        IndexOptions::default()
    }

    /// Number of mapper threads in the worker pool.
    pub fn with_num_mappers(mut self, num_mappers: usize) -> Self {
        self.num_mappers = num_mappers;
        self
    }

    /// Number of reducer threads, one per letter partition.
    pub fn with_num_reducers(mut self, num_reducers: usize) -> Self {
        self.num_reducers = num_reducers;
        self
    }

    /// Directory receiving the `<letter>.txt` files.
    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    pub fn num_mappers(&self) -> usize {
        self.num_mappers
    }

    pub fn num_reducers(&self) -> usize {
        self.num_reducers
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn validate(&self) -> Result<()> {
        verify_arg!(num_mappers, self.num_mappers > 0);
        verify_arg!(num_reducers, self.num_reducers > 0);
        verify_arg!(output_dir, self.output_dir.is_dir());
        Ok(())
    }
}
