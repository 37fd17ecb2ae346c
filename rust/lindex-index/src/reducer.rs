//! Reducing phase: sort each letter's words and write `<letter>.txt`.

use std::{
    fs::File,
    io::{self, BufWriter, Write},
    ops::AddAssign,
    path::{Path, PathBuf},
    sync::atomic::{AtomicBool, Ordering},
};

use itertools::Itertools;
use lindex_common::{Result, error::Error};
use lindex_workflow::phase_barrier::PhaseBarrier;

use crate::partition_index::{PartitionIndex, PartitionSnapshot, WordEntry, sort_entries};

/// Counters reported by a reducer after writing its partition.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReducerStats {
    /// Letter files written.
    pub files_written: usize,
    /// Lines written across all letter files.
    pub words_written: usize,
    /// Non-empty letters whose file could not be written.
    pub letters_skipped: usize,
}

impl AddAssign for ReducerStats {
    fn add_assign(&mut self, other: ReducerStats) {
        self.files_written += other.files_written;
        self.words_written += other.words_written;
        self.letters_skipped += other.letters_skipped;
    }
}

/// Writes the letter files of one partition into an output directory.
#[derive(Debug, Clone)]
pub struct Reducer {
    partition_id: usize,
    output_dir: PathBuf,
}

impl Reducer {
    pub fn new(partition_id: usize, output_dir: impl Into<PathBuf>) -> Reducer {
        Reducer {
            partition_id,
            output_dir: output_dir.into(),
        }
    }

    pub fn partition_id(&self) -> usize {
        self.partition_id
    }

    /// Waits for the mapping phase to end, then writes the partition.
    ///
    /// If `aborted` is set by the time the barrier opens, nothing is written.
    pub fn run(
        &self,
        partition: &PartitionIndex,
        barrier: &PhaseBarrier,
        aborted: &AtomicBool,
    ) -> ReducerStats {
        let snapshot = partition.take_after(barrier);
        if aborted.load(Ordering::Acquire) {
            log::debug!(
                "reducer {} ({}): run aborted, writing nothing",
                self.partition_id,
                snapshot.letters()
            );
            return ReducerStats::default();
        }
        self.reduce(&snapshot)
    }

    /// Writes one file per non-empty letter of `snapshot`, in alphabetical
    /// order. A file that cannot be written is logged and skipped.
    pub fn reduce(&self, snapshot: &PartitionSnapshot) -> ReducerStats {
        let mut stats = ReducerStats::default();
        for (letter, mut entries) in snapshot.entries_by_letter() {
            if entries.is_empty() {
                continue;
            }
            sort_entries(&mut entries);
            let path = self.output_dir.join(output_file_name(letter));
            match write_letter_file(&path, &entries) {
                Ok(()) => {
                    stats.files_written += 1;
                    stats.words_written += entries.len();
                }
                Err(e) => {
                    log::error!("reducer {}: {e}", self.partition_id);
                    stats.letters_skipped += 1;
                }
            }
        }
        log::debug!(
            "reducer {} ({}): wrote {} files, {} words",
            self.partition_id,
            snapshot.letters(),
            stats.files_written,
            stats.words_written
        );
        stats
    }
}

/// Name of the output file for `letter`, e.g. `a.txt`.
pub fn output_file_name(letter: u8) -> String {
    format!("{}.txt", letter as char)
}

/// Writes one output line: `word:[id1 id2 ...]` with ids ascending.
pub fn write_entry<W: Write>(out: &mut W, entry: &WordEntry<'_>) -> io::Result<()> {
    writeln!(out, "{}:[{}]", entry.word, entry.docs.iter().format(" "))
}

fn write_letter_file(path: &Path, entries: &[WordEntry<'_>]) -> Result<()> {
    let context = || format!("write {}", path.display());
    let file =
        File::create(path).map_err(|e| Error::io(format!("create {}", path.display()), e))?;
    let mut out = BufWriter::new(file);
    for entry in entries {
        write_entry(&mut out, entry).map_err(|e| Error::io(context(), e))?;
    }
    out.flush().map_err(|e| Error::io(context(), e))?;
    Ok(())
}
