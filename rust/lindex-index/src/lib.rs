//! Per-letter inverted word index built by a two-phase map-reduce pipeline.
//!
//! ## Architecture
//!
//! 1. **Setup**: the [`Manifest`] is loaded into a [`FileQueue`], which hands
//!    out each file exactly once together with its document id (its 1-based
//!    position in the manifest).
//! 2. **Mapping**: a [`WorkerPool`](lindex_workflow::worker_pool::WorkerPool)
//!    runs one [`Mapper`] per worker. Mappers pull files from the queue,
//!    extract the unique words of each file and upsert `(word, doc id)` into
//!    the [`PartitionIndex`] that owns the word's first letter, as decided by
//!    the [`LetterPartitioner`].
//! 3. **Barrier**: once the pool has drained and every mapper has returned,
//!    the orchestrator opens the [`PhaseBarrier`](lindex_workflow::phase_barrier::PhaseBarrier).
//! 4. **Reducing**: one [`Reducer`] thread per partition, blocked on the
//!    barrier until now, takes ownership of its partition's words, sorts them
//!    and writes one `<letter>.txt` file per non-empty letter.
//!
//! [`IndexPipeline`] wires these together.

pub mod document;
pub mod file_queue;
pub mod manifest;
pub mod mapper;
pub mod options;
pub mod partition_index;
pub mod partitioner;
pub mod pipeline;
pub mod reducer;

pub use document::{DocId, Document};
pub use file_queue::FileQueue;
pub use manifest::Manifest;
pub use mapper::{Mapper, MapperStats};
pub use options::IndexOptions;
pub use partition_index::{PartitionIndex, PartitionSnapshot, WordEntry};
pub use partitioner::{LetterPartitioner, LetterRange};
pub use pipeline::{IndexPipeline, IndexSummary};
pub use reducer::{Reducer, ReducerStats};
