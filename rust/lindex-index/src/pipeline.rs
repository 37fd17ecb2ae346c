//! Orchestration of the mapping and reducing phases.

use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    thread,
    time::Instant,
};

use lindex_common::{Result, error::Error};
use lindex_workflow::{
    join_handle::{JoinHandle, panic_message},
    phase_barrier::PhaseBarrier,
    worker_pool::WorkerPool,
};

use crate::{
    file_queue::FileQueue,
    manifest::Manifest,
    mapper::{Mapper, MapperStats},
    options::IndexOptions,
    partition_index::PartitionIndex,
    partitioner::LetterPartitioner,
    reducer::{Reducer, ReducerStats},
};

/// Outcome of a successful indexing run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IndexSummary {
    /// Files listed in the input.
    pub documents: usize,
    pub mapping: MapperStats,
    pub reducing: ReducerStats,
}

/// State shared by every mapper and reducer of one run.
struct JobState {
    files: FileQueue,
    partitioner: LetterPartitioner,
    partitions: Vec<PartitionIndex>,
    barrier: PhaseBarrier,
    aborted: AtomicBool,
}

impl JobState {
    /// Releases the reducers without letting them write anything.
    fn abort(&self) {
        self.aborted.store(true, Ordering::Release);
        self.barrier.signal_done();
    }
}

type ReducerThread = (usize, thread::JoinHandle<ReducerStats>);

/// Builds the per-letter index for a set of input files.
///
/// A run spawns one reducer thread per partition up front; each blocks until
/// the mapping phase completes. Mapping runs on a [`WorkerPool`] of
/// `num_mappers` threads. Once every mapper has returned, the barrier opens
/// and the reducers write their letter files concurrently. The run returns
/// after every thread has been joined.
#[derive(Debug, Clone)]
pub struct IndexPipeline {
    options: IndexOptions,
}

impl IndexPipeline {
    pub fn new(options: IndexOptions) -> Result<IndexPipeline> {
        options.validate()?;
        Ok(IndexPipeline { options })
    }

    pub fn options(&self) -> &IndexOptions {
        &self.options
    }

    /// Indexes the files listed in `manifest`.
    pub fn run(&self, manifest: Manifest) -> Result<IndexSummary> {
        self.run_files(manifest.into_file_queue())
    }

    /// Indexes the files of `files`; document ids follow queue order.
    pub fn run_files(&self, files: FileQueue) -> Result<IndexSummary> {
        self.run_with_mapper(files, |state: &JobState| {
            Mapper::new(&state.files, &state.partitioner, &state.partitions).run()
        })
    }

    /// Runs both phases, executing `map` once per mapper thread.
    fn run_with_mapper<M>(&self, files: FileQueue, map: M) -> Result<IndexSummary>
    where
        M: Fn(&JobState) -> MapperStats + Clone + Send + 'static,
    {
        let partitioner = LetterPartitioner::new(self.options.num_reducers())?;
        let partitions = partitioner
            .ranges()
            .iter()
            .copied()
            .map(PartitionIndex::new)
            .collect();
        let documents = files.len();
        let state = Arc::new(JobState {
            files,
            partitioner,
            partitions,
            barrier: PhaseBarrier::new(),
            aborted: AtomicBool::new(false),
        });

        log::info!(
            "indexing {documents} files with {} mappers and {} reducers",
            self.options.num_mappers(),
            self.options.num_reducers()
        );
        if state.partitions.len() < self.options.num_reducers() {
            log::info!(
                "{} reducers own no letters and are not started",
                self.options.num_reducers() - state.partitions.len()
            );
        }
        let start = Instant::now();

        let reducers = self.spawn_reducers(&state)?;

        let mapping = match self.run_mappers(&state, map) {
            Ok(stats) => stats,
            Err(e) => {
                state.abort();
                let _ = join_reducers(reducers);
                return Err(e);
            }
        };
        log::info!(
            "mapping done in {:?}: {} files dispensed, {} indexed, {} skipped",
            start.elapsed(),
            state.files.dispensed(),
            mapping.files_indexed,
            mapping.files_skipped
        );

        state.barrier.signal_done();
        let reducing = join_reducers(reducers)?;
        log::info!(
            "reducing done in {:?}: {} letter files, {} words",
            start.elapsed(),
            reducing.files_written,
            reducing.words_written
        );

        Ok(IndexSummary {
            documents,
            mapping,
            reducing,
        })
    }

    fn spawn_reducers(&self, state: &Arc<JobState>) -> Result<Vec<ReducerThread>> {
        let mut reducers = Vec::with_capacity(state.partitions.len());
        for partition_id in 0..state.partitions.len() {
            let name = format!("reducer-{partition_id}");
            let reducer = Reducer::new(partition_id, self.options.output_dir());
            let state_ref = state.clone();
            let spawned = thread::Builder::new().name(name.clone()).spawn(move || {
                reducer.run(
                    &state_ref.partitions[partition_id],
                    &state_ref.barrier,
                    &state_ref.aborted,
                )
            });
            match spawned {
                Ok(handle) => reducers.push((partition_id, handle)),
                Err(e) => {
                    state.abort();
                    let _ = join_reducers(reducers);
                    return Err(Error::thread_spawn(name, e));
                }
            }
        }
        Ok(reducers)
    }

    fn run_mappers<M>(&self, state: &Arc<JobState>, map: M) -> Result<MapperStats>
    where
        M: Fn(&JobState) -> MapperStats + Clone + Send + 'static,
    {
        let num_mappers = self.options.num_mappers();
        let pool = WorkerPool::with_thread_name(num_mappers, |i| format!("mapper-{i}"))
            .map_err(|e| Error::thread_spawn("mapper pool", e))?;

        let mut handles: Vec<JoinHandle<MapperStats>> = Vec::new();
        for _ in 0..num_mappers {
            let state = state.clone();
            let map = map.clone();
            let handle = pool
                .submit(move || map(&state))
                .map_err(|_| Error::pool_shutdown())?;
            handles.push(handle);
        }

        let results = JoinHandle::join_all(handles);
        pool.shutdown();

        let mut total = MapperStats::default();
        for (i, result) in results.into_iter().enumerate() {
            match result {
                Ok(stats) => total += stats,
                Err(e) => {
                    return Err(Error::task_failed(format!("mapper-task-{i}"), e.to_string()));
                }
            }
        }
        Ok(total)
    }
}

/// Joins every reducer, then reports the first failure if any.
fn join_reducers(reducers: Vec<ReducerThread>) -> Result<ReducerStats> {
    let mut total = ReducerStats::default();
    let mut failure = None;
    for (partition_id, handle) in reducers {
        match handle.join() {
            Ok(stats) => total += stats,
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                log::error!("reducer-{partition_id} panicked: {message}");
                failure.get_or_insert_with(|| {
                    Error::task_failed(format!("reducer-{partition_id}"), message)
                });
            }
        }
    }
    match failure {
        Some(e) => Err(e),
        None => Ok(total),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lindex_common::error::ErrorKind;
    use std::fs;

    #[test]
    fn test_run_small_job() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let f1 = input.path().join("f1.txt");
        let f2 = input.path().join("f2.txt");
        fs::write(&f1, "Cat dog").unwrap();
        fs::write(&f2, "cat").unwrap();

        let pipeline = IndexPipeline::new(
            IndexOptions::new()
                .with_num_mappers(2)
                .with_num_reducers(2)
                .with_output_dir(output.path()),
        )
        .unwrap();
        let summary = pipeline.run_files([f1, f2].into_iter().collect()).unwrap();

        assert_eq!(summary.documents, 2);
        assert_eq!(summary.mapping.files_indexed, 2);
        assert_eq!(summary.reducing.files_written, 2);
        assert_eq!(
            fs::read_to_string(output.path().join("c.txt")).unwrap(),
            "cat:[1 2]\n"
        );
        assert_eq!(
            fs::read_to_string(output.path().join("d.txt")).unwrap(),
            "dog:[1]\n"
        );
    }

    #[test]
    fn test_empty_input() {
        let output = tempfile::tempdir().unwrap();
        let pipeline = IndexPipeline::new(
            IndexOptions::new()
                .with_num_mappers(3)
                .with_num_reducers(30)
                .with_output_dir(output.path()),
        )
        .unwrap();
        let summary = pipeline.run_files(FileQueue::new()).unwrap();
        assert_eq!(summary, IndexSummary::default());
        assert_eq!(fs::read_dir(output.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_invalid_options() {
        assert!(IndexPipeline::new(IndexOptions::new().with_num_mappers(0)).is_err());
        assert!(IndexPipeline::new(IndexOptions::new().with_num_reducers(0)).is_err());
    }

    #[test]
    fn test_failed_mapper_aborts_without_output() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let f1 = input.path().join("f1.txt");
        fs::write(&f1, "apple banana").unwrap();

        let pipeline = IndexPipeline::new(
            IndexOptions::new()
                .with_num_mappers(2)
                .with_num_reducers(3)
                .with_output_dir(output.path()),
        )
        .unwrap();
        let err = pipeline
            .run_with_mapper([f1].into_iter().collect(), |state: &JobState| {
                // Leave data behind so an unaborted reducer would write a file.
                state.partitions[0].insert("apple", 1);
                panic!("mapper lost its input")
            })
            .unwrap_err();

        match err.into_kind() {
            ErrorKind::TaskFailed { name, message } => {
                assert!(name.starts_with("mapper-task-"));
                assert!(message.contains("mapper lost its input"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(fs::read_dir(output.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_reducers_past_alphabet_are_not_started() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let f1 = input.path().join("f1.txt");
        fs::write(&f1, "zebra apple").unwrap();

        let pipeline = IndexPipeline::new(
            IndexOptions::new()
                .with_num_mappers(1)
                .with_num_reducers(u32::MAX as usize)
                .with_output_dir(output.path()),
        )
        .unwrap();
        let summary = pipeline.run_files([f1].into_iter().collect()).unwrap();
        assert_eq!(summary.reducing.files_written, 2);
        assert_eq!(
            fs::read_to_string(output.path().join("z.txt")).unwrap(),
            "zebra:[1]\n"
        );
    }

    #[test]
    fn test_reducer_panic_is_reported() {
        let handle = thread::spawn(|| -> ReducerStats { panic!("disk on fire") });
        let ok = thread::spawn(|| ReducerStats {
            files_written: 1,
            ..Default::default()
        });
        let err = join_reducers(vec![(0, handle), (1, ok)]).unwrap_err();
        assert!(err.to_string().contains("disk on fire"));
    }
}
