use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use lindex_index::{IndexOptions, IndexPipeline, Manifest};
use tempfile::TempDir;

/// Input files plus a manifest listing them by absolute path.
struct Corpus {
    dir: TempDir,
    files: Vec<PathBuf>,
}

impl Corpus {
    fn new(contents: &[&str]) -> Corpus {
        let dir = tempfile::tempdir().unwrap();
        let files = contents
            .iter()
            .enumerate()
            .map(|(i, text)| {
                let path = dir.path().join(format!("doc{i}.txt"));
                fs::write(&path, text).unwrap();
                path
            })
            .collect();
        Corpus { dir, files }
    }

    fn manifest(&self) -> Manifest {
        let mut text = format!("{}\n", self.files.len());
        for file in &self.files {
            text.push_str(&format!("{}\n", file.display()));
        }
        let path = self.dir.path().join("manifest.txt");
        fs::write(&path, text).unwrap();
        Manifest::from_path(path).unwrap()
    }
}

fn run(corpus: &Corpus, num_mappers: usize, num_reducers: usize) -> TempDir {
    let output = tempfile::tempdir().unwrap();
    run_into(corpus, num_mappers, num_reducers, output.path());
    output
}

fn run_into(corpus: &Corpus, num_mappers: usize, num_reducers: usize, output: &Path) {
    let pipeline = IndexPipeline::new(
        IndexOptions::new()
            .with_num_mappers(num_mappers)
            .with_num_reducers(num_reducers)
            .with_output_dir(output),
    )
    .unwrap();
    pipeline.run(corpus.manifest()).unwrap();
}

/// Every output file name mapped to its contents.
fn read_outputs(dir: &Path) -> BTreeMap<String, String> {
    fs::read_dir(dir)
        .unwrap()
        .map(|entry| {
            let entry = entry.unwrap();
            let name = entry.file_name().into_string().unwrap();
            (name, fs::read_to_string(entry.path()).unwrap())
        })
        .collect()
}

#[test]
fn test_basic_index() {
    let corpus = Corpus::new(&["Cat dog", "cat"]);
    let output = run(&corpus, 2, 2);

    let outputs = read_outputs(output.path());
    assert_eq!(outputs.len(), 2);
    assert_eq!(outputs["c.txt"], "cat:[1 2]\n");
    assert_eq!(outputs["d.txt"], "dog:[1]\n");
}

#[test]
fn test_punctuation_digits_and_case() {
    let corpus = Corpus::new(&["Don't PANIC! 42 times\x0bTimes", "panic... (dont)"]);
    let outputs = read_outputs(run(&corpus, 1, 1).path());

    assert_eq!(outputs["d.txt"], "dont:[1 2]\n");
    assert_eq!(outputs["p.txt"], "panic:[1 2]\n");
    assert_eq!(outputs["t.txt"], "times:[1]\n");
    assert_eq!(outputs.len(), 3);
}

#[test]
fn test_sort_by_frequency_then_word() {
    let corpus = Corpus::new(&["beta alpha", "beta gamma", "beta axe alpha"]);
    let outputs = read_outputs(run(&corpus, 3, 1).path());

    assert_eq!(outputs["a.txt"], "alpha:[1 3]\naxe:[3]\n");
    assert_eq!(outputs["b.txt"], "beta:[1 2 3]\n");
    assert_eq!(outputs["g.txt"], "gamma:[2]\n");
}

#[test]
fn test_missing_file_keeps_its_id() {
    let mut corpus = Corpus::new(&["apple", "apple banana"]);
    corpus
        .files
        .insert(1, corpus.dir.path().join("does-not-exist.txt"));
    let outputs = read_outputs(run(&corpus, 2, 3).path());

    assert_eq!(outputs["a.txt"], "apple:[1 3]\n");
    assert_eq!(outputs["b.txt"], "banana:[3]\n");
}

#[test]
fn test_word_repeated_in_one_file_counts_once() {
    let corpus = Corpus::new(&["echo echo ECHO echo!", "echo"]);
    let outputs = read_outputs(run(&corpus, 1, 1).path());
    assert_eq!(outputs["e.txt"], "echo:[1 2]\n");
}

#[test]
fn test_output_independent_of_thread_counts() {
    let texts: Vec<String> = (0..40)
        .map(|i| {
            let mut text = String::new();
            for j in 0..30 {
                let word: String = [b'a' + ((i * 7 + j * 3) % 26) as u8, b'a' + (j % 26) as u8]
                    .iter()
                    .map(|&b| b as char)
                    .collect();
                text.push_str(&word);
                text.push(' ');
            }
            text
        })
        .collect();
    let texts: Vec<&str> = texts.iter().map(String::as_str).collect();
    let corpus = Corpus::new(&texts);

    let baseline = read_outputs(run(&corpus, 1, 1).path());
    assert!(!baseline.is_empty());
    for (mappers, reducers) in [(4, 3), (8, 26), (2, 40), (16, 7)] {
        let outputs = read_outputs(run(&corpus, mappers, reducers).path());
        assert_eq!(outputs, baseline, "{mappers} mappers, {reducers} reducers");
    }
}

#[test]
fn test_no_files_for_absent_letters() {
    let corpus = Corpus::new(&["quiet", "zone 123"]);
    let outputs = read_outputs(run(&corpus, 2, 26).path());
    let names: Vec<_> = outputs.keys().map(String::as_str).collect();
    assert_eq!(names, ["q.txt", "z.txt"]);
}

#[test]
fn test_empty_manifest() {
    let corpus = Corpus::new(&[]);
    let outputs = read_outputs(run(&corpus, 3, 5).path());
    assert!(outputs.is_empty());
}

#[test]
fn test_existing_files_for_absent_letters_are_untouched() {
    let corpus = Corpus::new(&["apple", "yak"]);
    let output = tempfile::tempdir().unwrap();
    fs::write(output.path().join("x.txt"), "left from an earlier run\n").unwrap();
    fs::write(output.path().join("a.txt"), "stale\n").unwrap();

    run_into(&corpus, 2, 4, output.path());

    let outputs = read_outputs(output.path());
    assert_eq!(outputs["x.txt"], "left from an earlier run\n");
    assert_eq!(outputs["a.txt"], "apple:[1]\n");
    assert_eq!(outputs["y.txt"], "yak:[2]\n");
    assert_eq!(outputs.len(), 3);
}
