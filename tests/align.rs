use std::fs;
use std::path::{Path, PathBuf};

use wikialign::align::{AlignFiles, KeyColumn, Normalizer};
use wikialign::io::Tsv;

fn setup(dir: &Path) -> (PathBuf, PathBuf) {
    let parsed = dir.join("de.tsv");
    let alignments = dir.join("simple-de.tsv");
    fs::write(
        &parsed,
        "7\t1\t1\tu\tHund\tSummary\tDer Hund, läuft.\n\
         7\t1\t2\tu\tHund\tSummary\tDie Katze schläft.\n\
         7\t2\t3\tu\tHund\tGeschichte\tNiemand weiß es.\n",
    )
    .unwrap();
    fs::write(
        &alignments,
        "The dog runs.\tDer Hund läuft.\t0.93\n\
         The cat sleeps.\tDie Katze schläft.\t0.88\n",
    )
    .unwrap();
    (parsed, alignments)
}

fn align(parsed: PathBuf, alignments: PathBuf, normalizer: Normalizer) -> AlignFiles {
    AlignFiles {
        parsed: vec![parsed],
        alignments: vec![alignments],
        sentence_column: 6,
        key: KeyColumn::Second,
        normalizer,
        tsv: Tsv::default(),
    }
}

#[test_log::test]
fn exact_then_fuzzy() {
    let dir = tempfile::tempdir().unwrap();
    let (parsed, alignments) = setup(dir.path());
    let out = dir.path().join("out.tsv");

    let exact = align(parsed.clone(), alignments.clone(), Normalizer::exact());
    assert_eq!(exact.run(&out).unwrap(), 1);
    assert_eq!(
        fs::read_to_string(&out).unwrap(),
        "simple-de.tsv\tDie Katze schläft.\tThe cat sleeps.\t7\t1\t2\tDie Katze schläft.\n"
    );

    let fuzzy = align(parsed, alignments, Normalizer::fuzzy());
    assert_eq!(fuzzy.run(&out).unwrap(), 2);
    let content = fs::read_to_string(&out).unwrap();
    let first = content.lines().next().unwrap();
    assert_eq!(
        first,
        "simple-de.tsv\tDer Hund läuft.\tThe dog runs.\t7\t1\t1\tDer Hund, läuft."
    );
}

#[test]
fn runs_are_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let (parsed, alignments) = setup(dir.path());
    let a = align(parsed, alignments, Normalizer::fuzzy());

    let first = dir.path().join("first.tsv");
    let second = dir.path().join("second.tsv");
    a.run(&first).unwrap();
    a.run(&second).unwrap();
    assert_eq!(fs::read(first).unwrap(), fs::read(second).unwrap());
}
