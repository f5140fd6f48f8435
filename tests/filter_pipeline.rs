use fastq_short_read_filter::{FilterConfig, FilterError, Mode, run};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn fastq(reads: &[(&str, usize)]) -> String {
    reads
        .iter()
        .map(|(h, n)| format!("{h}\n{}\n+\n{}\n", "A".repeat(*n), "I".repeat(*n)))
        .collect()
}

fn write_fastq(path: &Path, reads: &[(&str, usize)]) -> PathBuf {
    fs::write(path, fastq(reads)).unwrap();
    path.to_path_buf()
}

fn headers(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .step_by(4)
        .map(str::to_string)
        .collect()
}

#[test]
fn single_end_keeps_only_long_reads() {
    let dir = tempdir().unwrap();
    let input = write_fastq(&dir.path().join("in.fastq"), &[("@r1", 20), ("@r2", 30)]);
    let out = dir.path().join("out.fastq");

    let summary = run(&FilterConfig::new(Mode::SingleEnd { forward: input }, &out)).unwrap();

    assert_eq!(summary.threshold, 25);
    assert_eq!(summary.skipped_ids, 1);
    assert_eq!(summary.outputs.len(), 1);
    assert_eq!(summary.outputs[0].path, out);
    assert_eq!(summary.outputs[0].stats.written, 1);
    assert_eq!(summary.outputs[0].stats.dropped, 1);
    assert_eq!(fs::read_to_string(&out).unwrap(), fastq(&[("@r2", 30)]));
}

#[test]
fn single_end_does_not_pair_mate_suffixes() {
    let dir = tempdir().unwrap();
    let input = write_fastq(&dir.path().join("in.fq"), &[("@r/1", 10), ("@r/2", 30)]);
    let out = dir.path().join("out.fq");

    run(&FilterConfig::new(Mode::SingleEnd { forward: input }, &out)).unwrap();
    assert_eq!(headers(&out), vec!["@r/2"]);
}

#[test]
fn split_paired_end_drops_pairs_from_both_files() {
    let dir = tempdir().unwrap();
    let forward = write_fastq(&dir.path().join("f.fastq"), &[("@p1/1", 10), ("@p2/1", 30)]);
    let reverse = write_fastq(&dir.path().join("r.fastq"), &[("@p1/2", 40), ("@p2/2", 30)]);
    let out = dir.path().join("filtered.fq");

    let summary = run(&FilterConfig::new(Mode::PairedSplit { forward, reverse }, &out)).unwrap();

    let r1 = dir.path().join("filtered.R1.fq");
    let r2 = dir.path().join("filtered.R2.fq");
    assert_eq!(summary.skipped_ids, 1);
    assert_eq!(
        summary.outputs.iter().map(|o| o.path.clone()).collect::<Vec<_>>(),
        vec![r1.clone(), r2.clone()]
    );
    assert_eq!(summary.dropped_records(), 2);
    assert_eq!(fs::read_to_string(&r1).unwrap(), fastq(&[("@p2/1", 30)]));
    assert_eq!(fs::read_to_string(&r2).unwrap(), fastq(&[("@p2/2", 30)]));
    assert!(!out.exists());
}

#[test]
fn short_reverse_mate_drops_forward_mate() {
    let dir = tempdir().unwrap();
    let forward = write_fastq(
        &dir.path().join("f.fastq"),
        &[("@a.1.1", 50), ("@a.2.1", 50), ("@a.3.1", 50)],
    );
    let reverse = write_fastq(
        &dir.path().join("r.fastq"),
        &[("@a.1.2", 50), ("@a.2.2", 12), ("@a.3.2", 50)],
    );
    let out = dir.path().join("out");

    run(&FilterConfig::new(Mode::PairedSplit { forward, reverse }, &out)).unwrap();

    assert_eq!(headers(&dir.path().join("out.R1.fastq")), vec!["@a.1.1", "@a.3.1"]);
    assert_eq!(headers(&dir.path().join("out.R2.fastq")), vec!["@a.1.2", "@a.3.2"]);
}

#[test]
fn nothing_filtered_writes_no_output() {
    let dir = tempdir().unwrap();
    let forward = write_fastq(&dir.path().join("f.fastq"), &[("@p1/1", 26), ("@p2/1", 30)]);
    let reverse = write_fastq(&dir.path().join("r.fastq"), &[("@p1/2", 40), ("@p2/2", 30)]);
    let out = dir.path().join("filtered.fastq");

    let summary = run(&FilterConfig::new(Mode::PairedSplit { forward, reverse }, &out)).unwrap();

    assert!(summary.nothing_filtered());
    assert_eq!(summary.dropped_records(), 0);
    assert!(summary.outputs.is_empty());
    assert_eq!(summary.evaluated.len(), 2);
    assert!(!dir.path().join("filtered.R1.fastq").exists());
    assert!(!dir.path().join("filtered.R2.fastq").exists());
    assert!(!out.exists());
}

#[test]
fn interleaved_drops_both_mates_in_one_pass() {
    let dir = tempdir().unwrap();
    let input = write_fastq(
        &dir.path().join("il.fastq"),
        &[("@p1/1", 30), ("@p1/2", 10), ("@p2/1", 30), ("@p2/2", 30)],
    );
    let out = dir.path().join("il.filtered.fastq");

    let cfg = FilterConfig::new(Mode::PairedInterleaved { forward: input }, &out);
    let summary = run(&cfg).unwrap();

    assert_eq!(summary.skipped_ids, 1);
    assert_eq!(summary.outputs.len(), 1);
    assert_eq!(summary.outputs[0].path, out);
    assert_eq!(fs::read_to_string(&out).unwrap(), fastq(&[("@p2/1", 30), ("@p2/2", 30)]));
}

#[test]
fn conservation_and_custom_threshold() {
    let dir = tempdir().unwrap();
    let reads: Vec<(String, usize)> = (0..40).map(|i| (format!("@r{i}"), i * 3)).collect();
    let reads: Vec<(&str, usize)> = reads.iter().map(|(h, n)| (h.as_str(), *n)).collect();
    let input = write_fastq(&dir.path().join("in.fastq"), &reads);
    let out = dir.path().join("out.fastq");

    let cfg = FilterConfig::new(Mode::SingleEnd { forward: input }, &out).with_threshold(60);
    let summary = run(&cfg).unwrap();

    let stats = summary.outputs[0].stats;
    assert_eq!(stats.processed, 40);
    assert_eq!(stats.written + stats.dropped, 40);
    // lengths 0, 3, ..., 60 are dropped
    assert_eq!(stats.dropped, 21);
    assert_eq!(summary.evaluated[0].1, 40);
    for h in headers(&out) {
        let i: usize = h[2..].parse().unwrap();
        assert!(i * 3 > 60);
    }
}

#[test]
fn rerun_on_filtered_output_drops_nothing() {
    let dir = tempdir().unwrap();
    let forward = write_fastq(&dir.path().join("f.fastq"), &[("@p1/1", 10), ("@p2/1", 30)]);
    let reverse = write_fastq(&dir.path().join("r.fastq"), &[("@p1/2", 40), ("@p2/2", 30)]);
    run(&FilterConfig::new(
        Mode::PairedSplit { forward, reverse },
        dir.path().join("once.fastq"),
    ))
    .unwrap();

    let summary = run(&FilterConfig::new(
        Mode::PairedSplit {
            forward: dir.path().join("once.R1.fastq"),
            reverse: dir.path().join("once.R2.fastq"),
        },
        dir.path().join("twice.fastq"),
    ))
    .unwrap();
    assert!(summary.nothing_filtered());
    assert!(!dir.path().join("twice.R1.fastq").exists());
}

#[test]
fn reruns_are_byte_identical() {
    let dir = tempdir().unwrap();
    let reads: Vec<(String, usize)> = (0..200)
        .map(|i| (format!("@s.{i}/1"), (i * 7) % 50))
        .collect();
    let reads: Vec<(&str, usize)> = reads.iter().map(|(h, n)| (h.as_str(), *n)).collect();
    let input = write_fastq(&dir.path().join("in.fastq"), &reads);

    let a = dir.path().join("a.fastq");
    let b = dir.path().join("b.fastq");
    run(&FilterConfig::new(Mode::PairedInterleaved { forward: input.clone() }, &a)).unwrap();
    run(&FilterConfig::new(Mode::PairedInterleaved { forward: input }, &b)).unwrap();
    assert_eq!(fs::read(&a).unwrap(), fs::read(&b).unwrap());
}

#[test]
fn malformed_groups_are_counted_not_fatal() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.fastq");
    fs::write(&input, "@r1\nACGT\n+\nIIII\nnoheader\nACGTACGT\n+\nIIIIIIII\n@r3\nA").unwrap();
    let out = dir.path().join("out.fastq");

    let cfg = FilterConfig::new(Mode::SingleEnd { forward: input }, &out).with_threshold(4);
    let summary = run(&cfg).unwrap();

    assert_eq!(summary.anomalies, 2);
    assert_eq!(summary.skipped_ids, 2);
    assert_eq!(
        fs::read_to_string(&out).unwrap(),
        "noheader\nACGTACGT\n+\nIIIIIIII\n"
    );
}

#[test]
fn missing_input_reports_the_path() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("absent.fastq");
    let err = run(&FilterConfig::new(
        Mode::SingleEnd {
            forward: missing.clone(),
        },
        dir.path().join("out.fastq"),
    ))
    .unwrap_err();

    match &err {
        FilterError::Open { path, .. } => assert_eq!(path, &missing),
        other => panic!("expected open error, got {other}"),
    }
    assert!(err.to_string().contains("absent.fastq"));
}

#[test]
fn unwritable_output_reports_the_path() {
    let dir = tempdir().unwrap();
    let input = write_fastq(&dir.path().join("in.fastq"), &[("@r1", 5)]);
    let out = dir.path().join("no_such_dir").join("out.fastq");

    let err = run(&FilterConfig::new(Mode::SingleEnd { forward: input }, &out)).unwrap_err();
    match err {
        FilterError::Create { path, .. } => assert_eq!(path, out),
        other => panic!("expected create error, got {other}"),
    }
}

#[test]
fn output_resolving_to_the_input_is_refused() {
    let dir = tempdir().unwrap();
    let input = write_fastq(&dir.path().join("reads.fastq"), &[("@r1", 5), ("@r2", 30)]);
    let before = fs::read(&input).unwrap();

    let err = run(&FilterConfig::new(
        Mode::SingleEnd {
            forward: input.clone(),
        },
        &input,
    ))
    .unwrap_err();

    match err {
        FilterError::OutputIsInput { path } => assert_eq!(path, input),
        other => panic!("expected output-is-input error, got {other}"),
    }
    assert_eq!(fs::read(&input).unwrap(), before);
}

#[test]
fn mate_output_resolving_to_an_input_is_refused() {
    let dir = tempdir().unwrap();
    let forward = write_fastq(&dir.path().join("x.R1.fastq"), &[("@p1/1", 5)]);
    let reverse = write_fastq(&dir.path().join("x_2.fastq"), &[("@p1/2", 30)]);
    let before = fs::read(&forward).unwrap();

    // "./x.fastq" still resolves onto the forward input once tagged with R1
    let out = dir.path().join(".").join("x.fastq");
    let err = run(&FilterConfig::new(
        Mode::PairedSplit {
            forward: forward.clone(),
            reverse,
        },
        out,
    ))
    .unwrap_err();

    assert!(matches!(err, FilterError::OutputIsInput { .. }));
    assert!(err.to_string().contains("x.R1.fastq"));
    assert_eq!(fs::read(&forward).unwrap(), before);
    assert!(!dir.path().join("x.R2.fastq").exists());
}
