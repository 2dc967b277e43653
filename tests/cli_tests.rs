//! End-to-end tests of the commands that need no external tools.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn ortho_pipeline() -> Command {
    Command::cargo_bin("ortho-pipeline").unwrap()
}

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

/// One nhmmer `--tblout` row with the E-value in column 13
fn tbl_row(target: &str, evalue: &str) -> String {
    format!("{target} - ABHD11 - 1 300 10 310 1 320 900 + {evalue} 120.5 0.2 -\n")
}

const ASSEMBLY: &str = "\
>TRINITY_DN1_c0_g1_i1 len=6 path=[0:0-5]
ATGCCC
>TRINITY_DN2_c0_g1_i1 len=6
TTTAAA
";

#[test]
fn test_best_hit_to_stdout() {
    let dir = TempDir::new().unwrap();
    let table = write(
        dir.path(),
        "hits.tbl",
        &format!(
            "# target name ...\n{}{}",
            tbl_row("TRINITY_DN2_c0_g1_i1", "3.1e-12"),
            tbl_row("TRINITY_DN1_c0_g1_i1", "2.5e-40"),
        ),
    );
    let assembly = write(dir.path(), "assembly.fasta", ASSEMBLY);

    ortho_pipeline()
        .arg("best-hit")
        .arg(&table)
        .arg(&assembly)
        .assert()
        .success()
        .stdout(predicate::eq(
            ">TRINITY_DN1_c0_g1_i1 [Best Hit E=2.5e-40]\nATGCCC\n",
        ));
}

#[test]
fn test_best_hit_to_file() {
    let dir = TempDir::new().unwrap();
    let table = write(dir.path(), "hits.tbl", &tbl_row("TRINITY_DN2_c0_g1_i1", "0"));
    let assembly = write(dir.path(), "assembly.fasta", ASSEMBLY);
    let output = dir.path().join("best_hit.fasta");

    ortho_pipeline()
        .arg("best-hit")
        .arg(&table)
        .arg(&assembly)
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Best hit: TRINITY_DN2_c0_g1_i1 [Best Hit E=0.0]",
        ));

    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        ">TRINITY_DN2_c0_g1_i1 [Best Hit E=0.0]\nTTTAAA\n"
    );
}

#[test]
fn test_best_hit_nothing_found() {
    let dir = TempDir::new().unwrap();
    let table = write(dir.path(), "hits.tbl", "# only comments\n#\n");
    let assembly = write(dir.path(), "assembly.fasta", ASSEMBLY);

    ortho_pipeline()
        .arg("best-hit")
        .arg(&table)
        .arg(&assembly)
        .assert()
        .failure()
        .stderr(predicate::str::contains("no significant hits"));
}

#[test]
fn test_best_hit_missing_from_sequences() {
    let dir = TempDir::new().unwrap();
    let table = write(dir.path(), "hits.tbl", &tbl_row("TRINITY_DN9_c0_g1_i1", "1e-30"));
    let assembly = write(dir.path(), "assembly.fasta", ASSEMBLY);

    ortho_pipeline()
        .arg("best-hit")
        .arg(&table)
        .arg(&assembly)
        .assert()
        .failure()
        .stderr(predicate::str::contains("hit not present in sequence source"));
}

#[test]
fn test_concat_tags_headers_with_folder_suffix() {
    let dir = TempDir::new().unwrap();
    let gene = "ABHD11_ENSG00000106077_aln_tr_best_hit.fasta";
    let sd = dir.path().join("SD_trinity.Trinity.cdhit_hits");
    let hf = dir.path().join("HF_trinity.Trinity.cdhit_hits");
    write(&sd, gene, ">TRINITY_DN1_c0_g1_i1 [Best Hit E=1e-40]\nATGCCC\n");
    write(&hf, gene, ">TRINITY_DN7_c0_g1_i1 [Best Hit E=2e-10]\nATGCCA\n");
    let output = dir.path().join("combined_homologs");

    ortho_pipeline()
        .arg("concat")
        .arg(&sd)
        .arg(&hf)
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("concat: 1 files (1 ok"));

    assert_eq!(
        fs::read_to_string(output.join("ABHD11_ENSG00000106077.fasta")).unwrap(),
        ">TRINITY_DN1_c0_g1_i1_SD\nATGCCC\n>TRINITY_DN7_c0_g1_i1_HF\nATGCCA\n"
    );
}

#[test]
fn test_concat_missing_folder() {
    let dir = TempDir::new().unwrap();

    ortho_pipeline()
        .arg("concat")
        .arg(dir.path().join("nope_hits"))
        .arg("-o")
        .arg(dir.path().join("out"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input path does not exist"));
}

#[test]
fn test_merge_json_report() {
    let dir = TempDir::new().unwrap();
    let ensembl = dir.path().join("Downloads");
    let homologs = dir.path().join("combined_homologs");
    write(&ensembl, "ABHD11_ENSG00000106077_fishes.fasta", ">ENSDART1\nATGCCC");
    write(&ensembl, "MISSING_ENSG00000000001_fishes.fasta", ">ENSDART2\nATG\n");
    write(&homologs, "ABHD11_ENSG00000106077.fasta", ">TRINITY_DN1_SD\nATGCCA\n");
    let output = dir.path().join("merged");

    ortho_pipeline()
        .args(["--format", "json", "merge"])
        .arg(&ensembl)
        .arg(&homologs)
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"stage\": \"merge\""))
        .stdout(predicate::str::contains("\"skipped\": 1"))
        .stdout(predicate::str::contains("missing homolog file MISSING_ENSG00000000001.fasta"));

    assert_eq!(
        fs::read_to_string(output.join("ABHD11_ENSG00000106077.fasta")).unwrap(),
        ">ENSDART1\nATGCCC\n>TRINITY_DN1_SD\nATGCCA\n"
    );
}

#[test]
fn test_merge_tsv_report() {
    let dir = TempDir::new().unwrap();
    let ensembl = dir.path().join("Downloads");
    let homologs = dir.path().join("combined_homologs");
    write(&ensembl, "G_ID_fishes.fa", ">a\nA\n");
    write(&homologs, "G_ID.fasta", ">b\nC\n");

    ortho_pipeline()
        .args(["-f", "tsv", "merge"])
        .arg(&ensembl)
        .arg(&homologs)
        .arg("--output-dir")
        .arg(dir.path().join("out"))
        .assert()
        .success()
        .stdout(predicate::str::contains("stage\tfile\toutcome\tmessage"))
        .stdout(predicate::str::contains("merge\tG_ID_fishes.fa\tok\tG_ID.fasta"));
}

#[test]
fn test_fetch_dedupes_list_and_reports_unreachable_server() {
    let dir = TempDir::new().unwrap();
    let genes = write(
        dir.path(),
        "gene_ids.txt",
        "ENSG00000106077\nENSG00000000001\n\nENSG00000106077\n",
    );
    let unique = dir.path().join("unique_gene_list.txt");

    // Nothing listens on the discard port, so every request fails fast
    ortho_pipeline()
        .args(["-f", "tsv", "fetch"])
        .arg(&genes)
        .arg("-o")
        .arg(dir.path().join("Downloads"))
        .arg("--unique-list")
        .arg(&unique)
        .args(["--server", "http://127.0.0.1:9", "--timeout", "5"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("fetch\tENSG00000106077\tFAILED"))
        .stderr(predicate::str::contains("2 of 2 files failed in stage 'fetch'"));

    assert_eq!(
        fs::read_to_string(&unique).unwrap(),
        "ENSG00000106077\nENSG00000000001\n"
    );
    assert!(dir.path().join("Downloads").is_dir());
}
