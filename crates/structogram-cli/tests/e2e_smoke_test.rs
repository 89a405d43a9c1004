use std::{
    fs,
    path::{Path, PathBuf},
};

use tempfile::tempdir;

use structogram_cli::{Args, run};

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

/// Collects all .tree files from a directory
fn collect_tree_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<_> = fs::read_dir(dir)
        .map(|entries| {
            entries
                .flatten()
                .map(|entry| entry.path())
                .filter(|path| {
                    path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("tree")
                })
                .collect()
        })
        .unwrap_or_default();

    files.sort();
    files
}

fn args(inputs: Vec<PathBuf>, output: &Path) -> Args {
    Args {
        inputs,
        output: Some(output.to_path_buf()),
        config: None,
        name: None,
        log_level: "off".to_string(),
    }
}

#[test]
fn e2e_smoke_test_valid_fixtures() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let valid = collect_tree_files(&fixtures_path());
    assert!(!valid.is_empty(), "No fixtures found");

    let mut failed = Vec::new();
    for input in &valid {
        let output = temp_dir.path().join("out.nsd");
        if let Err(errors) = run(&args(vec![input.clone()], &output)) {
            failed.push((input.clone(), errors));
            continue;
        }

        let xml = fs::read_to_string(&output).expect("Output was not written");
        assert!(xml.starts_with("<?xml"), "{}", input.display());
        assert!(xml.trim_end().ends_with("</root>"), "{}", input.display());
    }

    if !failed.is_empty() {
        for (path, errors) in &failed {
            eprintln!("  - {}: {:?}", path.display(), errors);
        }
        panic!("{} valid fixture(s) failed unexpectedly", failed.len());
    }
}

#[test]
fn e2e_smoke_test_error_fixtures() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let invalid = collect_tree_files(&fixtures_path().join("errors"));
    assert!(!invalid.is_empty(), "No error fixtures found");

    for input in &invalid {
        let output = temp_dir.path().join("error.nsd");
        let result = run(&args(vec![input.clone()], &output));

        assert!(result.is_err(), "{} converted unexpectedly", input.display());
        assert!(!output.exists(), "{} left an output file", input.display());
    }
}

#[test]
fn e2e_batch_writes_one_document_per_input() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let out_dir = temp_dir.path().join("diagrams");
    let inputs = collect_tree_files(&fixtures_path());

    run(&args(inputs, &out_dir)).expect("Batch conversion failed");

    let payroll = fs::read_to_string(out_dir.join("payroll.nsd")).unwrap();
    assert!(payroll.contains(r#"<case text="&#34;#GRADE&#34;,&#34;'A'&#34;,&#34;NONE&#34;""#));
    assert!(payroll.contains(r#"<jump text="ESCAPE ROUTINE""#));
    assert!(payroll.contains(r#"<call text="PERFORM CALCULATE""#));

    let ledger = fs::read_to_string(out_dir.join("ledger.nsd")).unwrap();
    assert!(ledger.contains("&#34;  ACCOUNT := #ACCOUNT&#34;"));
    assert!(ledger.contains(r#"color="80ff80""#));
}

#[test]
fn e2e_batch_continues_after_failed_input() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let inputs = vec![
        fixtures_path().join("errors").join("indented_root.tree"),
        fixtures_path().join("payroll.tree"),
    ];

    let errors = run(&args(inputs, temp_dir.path())).unwrap_err();

    assert_eq!(errors.len(), 1);
    assert!(temp_dir.path().join("payroll.nsd").exists());
    assert!(!temp_dir.path().join("indented_root.nsd").exists());
}

#[test]
fn e2e_name_and_config_override() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");
    fs::write(
        &config_path,
        "[document]\nauthor = \"jdoe\"\nprogram_name = \"FROM-CONFIG\"\n",
    )
    .unwrap();

    let output = temp_dir.path().join("payroll.nsd");
    let args = Args {
        inputs: vec![fixtures_path().join("payroll.tree")],
        output: Some(output.clone()),
        config: Some(config_path),
        name: Some("PAYROLL".to_string()),
        log_level: "off".to_string(),
    };

    run(&args).expect("Conversion failed");

    let xml = fs::read_to_string(output).unwrap();
    assert!(xml.contains(r#"author="jdoe""#));
    assert!(xml.contains(r#"text="PAYROLL""#));
    assert!(!xml.contains("FROM-CONFIG"));
}
