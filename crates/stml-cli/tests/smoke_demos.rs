use std::fs;
use std::process::Command;

fn demos_root() -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("demos")
}

#[test]
fn run_executes_every_demo_document() {
    let bin = env!("CARGO_BIN_EXE_stml");
    let mut documents = fs::read_dir(demos_root())
        .expect("demos root must exist")
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "stml"))
        .collect::<Vec<_>>();
    documents.sort();

    assert!(!documents.is_empty(), "expected demo documents");

    for document in documents {
        let output = Command::new(bin)
            .arg("run")
            .arg("--file")
            .arg(&document)
            .output()
            .expect("cli should execute");

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !output.status.success() {
            panic!(
                "demo {} failed\nstdout:\n{}\nstderr:\n{}",
                document.display(),
                stdout,
                String::from_utf8_lossy(&output.stderr)
            );
        }
        assert!(
            stdout.starts_with("RESULT:OK"),
            "stdout missing RESULT:OK for {}",
            document.display()
        );
    }
}

#[test]
fn batch_reports_documents_in_order() {
    let output = Command::new(env!("CARGO_BIN_EXE_stml"))
        .arg("batch")
        .arg("--scripts-dir")
        .arg(demos_root())
        .output()
        .expect("cli should execute");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let headers = stdout
        .lines()
        .filter(|line| line.starts_with("DOCUMENT:"))
        .collect::<Vec<_>>();
    let mut sorted = headers.clone();
    sorted.sort();
    assert!(!headers.is_empty());
    assert_eq!(headers, sorted);
}

#[test]
fn failing_document_reports_error_protocol() {
    let dir = std::env::temp_dir().join(format!(
        "stml-rs-smoke-error-{}",
        std::process::id()
    ));
    fs::create_dir_all(&dir).expect("temp dir");
    let file = dir.join("broken.stml");
    fs::write(&file, "scope a\nfinal a\nset a.k = 1\nset a.k = 2\n").expect("write");

    let output = Command::new(env!("CARGO_BIN_EXE_stml"))
        .arg("run")
        .arg("--file")
        .arg(&file)
        .output()
        .expect("cli should execute");
    assert_eq!(output.status.code(), Some(1));

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines = stdout.lines().collect::<Vec<_>>();
    assert_eq!(lines[0], "RESULT:ERROR");
    assert_eq!(lines[1], "ERROR_CODE:SCOPE_FINAL_OVERRIDE");
    assert_eq!(lines[2], "ERROR_LINE:4");
    assert!(lines[3].starts_with("ERROR_MSG_JSON:\""));
}
