use std::fs;
use std::path::{Path, PathBuf};

use stml_core::StmlError;
use walkdir::WalkDir;

use crate::{
    map_cli_source_path, map_cli_source_read, map_cli_source_scan, map_cli_source_walk,
    LoadedDocument,
};

const DOCUMENT_EXTENSION: &str = ".stml";

pub(crate) fn load_document_file(file: &str) -> Result<LoadedDocument, StmlError> {
    let path = resolve_path(file)?;
    if !path.is_file() {
        return Err(StmlError::io(
            "CLI_SOURCE_NOT_FOUND",
            format!("file does not exist: {}", path.display()),
        ));
    }

    let source = fs::read_to_string(&path).map_err(map_cli_source_read)?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| file.to_string());
    Ok(LoadedDocument { name, source })
}

pub(crate) fn load_documents_by_scripts_dir(
    scripts_dir: &str,
) -> Result<Vec<LoadedDocument>, StmlError> {
    let scripts_root = resolve_scripts_dir(scripts_dir)?;
    read_documents_from_dir(&scripts_root)
}

fn resolve_path(raw: &str) -> Result<PathBuf, StmlError> {
    let path = PathBuf::from(raw);
    if path.is_absolute() {
        return Ok(path);
    }
    Ok(std::env::current_dir()
        .map_err(map_cli_source_path)?
        .join(path))
}

pub(crate) fn resolve_scripts_dir(scripts_dir: &str) -> Result<PathBuf, StmlError> {
    let absolute = resolve_path(scripts_dir)?;

    if !absolute.exists() {
        return Err(StmlError::io(
            "CLI_SOURCE_NOT_FOUND",
            format!("scripts-dir does not exist: {}", absolute.display()),
        ));
    }

    if !absolute.is_dir() {
        return Err(StmlError::io(
            "CLI_SOURCE_NOT_DIR",
            format!("scripts-dir is not a directory: {}", absolute.display()),
        ));
    }

    Ok(absolute)
}

/// Reads every `.stml` file under `scripts_dir`, ordered by relative path.
pub(crate) fn read_documents_from_dir(
    scripts_dir: &Path,
) -> Result<Vec<LoadedDocument>, StmlError> {
    let mut documents = Vec::new();

    for entry in WalkDir::new(scripts_dir)
        .follow_links(false)
        .sort_by_file_name()
    {
        let entry = entry.map_err(map_cli_source_walk)?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        if !path.to_string_lossy().ends_with(DOCUMENT_EXTENSION) {
            continue;
        }

        let name = path
            .strip_prefix(scripts_dir)
            .map_err(map_cli_source_scan)?
            .to_string_lossy()
            .replace('\\', "/");
        let source = fs::read_to_string(path).map_err(map_cli_source_read)?;
        documents.push(LoadedDocument { name, source });
    }

    if documents.is_empty() {
        return Err(StmlError::io(
            "CLI_SOURCE_EMPTY",
            format!("No .stml files under {}", scripts_dir.display()),
        ));
    }

    documents.sort_by(|left, right| left.name.cmp(&right.name));
    Ok(documents)
}

#[cfg(test)]
mod source_loader_tests {
    use super::*;
    use crate::cli_test_support::*;
    use stml_core::StmlErrorKind;

    #[test]
    fn resolve_scripts_dir_validates_existence_and_directory() {
        let missing = temp_path("missing-dir");
        let error = resolve_scripts_dir(missing.to_string_lossy().as_ref())
            .expect_err("missing path should fail");
        assert_eq!(error.code, "CLI_SOURCE_NOT_FOUND");

        let file_path = temp_path("plain-file");
        write_file(&file_path, "x");
        let error = resolve_scripts_dir(file_path.to_string_lossy().as_ref())
            .expect_err("file path should fail");
        assert_eq!(error.code, "CLI_SOURCE_NOT_DIR");
        assert_eq!(error.kind, StmlErrorKind::Io);
    }

    #[test]
    fn read_documents_from_dir_filters_and_sorts() {
        let root = temp_path("scripts-dir");
        write_file(&root.join("b.stml"), "get b");
        write_file(&root.join("nested").join("a.stml"), "get a");
        write_file(&root.join("a.stml"), "get a");
        write_file(&root.join("notes.txt"), "ignored");

        let documents = read_documents_from_dir(&root).expect("scan should pass");
        let names = documents
            .iter()
            .map(|document| document.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["a.stml", "b.stml", "nested/a.stml"]);
        assert_eq!(documents[1].source, "get b");
    }

    #[test]
    fn read_documents_from_dir_errors_when_no_documents() {
        let root = temp_path("empty-scripts-dir");
        write_file(&root.join("readme.txt"), "not source");
        let error = read_documents_from_dir(&root).expect_err("empty set should fail");
        assert_eq!(error.code, "CLI_SOURCE_EMPTY");
    }

    #[test]
    fn load_document_file_reads_single_files() {
        let path = temp_path("single").join("doc.stml");
        write_file(&path, "scope a");
        let document =
            load_document_file(&path.to_string_lossy()).expect("file should load");
        assert_eq!(document.name, "doc.stml");
        assert_eq!(document.source, "scope a");

        let error = load_document_file(&temp_path("absent.stml").to_string_lossy())
            .expect_err("missing file");
        assert_eq!(error.code, "CLI_SOURCE_NOT_FOUND");
    }
}
