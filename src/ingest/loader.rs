use anyhow::{Context, Result};
use std::path::Path;
use walkdir::WalkDir;

use crate::models::Document;

/// Read every `.txt` file directly inside `data_dir`.
///
/// Subdirectories are not descended into. Symlinked files are followed, so
/// mounted volumes whose entries are links load like plain files. Files are
/// returned in file-name order.
pub fn load_documents(data_dir: &Path) -> Result<Vec<Document>> {
    if !data_dir.is_dir() {
        anyhow::bail!("Data directory {} not found.", data_dir.display());
    }

    let mut docs = Vec::new();

    for entry in WalkDir::new(data_dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry.with_context(|| format!("Failed to list {}", data_dir.display()))?;
        if !entry.file_type().is_file() || !is_text_file(entry.path()) {
            continue;
        }

        let path = entry.path();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        docs.push(Document {
            source: path.to_string_lossy().to_string(),
            content,
        });
    }

    if docs.is_empty() {
        anyhow::bail!(
            "No documents loaded. Make sure .txt files exist in {}.",
            data_dir.display()
        );
    }

    tracing::info!("Loaded {} documents.", docs.len());
    Ok(docs)
}

fn is_text_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(".txt"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let err = load_documents(&missing).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_documents(dir.path()).unwrap_err();
        assert!(err.to_string().starts_with("No documents loaded."));
    }

    #[test]
    fn test_only_txt_files_are_loaded() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.txt"), "second").unwrap();
        std::fs::write(dir.path().join("a.txt"), "first").unwrap();
        std::fs::write(dir.path().join("notes.md"), "# skipped").unwrap();
        std::fs::write(dir.path().join("data.txt.bak"), "skipped").unwrap();

        let docs = load_documents(dir.path()).unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].content, "first");
        assert_eq!(docs[1].content, "second");
        assert!(docs[0].source.ends_with("a.txt"));
        assert!(docs[0].source.starts_with(&*dir.path().to_string_lossy()));
    }

    #[test]
    fn test_subdirectories_are_not_walked() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("nested").join("deep.txt"), "hidden").unwrap();
        std::fs::write(dir.path().join("top.txt"), "visible").unwrap();

        let docs = load_documents(dir.path()).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].content, "visible");
    }

    #[test]
    fn test_directory_named_txt_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("archive.txt")).unwrap();
        std::fs::write(dir.path().join("real.txt"), "content").unwrap();

        let docs = load_documents(dir.path()).unwrap();
        assert_eq!(docs.len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_txt_file_is_loaded() {
        let root = tempfile::tempdir().unwrap();
        let real = root.path().join("real");
        let data = root.path().join("data");
        std::fs::create_dir(&real).unwrap();
        std::fs::create_dir(&data).unwrap();
        std::fs::write(real.join("guide.txt"), "linked content").unwrap();
        std::os::unix::fs::symlink(real.join("guide.txt"), data.join("guide.txt")).unwrap();

        let docs = load_documents(&data).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].content, "linked content");
        assert!(docs[0].source.ends_with("guide.txt"));
    }
}
