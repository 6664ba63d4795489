use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tempfile::NamedTempFile;

use crate::core::article::Article;

const JSON_INDENT: &[u8] = b"    ";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("failed to create directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to replace artifact: {0}")]
    Persist(#[source] std::io::Error),
}

/// Replaces the artifact at `path` with `articles` as 4-space indented JSON.
///
/// The payload goes to a temporary file next to the destination and is then
/// renamed over it, so readers see either the old or the new file. The
/// temporary file is removed on every failure path.
pub fn persist_articles(articles: &[Article], path: &Path) -> Result<(), StorageError> {
    let directory = parent_directory(path);
    fs::create_dir_all(directory).map_err(|source| StorageError::CreateDir {
        path: directory.to_path_buf(),
        source,
    })?;

    let payload = to_indented_json(articles)?;
    let mut staged = NamedTempFile::new_in(directory)?;
    staged.write_all(&payload)?;
    staged.as_file().sync_all()?;
    // Dropping the returned temp file removes it before the error leaves.
    staged
        .persist(path)
        .map_err(|error| StorageError::Persist(error.error))?;
    Ok(())
}

pub fn load_articles(path: &Path) -> Result<Vec<Article>, StorageError> {
    let raw = fs::read(path)?;
    Ok(serde_json::from_slice(&raw)?)
}

fn to_indented_json(articles: &[Article]) -> Result<Vec<u8>, serde_json::Error> {
    let mut buffer = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(JSON_INDENT));
    articles.serialize(&mut serializer)?;
    Ok(buffer)
}

fn parent_directory(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(index: usize) -> Article {
        Article {
            title: format!("Headline {index}"),
            link: format!("https://news.example.com/{index}"),
            description: "Café & clay".to_string(),
            published: "Mon, 01 Jan 2024 15:05:00 +0000".to_string(),
            pub_date_formatted: "Jan 1, 2024, 3:05 PM".to_string(),
        }
    }

    #[test]
    fn writes_four_space_indented_array() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("news.json");

        persist_articles(&[article(1)], &path).expect("persist should succeed");

        let written = fs::read_to_string(&path).expect("artifact readable");
        assert!(written.starts_with("[\n    {\n        \"title\": \"Headline 1\""));
        assert!(written.contains("\"pubDate_formatted\": \"Jan 1, 2024, 3:05 PM\""));
        assert!(written.contains("Café & clay"));
    }

    #[test]
    fn creates_missing_directories() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("static").join("nested").join("news.json");

        persist_articles(&[], &path).expect("persist should succeed");

        assert_eq!(fs::read_to_string(&path).expect("artifact readable"), "[]");
    }

    #[test]
    fn replaces_previous_content() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("news.json");

        persist_articles(&[article(1), article(2), article(3)], &path).expect("first write");
        persist_articles(&[article(9)], &path).expect("second write");

        let loaded = load_articles(&path).expect("artifact loads");
        assert_eq!(loaded, vec![article(9)]);
    }

    #[test]
    fn repeated_writes_are_byte_identical() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("news.json");
        let articles = vec![article(1), article(2)];

        persist_articles(&articles, &path).expect("first write");
        let first = fs::read(&path).expect("first read");
        persist_articles(&articles, &path).expect("second write");
        let second = fs::read(&path).expect("second read");

        assert_eq!(first, second);
    }

    #[test]
    fn round_trips_all_fields() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("news.json");
        let articles = vec![article(1), article(2)];

        persist_articles(&articles, &path).expect("persist");

        assert_eq!(load_articles(&path).expect("load"), articles);
    }

    #[test]
    fn failed_replace_leaves_no_temporary_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("news.json");
        fs::create_dir(&path).expect("occupy destination with a directory");

        let error = persist_articles(&[article(1)], &path).expect_err("rename onto a directory fails");
        assert!(matches!(error, StorageError::Persist(_)));

        // The error is still alive here; the staged file must already be gone.
        let entries: Vec<_> = fs::read_dir(dir.path())
            .expect("list dir")
            .map(|entry| entry.expect("dir entry").file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("news.json")]);
        drop(error);
    }

    #[test]
    fn reports_directory_creation_failure() {
        let dir = tempfile::tempdir().expect("temp dir");
        let blocker = dir.path().join("static");
        fs::write(&blocker, b"not a directory").expect("write blocker");

        let error = persist_articles(&[article(1)], &blocker.join("news.json"))
            .expect_err("parent is a file");
        assert!(matches!(error, StorageError::CreateDir { .. }));
    }
}
