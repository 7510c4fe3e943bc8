use std::fs;

use advert_core::{JobRecord, Summary};
use advert_engine::{
    ensure_dir, replace_file, write_json, OutputLayout, PersistError, ProgressStore,
};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

#[test]
fn ensure_dir_creates_nested_directories() {
    let temp = TempDir::new().unwrap();
    let nested = temp.path().join("out").join("pages");
    ensure_dir(&nested).unwrap();
    assert!(nested.is_dir());
    ensure_dir(&nested).unwrap();
}

#[test]
fn ensure_dir_rejects_a_regular_file() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("scraped_jobs");
    fs::write(&file_path, "x").unwrap();

    let err = ensure_dir(&file_path).unwrap_err();
    assert!(matches!(err, PersistError::Directory { .. }));
}

#[test]
fn replace_file_overwrites_the_previous_contents() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("scrape_results.json");

    replace_file(&path, b"[]").unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "[]");

    replace_file(&path, b"[1]").unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "[1]");
    assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 1);
}

#[test]
fn no_partial_file_on_error() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let result = replace_file(&file_path.join("summary.json"), b"{}");
    assert!(matches!(result, Err(PersistError::Write { .. })));
    assert!(!temp.path().join("summary.json").exists());
    assert_eq!(fs::read_to_string(&file_path).unwrap(), "x");
}

#[test]
fn write_json_is_pretty_printed() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("values.json");
    write_json(&path, &vec![1, 2]).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "[\n  1,\n  2\n]");
}

#[test]
fn saved_pages_replace_earlier_runs() {
    let temp = TempDir::new().unwrap();
    let layout = OutputLayout::new(temp.path().join("scraped_jobs"));

    let first = layout.save_page("4821", "Clerk", "<p>old</p>").unwrap();
    let second = layout.save_page("4821", "Clerk", "<p>new</p>").unwrap();
    assert_eq!(first, second);
    assert_eq!(first, layout.pages_dir().join("4821_Clerk.html"));
    assert_eq!(fs::read_to_string(&second).unwrap(), "<p>new</p>");
}

#[test]
fn layout_prepares_pages_and_attachments() {
    let temp = TempDir::new().unwrap();
    let layout = OutputLayout::new(temp.path().join("scraped_jobs"));
    layout.prepare().unwrap();

    assert!(layout.pages_dir().is_dir());
    assert!(layout.attachments_dir().is_dir());
    assert_eq!(OutputLayout::page_filename("4821", "Clerk"), "4821_Clerk.html");
    assert_eq!(
        layout.job_attachment_dir("4821", "Clerk"),
        temp.path().join("scraped_jobs").join("attachments").join("4821_Clerk")
    );
}

#[test]
fn checkpoint_rewrites_every_record() {
    let temp = TempDir::new().unwrap();
    let layout = OutputLayout::new(temp.path());
    let store = ProgressStore::new(&layout);

    let mut first = JobRecord::new(0, "https://jobs.example/1", "One");
    first.success = true;
    store.checkpoint(std::slice::from_ref(&first)).unwrap();

    let second = JobRecord::new(1, "https://jobs.example/2", "Two");
    let path = store.checkpoint(&[first.clone(), second.clone()]).unwrap();
    assert_eq!(path, layout.results_path());

    let saved: Vec<JobRecord> =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(saved, vec![first, second]);
}

#[test]
fn summary_is_written_next_to_results() {
    let temp = TempDir::new().unwrap();
    let layout = OutputLayout::new(temp.path());
    let store = ProgressStore::new(&layout);

    let mut failed = JobRecord::new(3, "https://jobs.example/bad", "Bad");
    failed.fail("Failed to fetch page: http status 404: 404 Not Found");

    let summary = store
        .write_summary(&[failed], "2024-05-01T10:00:00+08:00")
        .unwrap();
    let on_disk: Summary =
        serde_json::from_str(&fs::read_to_string(layout.summary_path()).unwrap()).unwrap();
    assert_eq!(on_disk, summary);
    assert_eq!(summary.failed_urls, vec!["https://jobs.example/bad".to_string()]);
}
