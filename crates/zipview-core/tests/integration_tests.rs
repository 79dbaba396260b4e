//! Integration tests for zipview-core.
//!
//! These tests verify end-to-end workflows with real archives on disk.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::fs;
use std::io::Read;
use std::sync::Arc;
use std::thread;

use tempfile::TempDir;
use zipview_core::BufferedResponse;
use zipview_core::ServeConfig;
use zipview_core::UnzipHandler;
use zipview_core::ZipviewError;
use zipview_core::fetch_entry;
use zipview_core::fetch_entry_bytes;
use zipview_core::handler::CONTENT_TYPE;
use zipview_core::read_zip_entry;
use zipview_core::security::resolve_request_path;
use zipview_core::test_utils::ZipTestBuilder;
use zipview_core::types::TrustedRoot;

fn create_results_root() -> (TempDir, TrustedRoot) {
    let temp = TempDir::new().unwrap();
    let results = ZipTestBuilder::new()
        .add_file("data.json", br#"{"a":1}"#)
        .add_file("logs/run.txt", b"step 1\nstep 2\n")
        .add_deflated_file("reports/big.csv", &b"x,y\n".repeat(10_000))
        .add_directory("logs/")
        .build();
    fs::write(temp.path().join("r.zip"), results).unwrap();
    fs::write(temp.path().join("notes.txt"), "not an archive").unwrap();
    fs::create_dir(temp.path().join("nested")).unwrap();
    fs::write(
        temp.path().join("nested/inner.zip"),
        ZipTestBuilder::new().add_file("x.txt", b"inner").build(),
    )
    .unwrap();
    let root = TrustedRoot::new(temp.path()).unwrap();
    (temp, root)
}

#[test]
fn test_resolve_then_read() {
    let (_temp, root) = create_results_root();
    let config = ServeConfig::default();

    let target = resolve_request_path(&root, "/r.zip/logs/run.txt", &config).unwrap();
    assert_eq!(target.archive_path(), root.as_path().join("r.zip"));
    assert_eq!(target.entry_path(), "logs/run.txt");

    let text = read_zip_entry(target.archive_path(), target.entry_path(), |entry| {
        let mut text = String::new();
        entry.read_to_string(&mut text)?;
        Ok::<_, ZipviewError>(text)
    })
    .unwrap();
    assert_eq!(text.as_deref(), Some("step 1\nstep 2\n"));
}

#[test]
fn test_fetch_deflated_entry() {
    let (_temp, root) = create_results_root();
    let config = ServeConfig::default();

    let bytes = fetch_entry_bytes(&root, "r.zip/reports/big.csv", &config).unwrap();
    assert_eq!(bytes.len(), 40_000);
    assert!(bytes.starts_with(b"x,y\n"));
}

#[test]
fn test_archive_must_be_first_segment() {
    let (_temp, root) = create_results_root();
    let config = ServeConfig::default();

    // Archives below the first level are not addressable.
    let result = resolve_request_path(&root, "nested/inner.zip/x.txt", &config);
    assert!(matches!(result, Err(ZipviewError::NotAnArchive { .. })));

    let result = resolve_request_path(&root, "notes.txt/anything", &config);
    assert!(matches!(result, Err(ZipviewError::NotAnArchive { .. })));
}

#[test]
fn test_traversal_never_reaches_reader() {
    let (_temp, root) = create_results_root();
    let config = ServeConfig::default();

    for path in [
        "../../etc/passwd",
        "/../r.zip/data.json",
        "r.zip/../r.zip/data.json",
        "./r.zip/data.json",
        "r.zip/./data.json",
        "//r.zip/data.json",
    ] {
        let result = fetch_entry(&root, path, &config, |_, _| -> zipview_core::Result<()> {
            panic!("reader must not run for {path}")
        });
        assert!(
            matches!(result, Err(ZipviewError::OutsideRoot { .. })),
            "expected OutsideRoot for {path}"
        );
    }
}

#[test]
fn test_redundant_slashes_reach_the_same_entry() {
    let (_temp, root) = create_results_root();
    let config = ServeConfig::default();

    for path in ["r.zip//data.json", "r.zip/data.json/", "/r.zip//logs//run.txt"] {
        let bytes = fetch_entry_bytes(&root, path, &config).unwrap();
        assert!(!bytes.is_empty(), "expected entry bytes for {path}");
    }

    let result = resolve_request_path(&root, "r.zip/", &config);
    assert!(matches!(result, Err(ZipviewError::IncompletePath { .. })));
}

#[test]
fn test_handler_end_to_end() {
    let (_temp, root) = create_results_root();
    let handler = UnzipHandler::new(root, ServeConfig::default());

    let mut response = BufferedResponse::new();
    handler.handle("GET", "/unzip/r.zip/data.json", &mut response);
    assert_eq!(response.status(), 200);
    assert_eq!(
        response.header(CONTENT_TYPE),
        Some("application/json; charset=utf-8")
    );
    assert_eq!(response.body_bytes(), br#"{"a":1}"#);

    let mut response = BufferedResponse::new();
    handler.handle("GET", "/unzip/../../etc/passwd", &mut response);
    assert_eq!(response.status(), 404);
    assert!(response.body_bytes().is_empty());
}

#[test]
fn test_custom_route_prefix() {
    let (_temp, root) = create_results_root();
    let config = ServeConfig {
        route_prefix: "/api/results/".to_string(),
        ..ServeConfig::default()
    };
    let handler = UnzipHandler::new(root, config);

    let mut response = BufferedResponse::new();
    handler.handle("GET", "/api/results/r.zip/logs/run.txt", &mut response);
    assert_eq!(response.status(), 200);
    assert_eq!(
        response.header(CONTENT_TYPE),
        Some("text/plain; charset=utf-8")
    );

    let mut response = BufferedResponse::new();
    handler.handle("GET", "/unzip/r.zip/logs/run.txt", &mut response);
    assert_eq!(response.status(), 404);
}

#[test]
fn test_concurrent_requests_share_handler() {
    let (_temp, root) = create_results_root();
    let handler = Arc::new(UnzipHandler::new(root, ServeConfig::default()));

    let workers: Vec<_> = (0..8)
        .map(|i| {
            let handler = Arc::clone(&handler);
            thread::spawn(move || {
                let path = if i % 2 == 0 {
                    "/unzip/r.zip/data.json"
                } else {
                    "/unzip/r.zip/reports/big.csv"
                };
                let mut response = BufferedResponse::new();
                handler.handle("GET", path, &mut response);
                (i, response)
            })
        })
        .collect();

    for worker in workers {
        let (i, response) = worker.join().expect("worker panicked");
        assert_eq!(response.status(), 200);
        let expected = if i % 2 == 0 { 7 } else { 40_000 };
        assert_eq!(response.body_bytes().len(), expected);
    }
}

#[cfg(unix)]
#[test]
fn test_symlinked_archive_inside_root_is_served() {
    use std::os::unix::fs::symlink;

    let (temp, root) = create_results_root();
    symlink(temp.path().join("r.zip"), temp.path().join("alias.zip")).unwrap();

    let bytes = fetch_entry_bytes(&root, "alias.zip/data.json", &ServeConfig::default()).unwrap();
    assert_eq!(bytes, br#"{"a":1}"#);
}

#[cfg(unix)]
#[test]
fn test_symlinked_archive_outside_root_is_rejected() {
    use std::os::unix::fs::symlink;

    let (temp, root) = create_results_root();
    let outside = TempDir::new().unwrap();
    let secret = outside.path().join("secret.zip");
    fs::write(
        &secret,
        ZipTestBuilder::new().add_file("key", b"secret").build(),
    )
    .unwrap();
    symlink(&secret, temp.path().join("escape.zip")).unwrap();

    let result = fetch_entry_bytes(&root, "escape.zip/key", &ServeConfig::default());
    assert!(matches!(result, Err(ZipviewError::OutsideRoot { .. })));
}
