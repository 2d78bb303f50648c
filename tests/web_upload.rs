//! Upload Page Tests
//!
//! Integration tests for the upload form, file listing and flash messages.

use axum::body::Bytes;
use axum::http::StatusCode;
use axum_extra::extract::cookie::Cookie;
use axum_test::multipart::{MultipartForm, Part};
use axum_test::{TestResponse, TestServer};
use tempfile::TempDir;
use upload_server::web::{create_router, AppState};
use upload_server::UploadStore;

const SECRET: &str = "test-secret-key-for-testing-only";

/// Create a test server backed by a fresh upload directory.
fn create_test_server() -> (TestServer, UploadStore, TempDir) {
    create_test_server_with_limit(None)
}

fn create_test_server_with_limit(limit: Option<usize>) -> (TestServer, UploadStore, TempDir) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let store = UploadStore::new(dir.path().join("uploads")).expect("Failed to create store");

    let router = create_router(AppState::new(store.clone(), SECRET), limit);
    let server = TestServer::new(router).expect("Failed to create test server");

    (server, store, dir)
}

/// A file part as a browser would send it.
fn file_part(name: &str, content: &'static [u8]) -> Part {
    Part::bytes(content)
        .file_name(name)
        .mime_type("application/octet-stream")
}

/// Follow the redirect of a POST, forwarding its flash cookie, and return the page.
async fn follow(server: &TestServer, response: &TestResponse) -> String {
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(response.header("location").to_str().unwrap(), "/");

    let page = server.get("/").add_cookie(response.cookie("flash")).await;
    page.assert_status_ok();
    page.text()
}

// ============================================================================
// Listing
// ============================================================================

#[tokio::test]
async fn test_get_empty_store() {
    let (server, _store, _dir) = create_test_server();

    let response = server.get("/").await;

    response.assert_status_ok();
    let body = response.text();
    assert!(body.contains("<li>(none)</li>"));
    assert!(body.contains("<input type=file name=file multiple>"));
    assert!(!body.contains("color:red"));
}

#[tokio::test]
async fn test_get_lists_existing_files_sorted() {
    let (server, store, _dir) = create_test_server();
    store.save("b.txt", b"b").await.unwrap();
    store.save("a.txt", b"a").await.unwrap();
    std::fs::create_dir(store.base_path().join("a-directory")).unwrap();

    let body = server.get("/").await.text();

    let a = body.find("<li>a.txt</li>").unwrap();
    let b = body.find("<li>b.txt</li>").unwrap();
    assert!(a < b);
    assert!(!body.contains("a-directory"));
    assert!(!body.contains("(none)"));
}

#[tokio::test]
async fn test_get_store_removed() {
    let (server, store, _dir) = create_test_server();
    std::fs::remove_dir_all(store.base_path()).unwrap();

    let response = server.get("/").await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);

    // The server keeps running once the directory is back
    std::fs::create_dir_all(store.base_path()).unwrap();
    server.get("/").await.assert_status_ok();
}

// ============================================================================
// Uploading
// ============================================================================

#[tokio::test]
async fn test_upload_single_file() {
    let (server, store, _dir) = create_test_server();

    let form = MultipartForm::new().add_part("file", file_part("hello.txt", b"Hello, World!"));
    let response = server.post("/").multipart(form).await;

    let page = follow(&server, &response).await;
    assert!(page.contains("<li>Successfully uploaded 1 file(s).</li>"));
    assert!(page.contains("<li>hello.txt</li>"));
    assert_eq!(store.load("hello.txt").await.unwrap(), b"Hello, World!");
}

#[tokio::test]
async fn test_upload_two_files_sorted() {
    let (server, store, _dir) = create_test_server();

    let form = MultipartForm::new()
        .add_part("file", file_part("zeta.txt", b"last"))
        .add_part("file", file_part("alpha.txt", b"first"));
    let response = server.post("/").multipart(form).await;

    let page = follow(&server, &response).await;
    assert!(page.contains("Successfully uploaded 2 file(s)."));
    let alpha = page.find("<li>alpha.txt</li>").unwrap();
    let zeta = page.find("<li>zeta.txt</li>").unwrap();
    assert!(alpha < zeta);
    assert_eq!(store.list().await.unwrap(), vec!["alpha.txt", "zeta.txt"]);
}

#[tokio::test]
async fn test_upload_path_traversal() {
    let (server, store, dir) = create_test_server();

    let form = MultipartForm::new().add_part("file", file_part("../../etc/passwd", b"not root"));
    let response = server.post("/").multipart(form).await;

    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(store.list().await.unwrap(), vec!["passwd"]);
    assert_eq!(store.load("passwd").await.unwrap(), b"not root");
    assert!(!dir.path().join("passwd").exists());
    assert!(!dir.path().join("etc").exists());
}

#[tokio::test]
async fn test_upload_empty_filename_counted_but_skipped() {
    let (server, store, _dir) = create_test_server();

    let form = MultipartForm::new()
        .add_part("file", file_part("kept.txt", b"kept"))
        .add_part("file", file_part("", b""));
    let response = server.post("/").multipart(form).await;

    let page = follow(&server, &response).await;
    assert!(page.contains("Successfully uploaded 2 file(s)."));
    assert_eq!(store.list().await.unwrap(), vec!["kept.txt"]);
}

#[tokio::test]
async fn test_upload_unusable_name_skipped() {
    let (server, store, _dir) = create_test_server();

    let form = MultipartForm::new().add_part("file", file_part("..", b"nowhere"));
    let response = server.post("/").multipart(form).await;

    let page = follow(&server, &response).await;
    assert!(page.contains("Successfully uploaded 1 file(s)."));
    assert!(store.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_upload_overwrites_existing() {
    let (server, store, _dir) = create_test_server();

    let form = MultipartForm::new().add_part("file", file_part("notes.txt", b"first draft, longer"));
    server.post("/").multipart(form).await.assert_status(StatusCode::SEE_OTHER);

    let form = MultipartForm::new().add_part("file", file_part("notes.txt", b"final"));
    server.post("/").multipart(form).await.assert_status(StatusCode::SEE_OTHER);

    assert_eq!(store.load("notes.txt").await.unwrap(), b"final");
    assert_eq!(store.list().await.unwrap(), vec!["notes.txt"]);
}

#[tokio::test]
async fn test_upload_escapes_names_in_listing() {
    let (server, _store, _dir) = create_test_server();

    let form = MultipartForm::new().add_part("file", file_part("<b>bold</b>.txt", b"x"));
    let response = server.post("/").multipart(form).await;

    let page = follow(&server, &response).await;
    assert!(page.contains("<li>&lt;b&gt;bold&lt;/b&gt;.txt</li>"));
}

#[tokio::test]
async fn test_upload_ignores_other_fields() {
    let (server, store, _dir) = create_test_server();

    let form = MultipartForm::new()
        .add_text("description", "ignored")
        .add_part("file", file_part("data.bin", b"\x00\x01\x02"))
        .add_part("attachment", file_part("other.bin", b"other"));
    let response = server.post("/").multipart(form).await;

    let page = follow(&server, &response).await;
    assert!(page.contains("Successfully uploaded 1 file(s)."));
    assert_eq!(store.list().await.unwrap(), vec!["data.bin"]);
}

// ============================================================================
// No file selected
// ============================================================================

#[tokio::test]
async fn test_upload_without_file_parts() {
    let (server, store, _dir) = create_test_server();

    let form = MultipartForm::new().add_text("description", "no files here");
    let response = server.post("/").multipart(form).await;

    let page = follow(&server, &response).await;
    assert!(page.contains("<li>No file selected.</li>"));
    assert!(store.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_upload_file_field_without_filename() {
    let (server, store, _dir) = create_test_server();

    let form = MultipartForm::new().add_text("file", "just text");
    let response = server.post("/").multipart(form).await;

    let page = follow(&server, &response).await;
    assert!(page.contains("No file selected."));
    assert!(store.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_upload_not_multipart() {
    let (server, store, _dir) = create_test_server();

    let response = server.post("/").text("plain body").await;

    let page = follow(&server, &response).await;
    assert!(page.contains("No file selected."));
    assert!(store.list().await.unwrap().is_empty());
}

// ============================================================================
// Flash messages
// ============================================================================

#[tokio::test]
async fn test_flash_shown_once() {
    let (server, _store, _dir) = create_test_server();

    let form = MultipartForm::new().add_part("file", file_part("once.txt", b"1"));
    let response = server.post("/").multipart(form).await;

    let page = server.get("/").add_cookie(response.cookie("flash")).await;
    assert!(page.text().contains("Successfully uploaded 1 file(s)."));

    // The page clears the cookie it consumed
    assert_eq!(page.cookie("flash").value(), "");

    let again = server.get("/").await.text();
    assert!(!again.contains("Successfully uploaded"));
    assert!(again.contains("<li>once.txt</li>"));
}

#[tokio::test]
async fn test_flash_forged_cookie_ignored() {
    let (server, _store, _dir) = create_test_server();

    let body = server
        .get("/")
        .add_cookie(Cookie::new("flash", "%5B%22forged%22%5D"))
        .await
        .text();

    assert!(!body.contains("forged"));
    assert!(!body.contains("color:red"));
}

#[tokio::test]
async fn test_flash_signed_with_other_secret_ignored() {
    let (server, _store, _dir) = create_test_server();

    let other_dir = TempDir::new().unwrap();
    let other_store = UploadStore::new(other_dir.path()).unwrap();
    let other = TestServer::new(create_router(AppState::new(other_store, "another-secret"), None))
        .unwrap();
    let response = other.post("/").text("nothing").await;

    let body = server
        .get("/")
        .add_cookie(response.cookie("flash"))
        .await
        .text();

    assert!(!body.contains("No file selected."));
}

// ============================================================================
// Errors
// ============================================================================

#[tokio::test]
async fn test_upload_write_failure_is_best_effort() {
    let (server, store, _dir) = create_test_server();
    // A directory with the target name makes the write fail
    std::fs::create_dir(store.base_path().join("blocked.txt")).unwrap();

    let form = MultipartForm::new()
        .add_part("file", file_part("blocked.txt", b"cannot land"))
        .add_part("file", file_part("fine.txt", b"lands"));
    let response = server.post("/").multipart(form).await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(store.load("fine.txt").await.unwrap(), b"lands");
}

#[tokio::test]
async fn test_upload_over_limit_rejected() {
    let (server, store, _dir) = create_test_server_with_limit(Some(64));

    let big: &'static [u8] = &[b'x'; 4096];
    let form = MultipartForm::new()
        .add_part("file", file_part("small.txt", b"tiny"))
        .add_part("file", file_part("big.bin", big));
    let response = server.post("/").multipart(form).await;

    response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
    assert!(store.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_upload_under_limit_accepted() {
    let (server, store, _dir) = create_test_server_with_limit(Some(64 * 1024));

    let form = MultipartForm::new().add_part("file", file_part("small.txt", b"tiny"));
    server
        .post("/")
        .multipart(form)
        .await
        .assert_status(StatusCode::SEE_OTHER);

    assert_eq!(store.list().await.unwrap(), vec!["small.txt"]);
}

#[tokio::test]
async fn test_upload_large_without_limit() {
    let (server, store, _dir) = create_test_server();

    // Larger than axum's default 2MB body limit
    let big: Vec<u8> = vec![0xAB; 3 * 1024 * 1024];
    let form = MultipartForm::new().add_part(
        "file",
        Part::bytes(big.clone()).file_name("large.bin"),
    );
    server
        .post("/")
        .multipart(form)
        .await
        .assert_status(StatusCode::SEE_OTHER);

    assert_eq!(store.load("large.bin").await.unwrap(), big);
}

#[tokio::test]
async fn test_upload_truncated_body_rejected() {
    let (server, store, _dir) = create_test_server();

    let body = concat!(
        "--XYZ\r\n",
        "Content-Disposition: form-data; name=\"file\"; filename=\"first.txt\"\r\n",
        "\r\n",
        "complete\r\n",
        "--XYZ\r\n",
        "Content-Disposition: form-data; name=\"file\"; filename=\"cut.txt\"\r\n",
        "\r\n",
        "no closing boundary",
    );
    let response = server
        .post("/")
        .content_type("multipart/form-data; boundary=XYZ")
        .bytes(Bytes::from_static(body.as_bytes()))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(store.list().await.unwrap().is_empty());
}
