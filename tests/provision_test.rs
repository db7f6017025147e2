//! Provisioning against a mock release host

mod common;

use common::{VERSION, archive_path, dir_entries, linux_amd64, settings_for, zip_archive};
use sha2::{Digest, Sha256};
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use ws4sql_launcher::provisioner::{Arch, Error, Os, Platform, Provisioner};

const EXECUTABLE: &str = "#!/bin/sh\necho ws4sql\n";

async fn serve_archive(server: &MockServer, platform: Platform, body: Vec<u8>, times: u64) {
    Mock::given(method("GET"))
        .and(path(archive_path(platform)))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body))
        .expect(times)
        .mount(server)
        .await;
}

#[tokio::test]
async fn second_run_reuses_cached_executable() {
    let server = MockServer::start().await;
    let cache = TempDir::new().unwrap();
    serve_archive(&server, linux_amd64(), zip_archive(&[("ws4sql", EXECUTABLE)]), 1).await;

    let provisioner = Provisioner::new(settings_for(&server, cache.path()).build().unwrap()).unwrap();
    let first = provisioner.ensure_executable().await.unwrap();
    let second = provisioner.ensure_executable().await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first, cache.path().join(format!("v{VERSION}")).join("ws4sql"));
    assert_eq!(std::fs::read_to_string(&first).unwrap(), EXECUTABLE);
    // MockServer verifies `.expect(1)` on drop
}

#[tokio::test]
async fn fresh_provisioner_on_same_cache_does_not_download() {
    let server = MockServer::start().await;
    let cache = TempDir::new().unwrap();
    serve_archive(&server, linux_amd64(), zip_archive(&[("ws4sql", EXECUTABLE)]), 1).await;

    let settings = settings_for(&server, cache.path()).build().unwrap();
    Provisioner::new(settings.clone())
        .unwrap()
        .ensure_executable()
        .await
        .unwrap();
    Provisioner::new(settings)
        .unwrap()
        .ensure_executable()
        .await
        .unwrap();
}

#[cfg(unix)]
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_first_runs_download_once() {
    let server = MockServer::start().await;
    let cache = TempDir::new().unwrap();
    Mock::given(method("GET"))
        .and(path(archive_path(linux_amd64())))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(zip_archive(&[("ws4sql", EXECUTABLE)]))
                .set_delay(Duration::from_millis(300)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let first = Provisioner::new(settings_for(&server, cache.path()).build().unwrap()).unwrap();
    let second = Provisioner::new(settings_for(&server, cache.path()).build().unwrap()).unwrap();
    let (a, b) = tokio::join!(first.ensure_executable(), second.ensure_executable());
    let (a, b) = (a.unwrap(), b.unwrap());

    assert_eq!(a, b);
    assert_eq!(std::fs::read_to_string(&a).unwrap(), EXECUTABLE);
    assert_eq!(
        dir_entries(first.location().dir()),
        vec![".ws4sql.lock", "ws4sql", "ws4sql.sha256"]
    );
}

#[cfg(unix)]
#[tokio::test]
async fn extracted_executable_is_world_executable() {
    use std::os::unix::fs::PermissionsExt;

    let server = MockServer::start().await;
    let cache = TempDir::new().unwrap();
    serve_archive(&server, linux_amd64(), zip_archive(&[("ws4sql", EXECUTABLE)]), 1).await;

    let provisioner = Provisioner::new(settings_for(&server, cache.path()).build().unwrap()).unwrap();
    let path = provisioner.ensure_executable().await.unwrap();

    let mode = std::fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o755);
}

#[tokio::test]
async fn follows_302_redirect_to_archive() {
    let server = MockServer::start().await;
    let cache = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path(archive_path(linux_amd64())))
        .respond_with(
            ResponseTemplate::new(302)
                .insert_header("Location", format!("{}/assets/12345", server.uri())),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/assets/12345"))
        .respond_with(
            ResponseTemplate::new(200).set_body_bytes(zip_archive(&[("ws4sql", EXECUTABLE)])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let provisioner = Provisioner::new(settings_for(&server, cache.path()).build().unwrap()).unwrap();
    let path = provisioner.ensure_executable().await.unwrap();

    assert_eq!(std::fs::read_to_string(path).unwrap(), EXECUTABLE);
}

#[tokio::test]
async fn follows_relative_redirect_chain() {
    let server = MockServer::start().await;
    let cache = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path(archive_path(linux_amd64())))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/hop"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/hop"))
        .respond_with(ResponseTemplate::new(307).insert_header("Location", "/final.zip"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/final.zip"))
        .respond_with(
            ResponseTemplate::new(200).set_body_bytes(zip_archive(&[("ws4sql", EXECUTABLE)])),
        )
        .mount(&server)
        .await;

    let provisioner = Provisioner::new(settings_for(&server, cache.path()).build().unwrap()).unwrap();
    let path = provisioner.ensure_executable().await.unwrap();

    assert_eq!(std::fs::read_to_string(path).unwrap(), EXECUTABLE);
}

#[tokio::test]
async fn redirect_loop_stops_at_limit() {
    let server = MockServer::start().await;
    let cache = TempDir::new().unwrap();
    let archive = archive_path(linux_amd64());

    // Initial request plus two permitted hops
    Mock::given(method("GET"))
        .and(path(archive.clone()))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", archive.as_str()))
        .expect(3)
        .mount(&server)
        .await;

    let settings = settings_for(&server, cache.path())
        .max_redirects(2)
        .build()
        .unwrap();
    let provisioner = Provisioner::new(settings).unwrap();
    let err = provisioner.ensure_executable().await.unwrap_err();

    assert!(
        matches!(err, Error::TooManyRedirects { limit: 2, .. }),
        "unexpected error: {err}"
    );
    assert!(!provisioner.executable_path().exists());
}

#[tokio::test]
async fn only_the_executable_is_written() {
    let server = MockServer::start().await;
    let cache = TempDir::new().unwrap();
    let archive = zip_archive(&[
        ("README.md", "readme"),
        ("LICENSE", "license"),
        ("docs/", ""),
        ("docs/ws4sql.md", "manual"),
        ("ws4sql-v0.17dev2-linux-amd64/ws4sql", EXECUTABLE),
        ("ws4sql.yaml", "config"),
    ]);
    serve_archive(&server, linux_amd64(), archive, 1).await;

    let provisioner = Provisioner::new(settings_for(&server, cache.path()).build().unwrap()).unwrap();
    let path = provisioner.ensure_executable().await.unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), EXECUTABLE);
    assert_eq!(
        dir_entries(provisioner.location().dir()),
        vec![".ws4sql.lock", "ws4sql", "ws4sql.sha256"]
    );
}

#[tokio::test]
async fn first_matching_entry_wins() {
    let server = MockServer::start().await;
    let cache = TempDir::new().unwrap();
    let archive = zip_archive(&[("a/ws4sql", "first"), ("b/ws4sql", "second")]);
    serve_archive(&server, linux_amd64(), archive, 1).await;

    let provisioner = Provisioner::new(settings_for(&server, cache.path()).build().unwrap()).unwrap();
    let path = provisioner.ensure_executable().await.unwrap();

    assert_eq!(std::fs::read_to_string(path).unwrap(), "first");
}

#[tokio::test]
async fn archive_without_executable_fails_cleanly() {
    let server = MockServer::start().await;
    let cache = TempDir::new().unwrap();
    serve_archive(&server, linux_amd64(), zip_archive(&[("README.md", "readme")]), 1).await;

    let provisioner = Provisioner::new(settings_for(&server, cache.path()).build().unwrap()).unwrap();
    let err = provisioner.ensure_executable().await.unwrap_err();

    assert!(
        matches!(&err, Error::ExecutableNotFound { name, .. } if name == "ws4sql"),
        "unexpected error: {err}"
    );
    // No executable, no leftover temporary archive
    assert_eq!(dir_entries(provisioner.location().dir()), vec![".ws4sql.lock"]);
}

#[tokio::test]
async fn corrupt_archive_is_an_archive_error() {
    let server = MockServer::start().await;
    let cache = TempDir::new().unwrap();
    serve_archive(&server, linux_amd64(), b"<html>not a zip</html>".to_vec(), 1).await;

    let provisioner = Provisioner::new(settings_for(&server, cache.path()).build().unwrap()).unwrap();
    let err = provisioner.ensure_executable().await.unwrap_err();

    assert!(matches!(err, Error::Archive(_)), "unexpected error: {err}");
    assert!(!provisioner.executable_path().exists());
}

#[tokio::test]
async fn http_error_status_is_reported() {
    let server = MockServer::start().await;
    let cache = TempDir::new().unwrap();
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let provisioner = Provisioner::new(settings_for(&server, cache.path()).build().unwrap()).unwrap();
    let err = provisioner.ensure_executable().await.unwrap_err();

    assert!(
        matches!(err, Error::HttpStatus { status: 404, .. }),
        "unexpected error: {err}"
    );
}

#[tokio::test]
async fn pinned_checksum_must_match() {
    let server = MockServer::start().await;
    let cache = TempDir::new().unwrap();
    serve_archive(&server, linux_amd64(), zip_archive(&[("ws4sql", EXECUTABLE)]), 1).await;

    let settings = settings_for(&server, cache.path())
        .expected_sha256("0".repeat(64))
        .build()
        .unwrap();
    let provisioner = Provisioner::new(settings).unwrap();
    let err = provisioner.ensure_executable().await.unwrap_err();

    assert!(
        matches!(err, Error::ChecksumMismatch { .. }),
        "unexpected error: {err}"
    );
    assert!(!provisioner.executable_path().exists());
}

#[tokio::test]
async fn pinned_checksum_accepts_matching_archive() {
    let server = MockServer::start().await;
    let cache = TempDir::new().unwrap();
    let archive = zip_archive(&[("ws4sql", EXECUTABLE)]);
    let digest = hex::encode(Sha256::digest(&archive)).to_uppercase();
    serve_archive(&server, linux_amd64(), archive, 1).await;

    let settings = settings_for(&server, cache.path())
        .expected_sha256(digest)
        .build()
        .unwrap();
    let path = Provisioner::new(settings)
        .unwrap()
        .ensure_executable()
        .await
        .unwrap();

    assert_eq!(std::fs::read_to_string(path).unwrap(), EXECUTABLE);
}

#[tokio::test]
async fn tampered_cache_is_downloaded_again() {
    let server = MockServer::start().await;
    let cache = TempDir::new().unwrap();
    serve_archive(&server, linux_amd64(), zip_archive(&[("ws4sql", EXECUTABLE)]), 2).await;

    let provisioner = Provisioner::new(settings_for(&server, cache.path()).build().unwrap()).unwrap();
    let path = provisioner.ensure_executable().await.unwrap();

    // Simulate a truncated write left behind by an older launcher
    std::fs::write(&path, b"").unwrap();
    provisioner.ensure_executable().await.unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), EXECUTABLE);
}

#[tokio::test]
async fn existence_only_cache_when_verification_disabled() {
    let server = MockServer::start().await;
    let cache = TempDir::new().unwrap();
    serve_archive(&server, linux_amd64(), zip_archive(&[("ws4sql", EXECUTABLE)]), 0).await;

    let settings = settings_for(&server, cache.path())
        .verify_cache(false)
        .build()
        .unwrap();
    let provisioner = Provisioner::new(settings).unwrap();
    std::fs::create_dir_all(provisioner.location().dir()).unwrap();
    std::fs::write(provisioner.executable_path(), b"placed by hand").unwrap();

    let path = provisioner.ensure_executable().await.unwrap();

    assert_eq!(std::fs::read_to_string(path).unwrap(), "placed by hand");
}

#[tokio::test]
async fn plain_http_is_refused_by_default() {
    let server = MockServer::start().await;
    let cache = TempDir::new().unwrap();
    serve_archive(&server, linux_amd64(), zip_archive(&[("ws4sql", EXECUTABLE)]), 0).await;

    let settings = settings_for(&server, cache.path())
        .allow_insecure_http(false)
        .build()
        .unwrap();
    let err = Provisioner::new(settings)
        .unwrap()
        .ensure_executable()
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Network(_)), "unexpected error: {err}");
}

#[tokio::test]
async fn windows_release_provides_exe() {
    let server = MockServer::start().await;
    let cache = TempDir::new().unwrap();
    let windows = Platform::new(Os::Windows, Arch::Arm64);
    let archive = zip_archive(&[("ws4sql", "wrong"), ("ws4sql.exe", "MZ")]);
    serve_archive(&server, windows, archive, 1).await;

    let settings = settings_for(&server, cache.path())
        .platform(windows)
        .build()
        .unwrap();
    let path = Provisioner::new(settings)
        .unwrap()
        .ensure_executable()
        .await
        .unwrap();

    assert_eq!(path.file_name().unwrap(), "ws4sql.exe");
    assert_eq!(std::fs::read_to_string(path).unwrap(), "MZ");
}
