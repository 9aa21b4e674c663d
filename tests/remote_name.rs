//! `-O` saves under a name relative to the working directory, so these tests
//! run in their own binary and change directory behind a guard.

mod helpers;

use std::path::{Path, PathBuf};

use helpers::{config_for, request, run};
use httpstat::{ConfigError, HttpstatError, OutputTarget};
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Restores the previous working directory when dropped, including on panic.
struct CurrentDirGuard {
    previous: PathBuf,
}

impl CurrentDirGuard {
    fn enter(dir: &Path) -> Self {
        let previous = std::env::current_dir().expect("current dir should be readable");
        std::env::set_current_dir(dir).expect("temp dir should be enterable");
        Self { previous }
    }
}

impl Drop for CurrentDirGuard {
    fn drop(&mut self) {
        let _ = std::env::set_current_dir(&self.previous);
    }
}

#[tokio::test]
async fn test_remote_name_uses_content_disposition_and_url_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(wiremock::matchers::path("/download"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Disposition", "attachment; filename=\"../report.txt\"")
                .set_body_string("report"),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(wiremock::matchers::path("/files/data.csv"))
        .respond_with(ResponseTemplate::new(200).set_body_string("a,b\n"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(wiremock::matchers::path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("index"))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let _guard = CurrentDirGuard::enter(dir.path());

    let remote = |path: &str| httpstat::Config {
        output: OutputTarget::RemoteName,
        ..config_for(&format!("{}{path}", server.uri()), request("GET", false, &[], None))
    };

    run(&remote("/download")).await.1.expect("named download should succeed");
    assert_eq!(
        std::fs::read_to_string(dir.path().join("report.txt")).unwrap(),
        "report"
    );

    run(&remote("/files/data.csv")).await.1.expect("URL-named download should succeed");
    assert_eq!(
        std::fs::read_to_string(dir.path().join("data.csv")).unwrap(),
        "a,b\n"
    );

    let err = run(&remote("/")).await.1.expect_err("a bare / yields no filename");
    assert!(matches!(err, HttpstatError::Config(ConfigError::NoRemoteFilename)));
}
