//! End-to-end exec tests against a mocked Gemini endpoint.

mod fixtures;

use assert_cmd::cargo::cargo_bin_cmd;
use fixtures::{fenced_python_response, gemini_error};
use predicates::prelude::*;
use tempfile::tempdir;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer};

#[tokio::test]
async fn test_exec_prints_extracted_code() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-2.0-flash:generateContent"))
        .and(header("x-goog-api-key", "test-key"))
        .respond_with(fenced_python_response("print('hi')"))
        .expect(1)
        .mount(&server)
        .await;

    let home = tempdir().unwrap();
    cargo_bin_cmd!("verso")
        .env("VERSO_HOME", home.path())
        .env("GEMINI_API_KEY", "test-key")
        .env("GEMINI_BASE_URL", server.uri())
        .args(["exec", "--prompt", "say hi"])
        .assert()
        .success()
        .stdout(predicate::str::contains("print('hi')"))
        .stdout(predicate::str::contains("```").not());
}

#[tokio::test]
async fn test_exec_sends_instruction_template() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-2.0-flash:generateContent"))
        .and(body_partial_json(serde_json::json!({
            "generationConfig": { "temperature": 0.5 }
        })))
        .respond_with(fenced_python_response("pass"))
        .expect(1)
        .mount(&server)
        .await;

    let home = tempdir().unwrap();
    cargo_bin_cmd!("verso")
        .env("VERSO_HOME", home.path())
        .env("GEMINI_API_KEY", "test-key")
        .env("GEMINI_BASE_URL", server.uri())
        .args(["exec", "--prompt", "do nothing"])
        .assert()
        .success();

    // The composed prompt must carry the single-file instruction.
    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = requests[0].body_json().unwrap();
    let sent = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
    assert!(sent.contains("single Python source file"));
    assert!(sent.contains("do nothing"));
}

#[tokio::test]
async fn test_exec_unfenced_response_is_printed_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-2.0-flash:generateContent"))
        .respond_with(fixtures::gemini_response("plain answer, no fence"))
        .mount(&server)
        .await;

    let home = tempdir().unwrap();
    cargo_bin_cmd!("verso")
        .env("VERSO_HOME", home.path())
        .env("GEMINI_API_KEY", "test-key")
        .env("GEMINI_BASE_URL", server.uri())
        .args(["exec", "--prompt", "say hi"])
        .assert()
        .success()
        .stdout(predicate::str::contains("plain answer, no fence"));
}

#[tokio::test]
async fn test_exec_model_override_changes_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-2.5-pro:generateContent"))
        .respond_with(fenced_python_response("pass"))
        .expect(1)
        .mount(&server)
        .await;

    let home = tempdir().unwrap();
    cargo_bin_cmd!("verso")
        .env("VERSO_HOME", home.path())
        .env("GEMINI_API_KEY", "test-key")
        .env("GEMINI_BASE_URL", server.uri())
        .args(["exec", "--prompt", "say hi", "--model", "gemini-2.5-pro"])
        .assert()
        .success();
}

#[tokio::test]
async fn test_exec_surfaces_api_error_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-2.0-flash:generateContent"))
        .respond_with(gemini_error(401, "API key not valid"))
        .mount(&server)
        .await;

    let home = tempdir().unwrap();
    cargo_bin_cmd!("verso")
        .env("VERSO_HOME", home.path())
        .env("GEMINI_API_KEY", "bad-key")
        .env("GEMINI_BASE_URL", server.uri())
        .args(["exec", "--prompt", "say hi"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("API key not valid"));
}

#[test]
fn test_exec_without_api_key_fails_fast() {
    let home = tempdir().unwrap();
    cargo_bin_cmd!("verso")
        .env("VERSO_HOME", home.path())
        .env_remove("GEMINI_API_KEY")
        .env_remove("GOOGLE_API_KEY")
        .args(["exec", "--prompt", "say hi"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No API key available"));
}

#[tokio::test]
async fn test_piped_stdin_runs_exec() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-2.0-flash:generateContent"))
        .respond_with(fenced_python_response("x = 42"))
        .expect(1)
        .mount(&server)
        .await;

    let home = tempdir().unwrap();
    cargo_bin_cmd!("verso")
        .env("VERSO_HOME", home.path())
        .env("GEMINI_API_KEY", "test-key")
        .env("GEMINI_BASE_URL", server.uri())
        .write_stdin("give me the answer")
        .assert()
        .success()
        .stdout(predicate::str::contains("x = 42"));
}
