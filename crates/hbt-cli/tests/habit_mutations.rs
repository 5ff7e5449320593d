//! Integration tests for habit completion and deletion, including the
//! post-mutation authoritative re-fetch.


use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use assert_cmd::cargo::cargo_bin_cmd;
use fixtures::{
    can_bind_localhost, completion_ok, error_response, habit, json_response, temp_hbt_home,
    write_fast_config, write_session,
};
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

/// Test: `habits done` applies the server patch and re-fetches the list
/// afterwards. The streak shown comes from the server, not a local +1.
#[tokio::test]
async fn test_done_applies_server_patch_and_refetches() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_hbt_home();
    write_session(&home, "tok-completion-test-1234");
    write_fast_config(&home);
    let server = MockServer::start().await;

    // First list: not completed. Second list (the re-fetch): server truth.
    let list_calls = Arc::new(AtomicUsize::new(0));
    let list_calls_mock = list_calls.clone();
    Mock::given(method("GET"))
        .and(path("/api/habits/"))
        .respond_with(move |_: &Request| {
            let count = list_calls_mock.fetch_add(1, Ordering::SeqCst);
            let done = u32::from(count > 0);
            ResponseTemplate::new(200).set_body_json(json!([habit("h1", "Read", 1, done)]))
        })
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/habits/h1/complete"))
        .respond_with(completion_ok("h1", 7, 1))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/streak"))
        .respond_with(json_response(200, json!({"current_streak": 3})))
        .expect(2)
        .mount(&server)
        .await;

    cargo_bin_cmd!("hbt")
        .env("HBT_HOME", home.path())
        .env("HBT_BASE_URL", server.uri())
        .args(["habits", "done", "h1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Current streak: 7 days"));

    assert_eq!(list_calls.load(Ordering::SeqCst), 2, "expected a re-fetch");
}

/// Test: an already-completed habit sends no completion request.
#[tokio::test]
async fn test_done_skips_completed_habit() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_hbt_home();
    write_session(&home, "tok-completion-test-5678");
    write_fast_config(&home);
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/habits/"))
        .respond_with(json_response(200, json!([habit("h1", "Read", 1, 1)])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/streak"))
        .respond_with(json_response(200, json!({"current_streak": 3})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/habits/h1/complete"))
        .respond_with(json_response(200, json!({})))
        .expect(0)
        .mount(&server)
        .await;

    cargo_bin_cmd!("hbt")
        .env("HBT_HOME", home.path())
        .env("HBT_BASE_URL", server.uri())
        .args(["habits", "done", "h1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already completed"));
}

/// Test: a server rejection surfaces its message and still re-fetches.
#[tokio::test]
async fn test_done_error_surfaces_server_message() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_hbt_home();
    write_session(&home, "tok-completion-test-9abc");
    write_fast_config(&home);
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/habits/"))
        .respond_with(json_response(200, json!([habit("h1", "Read", 1, 0)])))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/streak"))
        .respond_with(json_response(200, json!({"current_streak": 0})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/habits/h1/complete"))
        .respond_with(error_response(400, "Habit already completed for today"))
        .expect(1)
        .mount(&server)
        .await;

    cargo_bin_cmd!("hbt")
        .env("HBT_HOME", home.path())
        .env("HBT_BASE_URL", server.uri())
        .args(["habits", "done", "h1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Habit already completed for today"));
}

/// Test: `habits rm` without --yes asks, and a "n" answer fires no DELETE.
#[tokio::test]
async fn test_rm_declined_sends_no_delete() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_hbt_home();
    write_session(&home, "tok-delete-test-abcd1234");
    write_fast_config(&home);
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/habits/"))
        .respond_with(json_response(200, json!([habit("h1", "Read", 1, 0)])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/streak"))
        .respond_with(json_response(200, json!({"current_streak": 0})))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/habits/h1"))
        .respond_with(json_response(200, json!({"message": "deleted"})))
        .expect(0)
        .mount(&server)
        .await;

    cargo_bin_cmd!("hbt")
        .env("HBT_HOME", home.path())
        .env("HBT_BASE_URL", server.uri())
        .args(["habits", "rm", "h1"])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cancelled"));
}

/// Test: `habits rm --yes` deletes and re-fetches the shrunken list.
#[tokio::test]
async fn test_rm_confirmed_deletes_and_refetches() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_hbt_home();
    write_session(&home, "tok-delete-test-efgh5678");
    write_fast_config(&home);
    let server = MockServer::start().await;

    let list_calls = Arc::new(AtomicUsize::new(0));
    let list_calls_mock = list_calls.clone();
    Mock::given(method("GET"))
        .and(path("/api/habits/"))
        .respond_with(move |_: &Request| {
            let count = list_calls_mock.fetch_add(1, Ordering::SeqCst);
            let body = if count == 0 {
                json!([habit("h1", "Read", 1, 0), habit("h2", "Run", 1, 0)])
            } else {
                json!([habit("h2", "Run", 1, 0)])
            };
            ResponseTemplate::new(200).set_body_json(body)
        })
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/streak"))
        .respond_with(json_response(200, json!({"current_streak": 0})))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/habits/h1"))
        .respond_with(json_response(200, json!({"message": "Habit deleted"})))
        .expect(1)
        .mount(&server)
        .await;

    cargo_bin_cmd!("hbt")
        .env("HBT_HOME", home.path())
        .env("HBT_BASE_URL", server.uri())
        .args(["habits", "rm", "h1", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted habit 'Read'"))
        .stdout(predicate::str::contains("1 habits remaining"));
}

/// Test: deleting an unknown id fails before any request is sent.
#[tokio::test]
async fn test_rm_unknown_id_fails() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_hbt_home();
    write_session(&home, "tok-delete-test-ijkl9012");
    write_fast_config(&home);
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/habits/"))
        .respond_with(json_response(200, json!([])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/streak"))
        .respond_with(json_response(200, json!({"current_streak": 0})))
        .mount(&server)
        .await;

    cargo_bin_cmd!("hbt")
        .env("HBT_HOME", home.path())
        .env("HBT_BASE_URL", server.uri())
        .args(["habits", "rm", "nope", "--yes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No habit with id 'nope'"));
}
