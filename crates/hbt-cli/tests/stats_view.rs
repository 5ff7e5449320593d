//! Integration tests for the stats view: two endpoints merged into one
//! table, with the streak endpoint allowed to fail quietly.


use assert_cmd::cargo::cargo_bin_cmd;
use fixtures::{can_bind_localhost, json_response, temp_hbt_home, write_session};
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Test: stats and streak responses combine into one view.
#[tokio::test]
async fn test_stats_merges_both_endpoints() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_hbt_home();
    write_session(&home, "tok-stats-test-abcd1234");
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/stats/"))
        .respond_with(json_response(
            200,
            json!({
                "total_habits_created": 5,
                "total_completions": 12,
                "longest_daily_streak": 7
            }),
        ))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/streak"))
        .respond_with(json_response(200, json!({"current_streak": 3})))
        .expect(1)
        .mount(&server)
        .await;

    cargo_bin_cmd!("hbt")
        .env("HBT_HOME", home.path())
        .env("HBT_BASE_URL", server.uri())
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("5"))
        .stdout(predicate::str::contains("12"))
        .stdout(predicate::str::contains("3 days"))
        .stdout(predicate::str::contains("7 days"));
}

/// Test: a failing streak endpoint does not hide the stats.
#[tokio::test]
async fn test_stats_survives_streak_failure() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_hbt_home();
    write_session(&home, "tok-stats-test-efgh5678");
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/stats/"))
        .respond_with(json_response(
            200,
            json!({
                "total_habits_created": 2,
                "total_completions": 9,
                "longest_daily_streak": 4
            }),
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/streak"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    cargo_bin_cmd!("hbt")
        .env("HBT_HOME", home.path())
        .env("HBT_BASE_URL", server.uri())
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("9"))
        .stdout(predicate::str::contains("0 days"));
}
