//! Process-level behaviour of the `access-rights-check` binary.

use std::process::{Command, Output};

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const BIN: &str = env!("CARGO_BIN_EXE_access-rights-check");

const VOCAB_JSON: &str = r#"{"versions":[{"concepts":[{"title":"Open"},{"title":"Restricted"}]}]}"#;

fn record(value: &str) -> String {
    format!(
        r#"<OAI-PMH xmlns="http://www.openarchives.org/OAI/2.0/"><GetRecord><record><metadata><codeBook xmlns="ddi:codebook:2_5"><stdyDscr><dataAccs><typeOfAccess>{value}</typeOfAccess></dataAccs></stdyDscr></codeBook></metadata></record></GetRecord></OAI-PMH>"#
    )
}

async fn mock_catalogue() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/oai"))
        .and(query_param("identifier", "open1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(record("Open")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/oai"))
        .and(query_param("identifier", "closed1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(record("Closed")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/oai"))
        .and(query_param("identifier", "broken"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/vocab"))
        .respond_with(ResponseTemplate::new(200).set_body_string(VOCAB_JSON))
        .mount(&server)
        .await;
    server
}

async fn run_against(server: &MockServer, args: &[&str]) -> Output {
    let metadata_url = format!("{}/oai?identifier=", server.uri());
    let vocabulary_url = format!("{}/vocab", server.uri());
    let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();

    tokio::task::spawn_blocking(move || {
        Command::new(BIN)
            .args(&args)
            .arg("--metadata-url")
            .arg(metadata_url)
            .arg("--vocabulary-url")
            .arg(vocabulary_url)
            .output()
            .expect("failed to run binary")
    })
    .await
    .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

#[test]
fn missing_argument_prints_usage() {
    let output = Command::new(BIN).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Usage"));
    assert!(output.stdout.is_empty());
}

#[test]
fn invalid_reference_has_its_own_exit_code() {
    let output = Command::new(BIN)
        .arg("https://datacatalogue.cessda.eu/record/abc")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
    assert!(output.stdout.is_empty());
}

#[test]
fn invalid_endpoint_is_a_usage_error() {
    let output = Command::new(BIN)
        .args(["https://datacatalogue.cessda.eu/detail/abc", "--metadata-url", "nope"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[tokio::test(flavor = "multi_thread")]
async fn pass_exits_zero() {
    let server = mock_catalogue().await;
    let output = run_against(&server, &["https://datacatalogue.cessda.eu/detail/open1?lang=en"]).await;
    assert_eq!(stdout(&output), "pass");
    assert_eq!(output.status.code(), Some(0));
}

#[tokio::test(flavor = "multi_thread")]
async fn fail_exits_one() {
    let server = mock_catalogue().await;
    let output = run_against(&server, &["https://datacatalogue.cessda.eu/detail/closed1"]).await;
    assert_eq!(stdout(&output), "fail");
    assert_eq!(output.status.code(), Some(1));
}

#[tokio::test(flavor = "multi_thread")]
async fn indeterminate_exits_one() {
    let server = mock_catalogue().await;
    let output = run_against(&server, &["https://datacatalogue.cessda.eu/detail/broken"]).await;
    assert_eq!(stdout(&output), "indeterminate");
    assert_eq!(output.status.code(), Some(1));
}

#[tokio::test(flavor = "multi_thread")]
async fn json_output() {
    let server = mock_catalogue().await;
    let url = "https://datacatalogue.cessda.eu/detail/open1";
    let output = run_against(&server, &[url, "--json"]).await;
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(value["verdict"], "pass");
    assert_eq!(value["url"], url);
}
