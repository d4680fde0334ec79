//! HTTP host tests: the axum router served on an ephemeral port.

use radio_skill::config::ServerConfig;
use radio_skill::{SkillConfig, radio_skill, server};
use serde_json::{Value, json};
use std::sync::Arc;

async fn spawn_gateway(bearer_token: Option<&str>) -> String {
    let config = ServerConfig {
        bearer_token: bearer_token.map(str::to_owned),
        path: "/skill".to_owned(),
        ..Default::default()
    };
    let dispatcher = Arc::new(radio_skill(&SkillConfig::default(), None));
    let app = server::router(dispatcher, &config);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    format!("http://{addr}")
}

fn help_envelope() -> Value {
    json!({
        "version": "1.0",
        "request": {
            "type": "IntentRequest",
            "requestId": "req-1",
            "intent": { "name": "AMAZON.HelpIntent" }
        }
    })
}

#[tokio::test]
async fn health_reports_ok() {
    let base = spawn_gateway(None).await;
    let body: Value = reqwest::get(format!("{base}/health"))
        .await
        .expect("request")
        .json()
        .await
        .expect("json");
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn envelope_is_answered() {
    let base = spawn_gateway(None).await;
    let response = reqwest::Client::new()
        .post(format!("{base}/skill"))
        .json(&help_envelope())
        .send()
        .await
        .expect("request");
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.expect("json");
    assert_eq!(body["version"], "1.0");
    assert_eq!(
        body["response"]["reprompt"]["outputSpeech"]["ssml"],
        "<speak>You can say hello to me! How can I help?</speak>"
    );
    assert_eq!(body["response"]["shouldEndSession"], false);
}

#[tokio::test]
async fn malformed_envelope_is_bad_request() {
    let base = spawn_gateway(None).await;
    let response = reqwest::Client::new()
        .post(format!("{base}/skill"))
        .header("content-type", "application/json")
        .body("{\"version\": \"1.0\"}")
        .send()
        .await
        .expect("request");
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("json");
    assert!(body["error"].as_str().unwrap_or_default().contains("invalid request envelope"));
}

#[tokio::test]
async fn bearer_token_is_enforced() {
    let base = spawn_gateway(Some("hunter2")).await;
    let client = reqwest::Client::new();

    let denied = client
        .post(format!("{base}/skill"))
        .json(&help_envelope())
        .send()
        .await
        .expect("request");
    assert_eq!(denied.status(), 401);

    let allowed = client
        .post(format!("{base}/skill"))
        .bearer_auth("hunter2")
        .json(&help_envelope())
        .send()
        .await
        .expect("request");
    assert_eq!(allowed.status(), 200);
}
