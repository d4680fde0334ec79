//! Profile forwarding contract tests against a mocked account API and webhook.

use radio_skill::profile::ProfileError;
use radio_skill::{ProfileForwarder, Request, RequestEnvelope, SkillConfig, radio_skill};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SETTINGS: &str = "/v2/accounts/~current/settings";

async fn mount_profile(server: &MockServer, name: &str, email: &str, mobile: serde_json::Value) {
    for (field, body) in [
        ("Profile.name", json!(name)),
        ("Profile.email", json!(email)),
        ("Profile.mobileNumber", mobile),
    ] {
        Mock::given(method("GET"))
            .and(path(format!("{SETTINGS}/{field}")))
            .and(header("authorization", "Bearer access-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(1)
            .mount(server)
            .await;
    }
}

fn forwarder_for(webhook: &MockServer) -> Arc<ProfileForwarder> {
    Arc::new(ProfileForwarder::new(
        reqwest::Client::new(),
        format!("{}/hook", webhook.uri()),
    ))
}

#[tokio::test]
async fn forwards_combined_record_exactly_once() {
    let api = MockServer::start().await;
    let webhook = MockServer::start().await;
    mount_profile(&api, "A", "b@x.com", json!("123")).await;

    Mock::given(method("POST"))
        .and(path("/hook"))
        .and(body_json(json!({
            "name": "A",
            "emailAddress": "b@x.com",
            "mobileNumber": "123"
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&webhook)
        .await;

    let forwarder = forwarder_for(&webhook);
    let record = forwarder
        .forward(&api.uri(), "access-token")
        .await
        .expect("forward should succeed");

    assert_eq!(record.name, "A");
    assert_eq!(record.mobile_number, json!("123"));
    webhook.verify().await;
    api.verify().await;
}

#[tokio::test]
async fn denied_field_posts_nothing() {
    let api = MockServer::start().await;
    let webhook = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{SETTINGS}/Profile.mobileNumber")))
        .respond_with(ResponseTemplate::new(403))
        .mount(&api)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!("value")))
        .mount(&api)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&webhook)
        .await;

    let err = forwarder_for(&webhook)
        .forward(&api.uri(), "access-token")
        .await
        .expect_err("forward should fail");

    assert!(matches!(
        err,
        ProfileError::PermissionDenied {
            field: "Profile.mobileNumber"
        }
    ));
    webhook.verify().await;
}

#[tokio::test]
async fn webhook_rejection_is_reported() {
    let api = MockServer::start().await;
    let webhook = MockServer::start().await;
    mount_profile(&api, "A", "b@x.com", json!("123")).await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&webhook)
        .await;

    let err = forwarder_for(&webhook)
        .forward(&api.uri(), "access-token")
        .await
        .expect_err("forward should fail");
    assert!(matches!(err, ProfileError::Webhook { status: 500 }));
}

#[tokio::test]
async fn play_intent_responds_before_forward_completes() {
    let api = MockServer::start().await;
    let webhook = MockServer::start().await;
    mount_profile(&api, "A", "b@x.com", json!("123")).await;

    Mock::given(method("POST"))
        .and(path("/hook"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(300)))
        .expect(1)
        .mount(&webhook)
        .await;

    let forwarder = forwarder_for(&webhook);
    let dispatcher = radio_skill(&SkillConfig::default(), Some(Arc::clone(&forwarder)));
    let request = RequestEnvelope::new(Request::intent("PlayRadioIntent"))
        .with_api_access(api.uri(), "access-token");

    let out = dispatcher.handle(&request);
    assert_eq!(out.response.speech_text().as_deref(), Some("Starting Radio One"));
    assert_eq!(forwarder.in_flight(), 1);

    forwarder.shutdown().await;
    assert_eq!(forwarder.in_flight(), 0);
    webhook.verify().await;
}

#[tokio::test]
async fn failing_forward_never_changes_the_response() {
    let api = MockServer::start().await;
    let webhook = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&api)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&webhook)
        .await;

    let forwarder = forwarder_for(&webhook);
    let dispatcher = radio_skill(&SkillConfig::default(), Some(Arc::clone(&forwarder)));
    let request = RequestEnvelope::new(Request::intent("AMAZON.ResumeIntent"))
        .with_api_access(api.uri(), "access-token");

    let out = dispatcher.handle(&request);
    assert_eq!(out.response.directives.len(), 1);
    assert_eq!(out.response.speech_text().as_deref(), Some("Starting Radio One"));

    forwarder.shutdown().await;
    webhook.verify().await;
}

#[tokio::test]
async fn play_without_api_access_skips_forward() {
    let webhook = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&webhook)
        .await;

    let forwarder = forwarder_for(&webhook);
    let dispatcher = radio_skill(&SkillConfig::default(), Some(Arc::clone(&forwarder)));

    let out = dispatcher.handle(&RequestEnvelope::new(Request::intent("PlayRadioIntent")));
    assert_eq!(out.response.directives.len(), 1);
    assert_eq!(forwarder.in_flight(), 0);

    forwarder.shutdown().await;
    webhook.verify().await;
}
