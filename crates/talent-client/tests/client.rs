mod common;

use common::{RoutedTransport, ScriptedTransport, client, config, logged_in, reply};
use talent_client::ApiClient;
use talent_client::error::ApiError;
use talent_client::session::{Session, SessionEvent, Tokens};
use talent_client::transport::Body;

#[tokio::test]
async fn failing_transport_returns_fallback() {
    let transport = ScriptedTransport::new();
    transport.fail("connection refused");
    let client = client(&transport, true);

    let fetched = client
        .get::<Vec<u32>>("/api/things")
        .fallback(vec![7])
        .send_fetched()
        .await
        .unwrap();

    assert!(fetched.is_fallback());
    assert_eq!(fetched.into_inner(), vec![7]);
}

#[tokio::test]
async fn failing_transport_without_fallback_errors() {
    let transport = ScriptedTransport::new();
    transport.fail("connection refused");
    let client = client(&transport, true);

    let err = client.get::<Vec<u32>>("/api/things").send().await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}

#[tokio::test]
async fn disabled_fallback_surfaces_the_error() {
    let transport = ScriptedTransport::new();
    transport.respond(503, r#"{"detail":"维护中"}"#);
    let client = client(&transport, false);

    let err = client
        .get::<Vec<u32>>("/api/things")
        .fallback(vec![7])
        .send()
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(503));
    assert_eq!(err.to_string(), "HTTP 503: 维护中");
}

#[tokio::test]
async fn malformed_payload_is_not_masked_by_fallback() {
    let transport = ScriptedTransport::new();
    transport.respond(200, r#"{"items": "#);
    let client = client(&transport, true);

    let err = client
        .get::<Vec<u32>>("/api/things")
        .fallback(vec![7])
        .send()
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Decode { ref path, .. } if path == "/api/things"));
}

#[tokio::test]
async fn json_body_and_base_url() {
    let transport = ScriptedTransport::new();
    transport.respond(204, "");
    let client = client(&transport, false);

    client
        .post::<()>("/api/assessments")
        .json(&serde_json::json!({ "name": "Q4" }))
        .send()
        .await
        .unwrap();

    let sent = transport.requests();
    assert_eq!(sent[0].url, "http://api.test/api/assessments");
    assert_eq!(sent[0].body, Body::Json(serde_json::json!({ "name": "Q4" })));
    assert_eq!(sent[0].bearer, None);
}

#[tokio::test]
async fn single_401_refreshes_once_and_retries_once() {
    let transport = ScriptedTransport::new();
    transport
        .respond(401, r#"{"detail":"token expired"}"#)
        .respond(200, r#"{"access_token":"access-2"}"#)
        .respond(200, "[1,2,3]");
    let client = logged_in(&transport, Some("refresh-1")).await;
    let mut events = client.session().subscribe();

    let values: Vec<u32> = client
        .get("/api/candidates")
        .authenticated()
        .send()
        .await
        .unwrap();
    assert_eq!(values, vec![1, 2, 3]);

    let sent = transport.requests();
    assert_eq!(sent.len(), 3);
    assert_eq!(sent[0].bearer.as_deref(), Some("access-1"));
    assert_eq!(sent[1].url, "http://api.test/auth/refresh");
    assert_eq!(sent[1].bearer, None);
    assert_eq!(
        sent[1].body,
        Body::Json(serde_json::json!({ "refresh_token": "refresh-1" }))
    );
    assert_eq!(sent[2].bearer.as_deref(), Some("access-2"));

    assert_eq!(client.session().access_token().await.as_deref(), Some("access-2"));
    assert_eq!(client.session().refresh_token().await.as_deref(), Some("refresh-1"));
    assert_eq!(events.try_recv().unwrap(), SessionEvent::TokensChanged);
    assert!(events.try_recv().is_err());
}

#[tokio::test]
async fn concurrent_401s_each_refresh_without_clearing_session() {
    let transport = RoutedTransport::new(|request| {
        if request.url.ends_with("/auth/refresh") {
            reply(200, r#"{"access_token":"access-2"}"#)
        } else if request.bearer.as_deref() == Some("access-1") {
            reply(401, r#"{"detail":"token expired"}"#)
        } else {
            reply(200, "[1]")
        }
    });
    let client = ApiClient::with_transport(config(false), transport.clone(), Session::in_memory());
    client
        .session()
        .set_tokens(Tokens {
            access_token: "access-1".to_string(),
            refresh_token: Some("refresh-1".to_string()),
        })
        .await
        .unwrap();
    let mut events = client.session().subscribe();

    let (first, second) = tokio::join!(
        client.get::<Vec<u32>>("/api/candidates").authenticated().send(),
        client.get::<Vec<u32>>("/api/job-positions").authenticated().send(),
    );
    assert_eq!(first.unwrap(), vec![1]);
    assert_eq!(second.unwrap(), vec![1]);

    let refreshes = transport
        .urls()
        .iter()
        .filter(|url| url.ends_with("/auth/refresh"))
        .count();
    assert_eq!(refreshes, 2);
    assert_eq!(transport.urls().len(), 6);
    assert!(client.session().is_authenticated().await);
    assert_eq!(client.session().access_token().await.as_deref(), Some("access-2"));

    while let Ok(event) = events.try_recv() {
        assert_eq!(event, SessionEvent::TokensChanged);
    }
}

#[tokio::test]
async fn second_401_clears_session_exactly_once() {
    let transport = ScriptedTransport::new();
    transport
        .respond(401, "")
        .respond(200, r#"{"access_token":"access-2","refresh_token":"refresh-2"}"#)
        .respond(401, "");
    let client = logged_in(&transport, Some("refresh-1")).await;
    let mut events = client.session().subscribe();

    let err = client
        .get::<Vec<u32>>("/api/candidates")
        .authenticated()
        .fallback(vec![])
        .send()
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::SessionExpired));
    assert_eq!(transport.requests().len(), 3);
    assert!(!client.session().is_authenticated().await);

    let mut received = Vec::new();
    while let Ok(event) = events.try_recv() {
        received.push(event);
    }
    let expired = received
        .iter()
        .filter(|e| **e == SessionEvent::Expired)
        .count();
    assert_eq!(expired, 1);
    assert_eq!(received.last(), Some(&SessionEvent::Expired));
}

#[tokio::test]
async fn missing_refresh_token_expires_without_refresh_call() {
    let transport = ScriptedTransport::new();
    transport.respond(401, "");
    let client = logged_in(&transport, None).await;

    let err = client
        .get::<Vec<u32>>("/api/candidates")
        .authenticated()
        .send()
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::SessionExpired));
    assert_eq!(transport.requests().len(), 1);
    assert!(!client.session().is_authenticated().await);
}

#[tokio::test]
async fn failing_refresh_expires_session() {
    let transport = ScriptedTransport::new();
    transport
        .respond(401, "")
        .respond(400, r#"{"detail":"invalid refresh token"}"#);
    let client = logged_in(&transport, Some("refresh-1")).await;

    let err = client
        .get::<Vec<u32>>("/api/candidates")
        .authenticated()
        .send()
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::SessionExpired));
    assert_eq!(transport.requests().len(), 2);
}

#[tokio::test]
async fn unauthenticated_401_is_a_plain_http_error() {
    let transport = ScriptedTransport::new();
    transport.respond(401, r#"{"detail":"not allowed"}"#);
    let client = logged_in(&transport, Some("refresh-1")).await;

    let err = client
        .get::<Vec<u32>>("/api/job-profiles")
        .send()
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(401));
    assert_eq!(transport.requests().len(), 1);
    assert!(client.session().is_authenticated().await);
}

#[tokio::test]
async fn explicit_bearer_is_sent_without_refresh() {
    let transport = ScriptedTransport::new();
    transport.respond(401, "");
    let client = logged_in(&transport, Some("refresh-1")).await;

    let err = client
        .get::<()>("/api/candidates")
        .bearer("manual")
        .send()
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(401));
    let sent = transport.requests();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].bearer.as_deref(), Some("manual"));
}
