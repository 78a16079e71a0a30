//! Tests for the WireGuard backend adapter and wire types.

use std::time::Duration;

use relaymint_core::Error;

use super::client::{WgClient, WgConfig};
use super::types::{WgClientRecord, WgEnvelope};

fn config(base_url: &str) -> WgConfig {
    WgConfig {
        base_url: base_url.into(),
        api_key: "wg-secret".into(),
        timeout: Duration::from_secs(15),
    }
}

#[test]
fn empty_base_url_is_rejected() {
    let err = WgClient::new(&config("")).unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[test]
fn api_url_constructed_correctly() {
    let client = WgClient::new(&config("http://10.0.0.2:51821")).unwrap();
    assert_eq!(
        client.api_url("/wireguard/client"),
        "http://10.0.0.2:51821/api/wireguard/client"
    );
}

#[test]
fn trailing_slash_stripped_from_base_url() {
    let client = WgClient::new(&config("http://10.0.0.2:51821/")).unwrap();
    assert_eq!(client.api_url("/session/init"), "http://10.0.0.2:51821/api/session/init");
}

#[test]
fn envelope_success_detection() {
    let ok: WgEnvelope<Vec<WgClientRecord>> =
        serde_json::from_str(r#"{"status":"success","data":[]}"#).unwrap();
    assert!(ok.is_success());

    let err: WgEnvelope<Vec<WgClientRecord>> =
        serde_json::from_str(r#"{"status":"error","error":"invalid password"}"#).unwrap();
    assert!(!err.is_success());
    assert_eq!(err.error_message(), "invalid password");
}

#[test]
fn envelope_without_error_payload_reports_status() {
    let env: WgEnvelope<serde_json::Value> =
        serde_json::from_str(r#"{"status":"denied"}"#).unwrap();
    assert_eq!(env.error_message(), "backend status \"denied\"");
}

#[test]
fn client_record_keeps_unknown_fields() {
    let record: WgClientRecord = serde_json::from_str(
        r#"{"id":"9f8e7d6c","name":"alice","enabled":true,
            "address":"10.8.0.3","publicKey":"abc="}"#,
    )
    .unwrap();
    assert_eq!(record.id, "9f8e7d6c");
    assert_eq!(record.name, "alice");
    assert!(record.enabled);

    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["address"], "10.8.0.3");
    assert_eq!(json["publicKey"], "abc=");
}
