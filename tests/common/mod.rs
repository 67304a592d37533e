#![allow(dead_code, reason = "Each test binary uses a different subset of helpers")]

use httpmock::prelude::*;
use httpmock::Mock;
use secrecy::SecretString;
use serde_json::{Value, json};
use zee_cloud_client::tuya::{RawCredentials, TuyaClient, TuyaConfig};

pub const ACCESS_ID: &str = "access-id";
pub const VENDOR_USER_ID: &str = "uid-1";

pub fn config(server: &MockServer) -> TuyaConfig {
    TuyaConfig::from_raw(
        &server.base_url(),
        RawCredentials::new(ACCESS_ID, SecretString::from("access-secret")),
    )
    .expect("valid config")
}

pub fn success(result: Value) -> Value {
    json!({
        "success": true,
        "t": 1_700_000_000_000_i64,
        "tid": "tid-ok",
        "result": result
    })
}

pub fn failure(code: i64, msg: &str) -> Value {
    json!({
        "success": false,
        "t": 1_700_000_000_000_i64,
        "tid": "tid-err",
        "code": code,
        "msg": msg
    })
}

/// Token endpoint handing out `access_token` valid for `expire_time` seconds.
pub async fn mock_token<'server>(
    server: &'server MockServer,
    access_token: &str,
    expire_time: i64,
) -> Mock<'server> {
    let body = success(json!({
        "access_token": access_token,
        "refresh_token": "refresh",
        "expire_time": expire_time,
        "uid": VENDOR_USER_ID
    }));

    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v1.0/token")
                .query_param("grant_type", "1")
                .header("client_id", ACCESS_ID)
                .header("sign_method", "HMAC-SHA256")
                .header_exists("sign")
                .header_exists("t")
                .header_exists("nonce");
            then.status(200).json_body(body);
        })
        .await
}

pub async fn bootstrap(server: &MockServer) -> TuyaClient {
    TuyaClient::bootstrap(config(server))
        .await
        .expect("client bootstraps")
}

pub fn device_json(id: &str, category: &str) -> Value {
    json!({
        "id": id,
        "category": category,
        "name": format!("{id} name"),
        "online": true,
        "status": [{"code": "switch_1", "value": true}]
    })
}
