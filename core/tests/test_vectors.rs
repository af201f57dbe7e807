//! Verify builders and decoding against JSON test vectors in `test-vectors/`.
//!
//! Each case names an endpoint and describes its inputs, the expected
//! request, a simulated response, and either the expected decoded result or
//! the expected error kind. Comparing parsed JSON (not raw strings) avoids
//! false negatives from field-ordering differences.

use std::sync::Arc;

use petstore_core::{
    ApiError, ClientConfig, HttpMethod, HttpResponse, RequestBuilder, ReqwestTransport,
    ResponseDecoder, User, UserApi,
};
use serde_json::Value;

const BASE_URL: &str = "http://localhost:3000/v2";

fn api() -> UserApi {
    let transport = ReqwestTransport::new().unwrap();
    UserApi::new(Arc::new(ClientConfig::new(BASE_URL, Arc::new(transport))))
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn check_case<D>(builder: RequestBuilder<D>, case: &Value)
where
    D: ResponseDecoder,
    D::Output: serde::Serialize + std::fmt::Debug,
{
    let name = case["name"].as_str().unwrap();
    let expected_req = &case["expected_request"];
    let req = builder.request();

    let method = parse_method(expected_req["method"].as_str().unwrap());
    assert_eq!(req.method, method, "{name}: method");
    let url = format!("{BASE_URL}{}", expected_req["path"].as_str().unwrap());
    assert_eq!(req.url, url, "{name}: url");

    let expected_headers: Vec<(String, String)> = expected_req["headers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|h| {
            let arr = h.as_array().unwrap();
            (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
        })
        .collect();
    assert_eq!(req.headers, expected_headers, "{name}: headers");

    match req.body.as_deref() {
        Some(body) => {
            let body: Value = serde_json::from_str(body).unwrap();
            assert_eq!(body, expected_req["body"], "{name}: body");
        }
        None => assert!(expected_req["body"].is_null(), "{name}: expected a body"),
    }

    let sim = &case["simulated_response"];
    let response = HttpResponse {
        status: sim["status"].as_u64().unwrap() as u16,
        headers: Vec::new(),
        body: sim["body"].as_str().unwrap().to_string(),
    };
    let decoded = builder.decode(response);

    match case["expected_error"].as_str() {
        Some("not_found") => assert_eq!(decoded.unwrap_err(), ApiError::NotFound, "{name}"),
        Some("http") => {
            let err = decoded.unwrap_err();
            let expected = sim["status"].as_u64().unwrap();
            assert!(
                matches!(err, ApiError::Http { status, .. } if u64::from(status) == expected),
                "{name}: got {err:?}"
            );
        }
        Some(other) => panic!("{name}: unknown error kind {other}"),
        None => {
            let value = serde_json::to_value(decoded.unwrap().body).unwrap();
            assert_eq!(value, case["expected_result"], "{name}: decoded result");
        }
    }
}

fn users(input: &Value) -> Vec<User> {
    serde_json::from_value(input["body"].clone()).unwrap()
}

fn user(input: &Value) -> User {
    serde_json::from_value(input["body"].clone()).unwrap()
}

fn string(input: &Value, key: &str) -> String {
    input[key].as_str().unwrap().to_string()
}

#[test]
fn user_test_vectors() {
    let raw = include_str!("../../test-vectors/user.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let api = api();
    let cases = vectors["cases"].as_array().unwrap();
    assert!(!cases.is_empty());

    for case in cases {
        let input = &case["input"];
        match case["endpoint"].as_str().unwrap() {
            "create_user" => check_case(api.build_create_user(&user(input)).unwrap(), case),
            "create_users_with_array_input" => check_case(
                api.build_create_users_with_array_input(&users(input)).unwrap(),
                case,
            ),
            "create_users_with_list_input" => check_case(
                api.build_create_users_with_list_input(&users(input)).unwrap(),
                case,
            ),
            "delete_user" => check_case(api.build_delete_user(&string(input, "username")), case),
            "get_user_by_name" => {
                check_case(api.build_get_user_by_name(&string(input, "username")), case)
            }
            "login_user" => check_case(
                api.build_login_user(&string(input, "username"), &string(input, "password")),
                case,
            ),
            "logout_user" => check_case(api.build_logout_user(), case),
            "update_user" => check_case(
                api.build_update_user(&string(input, "username"), &user(input)).unwrap(),
                case,
            ),
            other => panic!("unknown endpoint: {other}"),
        }
    }
}
