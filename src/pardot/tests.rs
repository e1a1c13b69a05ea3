//! Tests for the Pardot adapters

use super::*;
use crate::config::Config;
use crate::error::{Error, UNKNOWN_API_ERROR};
use crate::pagination::{PageRequest, PagedFetcher, PageSource};
use crate::types::StringMap;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use wiremock::matchers::{
    body_string_contains, header, method, path, query_param, query_param_is_missing,
};
use wiremock::{Mock, MockServer, ResponseTemplate};

const QUERY_PATH_PROSPECT: &str = "/api/prospect/version/4/do/query";
const QUERY_PATH_VISIT: &str = "/api/visit/version/4/do/query";
const QUERY_PATH_ACTIVITY: &str = "/api/visitorActivity/version/4/do/query";

fn test_config(server: &MockServer) -> Config {
    let mut config = Config::new("0Uv000000000001");
    config.base_url = server.uri();
    config.login_url = server.uri();
    config.access_token = Some("test-token".to_string());
    config.http.rate_limit = None;
    config
}

fn ok_body(key: &str, total: u64, records: Value) -> Value {
    json!({
        "@attributes": {"stat": "ok", "version": 1},
        "result": {"total_results": total, key: records}
    })
}

fn fail_body(code: u64, message: &str) -> Value {
    json!({"@attributes": {"stat": "fail", "err_code": code}, "err": message})
}

fn rows(range: std::ops::Range<u64>) -> Value {
    Value::Array(range.map(|id| json!({"id": id})).collect())
}

// ============================================================================
// Decoding
// ============================================================================

#[test]
fn test_parse_array_records() {
    let body = ok_body("visit", 2, json!([{"id": 1}, {"id": 2}]));
    let page = parse_query_response(&body, PardotObject::Visit).unwrap();
    assert_eq!(page.total_results, 2);
    assert_eq!(page.rows, vec![json!({"id": 1}), json!({"id": 2})]);
}

#[test]
fn test_parse_single_record_object() {
    let body = ok_body("visitor_activity", 1, json!({"id": 7, "type": 2}));
    let page = parse_query_response(&body, PardotObject::VisitorActivity).unwrap();
    assert_eq!(page.total_results, 1);
    assert_eq!(page.rows, vec![json!({"id": 7, "type": 2})]);
}

#[test]
fn test_parse_missing_record_key_is_empty() {
    let body = json!({"@attributes": {"stat": "ok"}, "result": {"total_results": 0}});
    let page = parse_query_response(&body, PardotObject::Prospect).unwrap();
    assert_eq!(page.total_results, 0);
    assert!(page.rows.is_empty());
}

#[test]
fn test_parse_string_total() {
    let body = json!({"result": {"total_results": "12", "prospect": []}});
    let page = parse_query_response(&body, PardotObject::Prospect).unwrap();
    assert_eq!(page.total_results, 12);
}

#[test]
fn test_parse_stat_fail() {
    let err = parse_query_response(&fail_body(15, "Login failed"), PardotObject::Prospect)
        .unwrap_err();
    assert!(matches!(err, Error::Api { code: 15, ref message } if message == "Login failed"));
    assert_eq!(err.to_string(), "Error #15: Login failed");
}

#[test]
fn test_parse_stat_fail_without_code() {
    let body = json!({"@attributes": {"stat": "fail"}, "err": "whatever"});
    let err = parse_query_response(&body, PardotObject::Prospect).unwrap_err();
    assert!(matches!(err, Error::Api { code: 0, ref message } if message == UNKNOWN_API_ERROR));
}

#[test]
fn test_parse_missing_result() {
    let err = parse_query_response(&json!({"foo": 1}), PardotObject::Visit).unwrap_err();
    assert!(matches!(err, Error::Decode { .. }));
}

#[test]
fn test_prospect_ids_unique_sorted_as_strings() {
    let records = vec![
        json!({"id": 9}),
        json!({"id": 10}),
        json!({"id": 9}),
        json!({"id": "100"}),
        json!({"email": "no-id@example.com"}),
    ];
    assert_eq!(prospect_ids(&records), vec!["10", "100", "9"]);
    assert!(prospect_ids(&[]).is_empty());
}

#[test]
fn test_object_paths() {
    assert_eq!(PardotObject::VisitorActivity.path_segment(), "visitorActivity");
    assert_eq!(PardotObject::VisitorActivity.record_key(), "visitor_activity");
    assert_eq!(PardotObject::Prospect.to_string(), "prospects");
    assert_eq!(PardotV5::object_path("visitor-activities"), "api/v5/objects/visitor-activities");
}

#[test]
fn test_date_range_only_sets_present_bounds() {
    let mut params = StringMap::new();
    DateRange::new(Some("2024-01-01".to_string()), None).apply(&mut params);
    assert_eq!(params.get("updated_after").map(String::as_str), Some("2024-01-01"));
    assert!(!params.contains_key("updated_before"));
}

// ============================================================================
// Query adapter
// ============================================================================

#[tokio::test]
async fn test_query_sends_page_window_and_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(QUERY_PATH_PROSPECT))
        .and(query_param("format", "json"))
        .and(query_param("offset", "200"))
        .and(query_param("limit", "200"))
        .and(query_param("sort_by", "updated_at"))
        .and(header("Authorization", "Bearer test-token"))
        .and(header("Pardot-Business-Unit-Id", "0Uv000000000001"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(ok_body("prospect", 201, rows(200..201))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = PardotClient::from_config(&test_config(&server)).unwrap();
    let source = PardotQuery::new(&client, PardotObject::Prospect);
    let mut params = StringMap::new();
    params.insert("sort_by".to_string(), "updated_at".to_string());

    let page = source
        .fetch_page(&PageRequest::new(params, 200, 200))
        .await
        .unwrap();
    assert_eq!(page.total_results, 201);
    assert_eq!(page.rows.len(), 1);
    assert_eq!(source.name(), "prospects");
}

#[tokio::test]
async fn test_query_http_error_with_fail_body_is_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(QUERY_PATH_VISIT))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(fail_body(184, "Access token is invalid")),
        )
        .mount(&server)
        .await;

    let client = PardotClient::from_config(&test_config(&server)).unwrap();
    let err = client
        .query(PardotObject::Visit, &PageRequest::new(StringMap::new(), 0, 200))
        .await
        .unwrap_err();
    assert!(err.is_api());
    assert_eq!(err.to_string(), "Error #184: Access token is invalid");
}

#[tokio::test]
async fn test_query_http_error_without_fail_body_is_transport() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(QUERY_PATH_VISIT))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .expect(1)
        .mount(&server)
        .await;

    let client = PardotClient::from_config(&test_config(&server)).unwrap();
    let err = client
        .query(PardotObject::Visit, &PageRequest::new(StringMap::new(), 0, 200))
        .await
        .unwrap_err();
    assert!(err.is_transport());
    assert!(matches!(err, Error::HttpStatus { status: 502, .. }));
}

#[tokio::test]
async fn test_refresh_token_exchanged_on_first_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/services/oauth2/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("client_id=key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "refreshed",
            "instance_url": "https://example.my.salesforce.com"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(QUERY_PATH_PROSPECT))
        .and(header("Authorization", "Bearer refreshed"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body("prospect", 0, json!([]))))
        .expect(2)
        .mount(&server)
        .await;

    let mut config = test_config(&server);
    config.access_token = None;
    config.client_id = Some("key".to_string());
    config.client_secret = Some("secret".to_string());
    config.refresh_token = Some("refresh".to_string());
    config.validate().unwrap();

    let client = PardotClient::from_config(&config).unwrap();
    let request = PageRequest::new(StringMap::new(), 0, 200);
    client.query(PardotObject::Prospect, &request).await.unwrap();
    client.query(PardotObject::Prospect, &request).await.unwrap();
}

// ============================================================================
// Operations
// ============================================================================

#[tokio::test]
async fn test_get_active_prospects_pages_and_ids() {
    let server = MockServer::start().await;
    for (offset, range) in [("0", 0..2), ("2", 2..4), ("4", 4..5)] {
        Mock::given(method("GET"))
            .and(path(QUERY_PATH_PROSPECT))
            .and(query_param("offset", offset))
            .and(query_param("limit", "2"))
            .and(query_param("updated_after", "2024-01-01"))
            .and(query_param("updated_before", "2024-01-31"))
            .and(query_param("fields", DEFAULT_PROSPECT_FIELDS))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(ok_body("prospect", 5, rows(range))),
            )
            .expect(1)
            .mount(&server)
            .await;
    }

    let mut config = test_config(&server);
    config.fetch.page_size = 2;
    let mut pardot = Pardot::from_config(&config).unwrap();
    pardot.set_dates(Some("2024-01-01".to_string()), Some("2024-01-31".to_string()));

    let (result, ids) = pardot.get_active_prospects(None).await.unwrap();
    assert_eq!(result.len(), 5);
    assert_eq!(result.pages(), 3);
    assert_eq!(ids, vec!["0", "1", "2", "3", "4"]);
}

#[tokio::test]
async fn test_get_active_prospects_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(QUERY_PATH_PROSPECT))
        .and(query_param("fields", "id,email"))
        .and(query_param_is_missing("updated_after"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "@attributes": {"stat": "ok"},
            "result": {"total_results": 0}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let pardot = Pardot::from_config(&test_config(&server)).unwrap();
    let (result, ids) = pardot.get_active_prospects(Some("id,email")).await.unwrap();
    assert!(result.is_empty());
    assert!(ids.is_empty());
}

#[tokio::test]
async fn test_get_visits_batches_ids() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(QUERY_PATH_VISIT))
        .and(query_param("prospect_ids", "1,2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body("visit", 2, rows(100..102))))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(QUERY_PATH_VISIT))
        .and(query_param("prospect_ids", "3"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(ok_body("visit", 1, json!({"id": 102}))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut config = test_config(&server);
    config.fetch.chunk_size = 2;
    let pardot = Pardot::from_config(&config).unwrap();

    let ids: Vec<String> = ["1", "2", "3"].iter().map(ToString::to_string).collect();
    let result = pardot.get_visits(&ids).await.unwrap();
    let got: Vec<Value> = result.into_records();
    assert_eq!(got, vec![json!({"id": 100}), json!({"id": 101}), json!({"id": 102})]);
}

#[tokio::test]
async fn test_get_visits_without_ids_makes_no_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let pardot = Pardot::from_config(&test_config(&server)).unwrap();
    let result = pardot.get_visits(&[]).await.unwrap();
    assert!(result.is_empty());
    assert_eq!(result.pages(), 0);
}

#[tokio::test]
async fn test_get_activities_updated() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(QUERY_PATH_ACTIVITY))
        .and(query_param("prospect_only", "true"))
        .and(query_param("type", DEFAULT_ACTIVITY_TYPES))
        .and(query_param("updated_after", "2024-02-01"))
        .and(query_param_is_missing("prospect_id"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(ok_body("visitor_activity", 3, rows(0..3))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut config = test_config(&server);
    config.date_from = Some("2024-02-01".to_string());
    let pardot = Pardot::from_config(&config).unwrap();

    let result = pardot.get_activities(ActivityScope::Updated).await.unwrap();
    assert_eq!(result.len(), 3);
    assert_eq!(result.reported_total(), Some(3));
}

#[tokio::test]
async fn test_get_activities_by_prospects() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(QUERY_PATH_ACTIVITY))
        .and(query_param("prospect_id", "10,11"))
        .and(query_param("type", "2"))
        .and(query_param_is_missing("prospect_only"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(ok_body("visitor_activity", 1, json!([{"id": 5}]))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let pardot = Pardot::from_config(&test_config(&server))
        .unwrap()
        .with_activity_types("2");
    let ids = vec!["10".to_string(), "11".to_string()];

    let result = pardot
        .get_activities(ActivityScope::ByProspects(&ids))
        .await
        .unwrap();
    assert_eq!(result.records(), &[json!({"id": 5})]);
}

#[tokio::test]
async fn test_api_failure_aborts_batched_fetch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(QUERY_PATH_VISIT))
        .and(query_param("prospect_ids", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body("visit", 1, rows(0..1))))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(QUERY_PATH_VISIT))
        .and(query_param("prospect_ids", "2"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(fail_body(66, "Daily API rate limit met")),
        )
        .mount(&server)
        .await;

    let mut config = test_config(&server);
    config.fetch.chunk_size = 1;
    let pardot = Pardot::from_config(&config).unwrap();

    let err = pardot
        .get_visits(&["1".to_string(), "2".to_string()])
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Api { code: 66, .. }));
}

#[tokio::test]
async fn test_query_adapter_with_paged_fetcher() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(QUERY_PATH_PROSPECT))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body("prospect", 0, json!(null))))
        .expect(1)
        .mount(&server)
        .await;

    let client = PardotClient::from_config(&test_config(&server)).unwrap();
    let source = PardotQuery::new(&client, PardotObject::Prospect);
    let result = PagedFetcher::default()
        .fetch_all(&source, &StringMap::new())
        .await
        .unwrap();
    assert!(result.is_empty());
    assert_eq!(result.pages(), 1);
}

// ============================================================================
// v5
// ============================================================================

#[tokio::test]
async fn test_v5_follows_next_page_url() {
    let server = MockServer::start().await;
    let next = format!("{}/api/v5/objects/prospects?nextPageToken=abc", server.uri());

    Mock::given(method("GET"))
        .and(path("/api/v5/objects/prospects"))
        .and(query_param("fields", "id,email"))
        .and(query_param_is_missing("nextPageToken"))
        .and(header("Pardot-Business-Unit-Id", "0Uv000000000001"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "values": [{"id": 1}, {"id": 2}],
            "nextPageUrl": next
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v5/objects/prospects"))
        .and(query_param("nextPageToken", "abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "values": [{"id": 3}],
            "nextPageUrl": null
        })))
        .expect(1)
        .mount(&server)
        .await;

    let v5 = PardotV5::from_config(&test_config(&server)).unwrap();
    let mut params = StringMap::new();
    params.insert("fields".to_string(), "id,email".to_string());

    let result = v5.get("prospects", &params).await.unwrap();
    assert_eq!(result.pages(), 2);
    assert_eq!(
        result.into_records(),
        vec![json!({"id": 1}), json!({"id": 2}), json!({"id": 3})]
    );
}

#[tokio::test]
async fn test_v5_error_body_is_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v5/objects/visits"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({"code": 181, "message": "Invalid fields"})),
        )
        .mount(&server)
        .await;

    let v5 = PardotV5::from_config(&test_config(&server)).unwrap();
    let err = v5.get("visits", &StringMap::new()).await.unwrap_err();
    assert_eq!(err.to_string(), "Error #181: Invalid fields");
}

#[tokio::test]
async fn test_v5_error_without_code_uses_defaults() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v5/objects/visits"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "boom"})))
        .mount(&server)
        .await;

    let v5 = PardotV5::from_config(&test_config(&server)).unwrap();
    let err = v5.get("visits", &StringMap::new()).await.unwrap_err();
    assert!(matches!(err, Error::Api { code: 0, ref message } if message == UNKNOWN_API_ERROR));
}

#[test]
fn test_v5_record_cap_detection() {
    assert!(reached_record_cap(V5_RECORD_CAP));
    assert!(reached_record_cap(100_000));
    assert!(!reached_record_cap(99_999));
    assert!(!reached_record_cap(100_001));
    assert!(!reached_record_cap(0));
}

#[tokio::test]
async fn test_v5_listing_stops_at_record_cap() {
    let server = MockServer::start().await;
    let half: Vec<Value> = (0..V5_RECORD_CAP / 2).map(|i| json!({"id": i})).collect();
    let next = format!("{}/api/v5/objects/visits?nextPageToken=half", server.uri());

    Mock::given(method("GET"))
        .and(path("/api/v5/objects/visits"))
        .and(query_param_is_missing("nextPageToken"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"values": half, "nextPageUrl": next})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v5/objects/visits"))
        .and(query_param("nextPageToken", "half"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"values": half, "nextPageUrl": null})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let v5 = PardotV5::from_config(&test_config(&server)).unwrap();
    let result = v5.get("visits", &StringMap::new()).await.unwrap();

    assert_eq!(result.len(), V5_RECORD_CAP);
    assert_eq!(result.pages(), 2);
    assert!(reached_record_cap(result.len()));
}
