//! Integration tests for the PAF backends and the `PafClient` fallback order.

use ukaddr_core::{classify, BuildingType, ProviderTag};
use ukaddr_providers::paf::PafSource;
use ukaddr_providers::{
    build_client, IdealPostcodesClient, LoqateClient, PafClient, ProviderError, RoyalMailClient,
};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FIND: &str = "/Capture/Interactive/Find/v1.1/json3.ws";
const RETRIEVE: &str = "/Capture/Interactive/Retrieve/v1.2/json3.ws";

fn http() -> reqwest::Client {
    build_client(5, "ukaddr-test").expect("http client")
}

fn loqate(base_url: &str) -> LoqateClient {
    LoqateClient::with_base_url(http(), "loqate-key", base_url).expect("loqate client")
}

fn ideal(base_url: &str) -> IdealPostcodesClient {
    IdealPostcodesClient::with_base_url(http(), "ideal-key", base_url).expect("ideal client")
}

fn royal_mail(base_url: &str) -> RoyalMailClient {
    RoyalMailClient::with_base_url(http(), "rm-key", base_url).expect("royal mail client")
}

#[tokio::test]
async fn loqate_postcode_search_retrieves_first_find_match() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(FIND))
        .and(query_param("Key", "loqate-key"))
        .and(query_param("Text", "ML3 0HS"))
        .and(query_param("Country", "GB"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "Items": [
                { "Id": "GB|ML3-0HS", "Type": "Postcode", "Text": "ML3 0HS", "Description": "Barrack Street, Hamilton - 5 Addresses" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(RETRIEVE))
        .and(query_param("Id", "GB|ML3-0HS"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "Items": [
                {
                    "Id": "GB|RM|A|1",
                    "Line1": "Flat 1",
                    "Line2": "7 Barrack Street",
                    "City": "Hamilton",
                    "Province": "South Lanarkshire",
                    "PostalCode": "ML3 0HS",
                    "Latitude": 55.7772,
                    "Longitude": -4.039
                },
                {
                    "Id": "GB|RM|A|2",
                    "Line1": "3 Barrack Street",
                    "City": "Hamilton",
                    "PostalCode": "ML3 0HS"
                }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let results = loqate(&server.uri())
        .search(&classify("ml3 0hs"), 5)
        .await
        .expect("loqate search should succeed");

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].building_type, BuildingType::Flat);
    assert_eq!(results[0].sub_building.as_deref(), Some("Flat 1"));
    assert_eq!(results[1].building_type, BuildingType::House);
    assert!(results.iter().all(|r| r.source == PafSource::Loqate));
    assert!(results
        .iter()
        .all(|r| r.postcode.as_deref() == Some("ML3 0HS")));
}

#[tokio::test]
async fn loqate_address_search_retrieves_each_match() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(FIND))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "Items": [
                { "Id": "A1", "Type": "Address", "Text": "1 Barrack Street" },
                { "Id": "A2", "Type": "Address", "Text": "3 Barrack Street" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(RETRIEVE))
        .and(query_param("Id", "A1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "Items": [{
                "Id": "A1",
                "Label": "1 Barrack Street\nOffice 2.18\nHamilton\nSouth Lanarkshire\nML3 0HS"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(RETRIEVE))
        .and(query_param("Id", "A2"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let results = loqate(&server.uri())
        .search(&classify("Barrack Street Hamilton"), 5)
        .await
        .expect("a failed retrieve only drops that match");

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].line1, "1 Barrack Street");
    assert_eq!(results[0].building_type, BuildingType::House);
    assert_eq!(results[0].postcode.as_deref(), Some("ML3 0HS"));
}

#[tokio::test]
async fn loqate_error_item_is_api_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(FIND))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "Items": [{ "Error": "2", "Description": "Unknown key", "Cause": "The key you are using to access the service was not found." }]
        })))
        .mount(&server)
        .await;

    let err = loqate(&server.uri())
        .search(&classify("ML3 0HS"), 5)
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::ApiStatus { .. }), "{err:?}");
}

#[tokio::test]
async fn ideal_postcodes_lists_postcode_addresses() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/postcodes/ML3%200HS"))
        .and(query_param("api_key", "ideal-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "code": 2000,
            "message": "Success",
            "result": [
                {
                    "line_1": "5 Barrack Street",
                    "line_2": "",
                    "line_3": "",
                    "post_town": "HAMILTON",
                    "county": "Lanarkshire",
                    "postcode": "ML3 0HS",
                    "latitude": 55.7772,
                    "longitude": -4.039
                }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let results = ideal(&server.uri())
        .search(&classify("ML3 0HS"))
        .await
        .expect("ideal postcodes search should succeed");

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, "ideal-ML30HS-0");
    assert_eq!(results[0].line2, None);
    assert_eq!(results[0].source, PafSource::IdealPostcodes);
}

#[tokio::test]
async fn ideal_postcodes_skips_free_text() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let results = ideal(&server.uri())
        .search(&classify("Barrack Street"))
        .await
        .expect("free text is a no-op");
    assert!(results.is_empty());
}

#[tokio::test]
async fn royal_mail_posts_with_bearer_auth() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/addresses"))
        .and(header("authorization", "Bearer rm-key"))
        .and(body_json(serde_json::json!({ "postcode": "ML3 0HS", "limit": 5 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "addresses": [
                { "line1": "Barrack Street Business Centre", "line2": "Barrack Street", "city": "Hamilton", "county": "South Lanarkshire" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let results = royal_mail(&server.uri())
        .search(&classify("ML3 0HS"), 5)
        .await
        .expect("royal mail search should succeed");

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].building_type, BuildingType::Commercial);
    assert!(results[0].coordinates.is_none());
    assert_eq!(results[0].source, PafSource::RoyalMail);
}

#[tokio::test]
async fn paf_client_falls_through_to_next_backend() {
    let loqate_server = MockServer::start().await;
    let ideal_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(FIND))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&loqate_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/postcodes/ML3%200HS"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "result": [
                { "line_1": "3 Barrack Street", "post_town": "HAMILTON", "postcode": "ML3 0HS" }
            ]
        })))
        .expect(1)
        .mount(&ideal_server)
        .await;

    let paf = PafClient::default()
        .with_loqate(loqate(&loqate_server.uri()))
        .with_ideal_postcodes(ideal(&ideal_server.uri()));

    let suggestions = paf
        .search_suggestions(&classify("ML3 0HS"), 5)
        .await
        .expect("backend errors are absorbed");

    assert_eq!(suggestions.len(), 1);
    assert_eq!(suggestions[0].provider, ProviderTag::IdealPostcodes);
    assert_eq!(suggestions[0].priority, 10);
    assert!(suggestions[0].is_postcode_match);
}

#[tokio::test]
async fn unconfigured_paf_client_reports_missing_credential() {
    let paf = PafClient::default();
    assert!(!paf.is_configured());
    let err = paf.search(&classify("ML3 0HS"), 5).await.unwrap_err();
    assert!(matches!(err, ProviderError::MissingCredential { .. }));
}
