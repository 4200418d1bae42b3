//! Integration tests for `MapboxClient` using wiremock HTTP mocks.

use ukaddr_core::{classify, Coordinates, ProviderTag, SearchOptions};
use ukaddr_providers::{build_client, MapboxClient, ProviderError};
use wiremock::matchers::{method, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> MapboxClient {
    let http = build_client(5, "ukaddr-test").expect("http client");
    MapboxClient::with_base_url(http, "pk.test-token", base_url)
        .expect("client construction should not fail")
}

fn two_features() -> serde_json::Value {
    serde_json::json!({
        "type": "FeatureCollection",
        "features": [
            {
                "id": "address.1",
                "text": "Barrack Street",
                "address": "3",
                "place_name": "3 Barrack Street, Hamilton, ML3 0HS, United Kingdom",
                "center": [-4.039, 55.7772],
                "context": [
                    { "id": "postcode.1", "text": "ml3 0hs" },
                    { "id": "place.1", "text": "Hamilton" }
                ]
            },
            {
                "id": "address.2",
                "text": "Barrack Street",
                "place_name": "Barrack Street, Hamilton, United Kingdom",
                "center": [-4.04, 55.777],
                "context": [{ "id": "place.1", "text": "Hamilton" }]
            }
        ]
    })
}

#[tokio::test]
async fn search_sends_uk_parameters_and_ranks_complete_first() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/geocoding/v5/mapbox\.places/.+\.json$"))
        .and(query_param("access_token", "pk.test-token"))
        .and(query_param("country", "GB"))
        .and(query_param("types", "address,poi"))
        .and(query_param("limit", "5"))
        .and(query_param("bbox", "-8.2,49.9,1.8,60.9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(two_features()))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let results = client
        .search(&classify("Barrack Street"), &SearchOptions::default())
        .await
        .expect("should parse features");

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].priority, 8);
    assert_eq!(results[1].priority, 5);
    assert!(results[0].confidence > results[1].confidence);
    assert_eq!(results[0].address.line1, "3 Barrack Street");
    assert_eq!(results[0].postcode.as_deref(), Some("ML3 0HS"));
    assert_eq!(results[0].provider, ProviderTag::Mapbox);
    assert_eq!(results[0].center, Some([-4.039, 55.7772]));
}

#[tokio::test]
async fn postcode_search_requests_postcode_type_with_proximity() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/geocoding/v5/mapbox\.places/.+\.json$"))
        .and(query_param("types", "postcode"))
        .and(query_param("proximity", "-4.039,55.7772"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "features": [{
                "id": "postcode.9",
                "text": "ML3 0HS",
                "place_name": "ML3 0HS, Hamilton, United Kingdom",
                "center": [-4.039, 55.7772]
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let options = SearchOptions {
        proximity: Some(Coordinates {
            lat: 55.7772,
            lng: -4.039,
        }),
        ..SearchOptions::default()
    };
    let results = test_client(&server.uri())
        .search(&classify("ml30hs"), &options)
        .await
        .expect("should parse postcode feature");

    assert_eq!(results.len(), 1);
    assert!(results[0].is_postcode_match);
    assert_eq!(results[0].postcode.as_deref(), Some("ML3 0HS"));
}

#[tokio::test]
async fn unauthorized_maps_to_invalid_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "message": "Not Authorized - Invalid Token"
        })))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .search(&classify("Barrack Street"), &SearchOptions::default())
        .await
        .unwrap_err();

    assert!(
        matches!(err, ProviderError::InvalidToken { .. }),
        "unexpected error: {err:?}"
    );
    assert!(err.to_string().contains("MAPBOX_TOKEN"));
}

#[tokio::test]
async fn server_error_is_unexpected_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .search(&classify("Barrack Street"), &SearchOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ProviderError::UnexpectedStatus { status: 503, .. }
    ));
}

#[test]
fn blank_token_is_rejected() {
    let http = build_client(5, "ukaddr-test").expect("http client");
    let err = MapboxClient::new(http, "  ").err().expect("blank token must fail");
    assert!(matches!(err, ProviderError::MissingCredential { .. }));
}
