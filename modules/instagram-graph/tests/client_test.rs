//! GraphClient against a local mock of the Graph API.
//! Checks request shape (token placement, cache hint, params) and error unwrapping.

use instagram_graph::{ContainerRequest, GraphClient, GraphError, MediaType, PublishKind};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "test-token";

async fn client_for(server: &MockServer) -> GraphClient {
    GraphClient::new().unwrap().with_base_url(server.uri())
}

#[tokio::test]
async fn profile_sends_token_as_query_param_with_cache_hint() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/me"))
        .and(query_param("access_token", TOKEN))
        .and(query_param("fields", "id,username,account_type,media_count"))
        .and(header("cache-control", "public, max-age=900"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "17841400000",
            "username": "cerqueira.psicologia",
            "account_type": "BUSINESS",
            "media_count": 42
        })))
        .expect(1)
        .mount(&server)
        .await;

    let profile = client_for(&server).await.fetch_profile(TOKEN).await.unwrap();
    assert_eq!(profile.username, "cerqueira.psicologia");
    assert_eq!(profile.media_count, Some(42));
}

#[tokio::test]
async fn token_is_never_sent_as_authorization_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "1", "username": "u"
        })))
        .mount(&server)
        .await;

    client_for(&server).await.verify_credential(TOKEN).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn media_page_forwards_limit_and_after() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/me/media"))
        .and(query_param("limit", "10"))
        .and(query_param("after", "QVFIUmx"))
        .and(query_param("access_token", TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                { "id": "1", "media_type": "IMAGE", "media_url": "A" },
                { "id": "2", "media_type": "VIDEO", "thumbnail_url": "B" }
            ],
            "paging": { "cursors": { "before": "x", "after": "next-cursor" } }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let page = client_for(&server)
        .await
        .fetch_media_page(TOKEN, 10, Some("QVFIUmx"))
        .await
        .unwrap();
    assert_eq!(page.data.len(), 2);
    assert_eq!(page.next_cursor(), Some("next-cursor"));
}

#[tokio::test]
async fn media_page_omits_after_when_absent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/me/media"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .mount(&server)
        .await;

    client_for(&server)
        .await
        .fetch_media_page(TOKEN, 25, None)
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let query = requests[0].url.query().unwrap_or_default().to_string();
    assert!(query.contains("limit=25"));
    assert!(!query.contains("after="));
    assert!(query.contains("children"));
}

#[tokio::test]
async fn single_item_fetch_decodes_carousel() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/1790"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "1790",
            "media_type": "CAROUSEL_ALBUM",
            "caption": "Semana da saúde mental",
            "children": { "data": [
                { "id": "a", "media_type": "IMAGE", "media_url": "A" },
                { "id": "b", "media_type": "VIDEO", "thumbnail_url": "B" }
            ]}
        })))
        .mount(&server)
        .await;

    let item = client_for(&server)
        .await
        .fetch_media_item(TOKEN, "1790")
        .await
        .unwrap();
    assert_eq!(item.media_type, MediaType::CarouselAlbum);
    assert_eq!(item.children.unwrap().data.len(), 2);
}

#[tokio::test]
async fn error_message_is_extracted_from_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/me"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {
                "message": "Invalid OAuth access token",
                "type": "OAuthException",
                "code": 190
            }
        })))
        .mount(&server)
        .await;

    let err = client_for(&server).await.fetch_profile(TOKEN).await.unwrap_err();
    match &err {
        GraphError::Api { status, message } => {
            assert_eq!(*status, 400);
            assert_eq!(message, "Invalid OAuth access token");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.is_credential_error());
}

#[tokio::test]
async fn non_json_error_gets_generic_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/me"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>bad gateway</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server).await.fetch_profile(TOKEN).await.unwrap_err();
    assert_eq!(err.to_string(), "HTTP error 502");
    assert!(!err.is_credential_error());
}

#[tokio::test]
async fn garbage_success_body_is_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/me"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client_for(&server).await.fetch_profile(TOKEN).await.unwrap_err();
    assert!(matches!(err, GraphError::Parse(_)));
}

#[tokio::test]
async fn container_then_publish() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/me/media"))
        .and(query_param("image_url", "https://cdn/photo.jpg"))
        .and(query_param("caption", "Nova sala"))
        .and(query_param("access_token", TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "container-1" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/me/media_publish"))
        .and(query_param("creation_id", "container-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "media-1" })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let container = client
        .create_media_container(
            TOKEN,
            &ContainerRequest {
                kind: PublishKind::Image,
                media_url: "https://cdn/photo.jpg".into(),
                caption: Some("Nova sala".into()),
            },
        )
        .await
        .unwrap();
    assert_eq!(container, "container-1");

    let media_id = client.publish_media(TOKEN, &container).await.unwrap();
    assert_eq!(media_id, "media-1");
}

#[tokio::test]
async fn update_caption_reports_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/555"))
        .and(query_param("caption", "Atualizado"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .mount(&server)
        .await;

    let ok = client_for(&server)
        .await
        .update_caption(TOKEN, "555", "Atualizado")
        .await
        .unwrap();
    assert!(ok);
}
