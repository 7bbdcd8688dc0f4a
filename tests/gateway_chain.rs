//! End-to-end: loader and both gateways against a mocked Meilisearch.

use serde_json::{json, Value};
use std::io::Write;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use track_search::config::{EmbeddedSettings, IndexSettings, LoaderSettings};
use track_search::gateway::{create_router, IndexBackend, ProxyBackend};
use track_search::loader::Loader;
use track_search::network::HttpClient;
use track_search::{MeiliClient, TantivyIndex};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn index_client(meili: &MockServer) -> MeiliClient {
    let settings = IndexSettings {
        url: meili.uri(),
        ..Default::default()
    };
    MeiliClient::new(HttpClient::new().unwrap(), &settings)
}

async fn spawn(router: axum::Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

async fn start_chain(meili: &MockServer) -> (SocketAddr, SocketAddr) {
    let core = create_router(
        Arc::new(IndexBackend::new(Arc::new(index_client(meili)))),
        "http://localhost:8080",
    )
    .unwrap();
    let core_addr = spawn(core).await;

    let proxy_backend =
        ProxyBackend::new(HttpClient::new().unwrap(), &format!("http://{}", core_addr)).unwrap();
    let proxy = create_router(Arc::new(proxy_backend), "http://localhost:8081").unwrap();
    let proxy_addr = spawn(proxy).await;

    (core_addr, proxy_addr)
}

async fn fetch(url: String) -> (u16, Vec<u8>) {
    let response = reqwest::get(url).await.unwrap();
    let status = response.status().as_u16();
    (status, response.bytes().await.unwrap().to_vec())
}

#[tokio::test]
async fn test_core_and_proxy_return_identical_bodies() {
    let meili = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/indexes/tracks/search"))
        .and(body_json(json!({"q": "love"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "hits": [{"track_id": "1", "title": "Love Song"}],
            "query": "love"
        })))
        .expect(2)
        .mount(&meili)
        .await;

    let (core, proxy) = start_chain(&meili).await;

    let (core_status, core_body) = fetch(format!("http://{}/search?query=love", core)).await;
    let (proxy_status, proxy_body) = fetch(format!("http://{}/search?query=love", proxy)).await;

    assert_eq!(core_status, 200);
    assert_eq!(proxy_status, 200);
    assert_eq!(
        serde_json::from_slice::<Value>(&core_body).unwrap(),
        json!({"result": [{"track_id": "1", "title": "Love Song"}]})
    );
    assert_eq!(proxy_body, core_body);
}

#[tokio::test]
async fn test_missing_query_short_circuits_both_hops() {
    let meili = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&meili)
        .await;

    let (core, proxy) = start_chain(&meili).await;

    for addr in [core, proxy] {
        for uri in ["/search", "/search?query=", "/search?query=love&query="] {
            let (status, body) = fetch(format!("http://{}{}", addr, uri)).await;
            assert_eq!(status, 200, "{} on {}", uri, addr);
            assert_eq!(body, br#"{"result":null}"#, "{} on {}", uri, addr);
        }
    }
}

#[tokio::test]
async fn test_index_outage_surfaces_as_500_through_proxy() {
    let meili = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/indexes/tracks/search"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&meili)
        .await;

    let (_, proxy) = start_chain(&meili).await;

    let (status, _) = fetch(format!("http://{}/search?query=love", proxy)).await;
    assert_eq!(status, 500);
}

#[tokio::test]
async fn test_loader_submits_every_row() {
    let meili = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/indexes/tracks/documents"))
        .and(body_json(json!([
            {"track_id": "42", "title": "Song Title"},
            {"track_id": "7", "title": "Another"}
        ])))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({
            "taskUid": 11,
            "indexUid": "tracks",
            "status": "enqueued"
        })))
        .expect(1)
        .mount(&meili)
        .await;
    Mock::given(method("GET"))
        .and(path("/tasks/11"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "uid": 11,
            "status": "succeeded"
        })))
        .mount(&meili)
        .await;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"42,artist-x,Song Title\n7,artist-y,Another\n")
        .unwrap();

    let settings = LoaderSettings {
        path: file.path().to_path_buf(),
        poll_interval_ms: 1,
        ..Default::default()
    };
    let report = Loader::new(Arc::new(index_client(&meili)), settings)
        .run()
        .await
        .unwrap();

    assert_eq!(report.records, 2);
    assert_eq!(report.documents, 2);
    assert_eq!(report.task.uid, 11);
}

#[tokio::test]
async fn test_slow_batch_upload_is_not_cut_off() {
    let meili = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/indexes/tracks/documents"))
        .respond_with(
            ResponseTemplate::new(202)
                .set_body_json(json!({"taskUid": 4, "status": "succeeded"}))
                .set_delay(Duration::from_secs(6)),
        )
        .expect(1)
        .mount(&meili)
        .await;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"1,a,Slow Song\n").unwrap();

    let settings = LoaderSettings {
        path: file.path().to_path_buf(),
        ..Default::default()
    };
    let report = Loader::new(Arc::new(index_client(&meili)), settings)
        .run()
        .await
        .unwrap();

    assert_eq!(report.documents, 1);
    assert_eq!(report.task.uid, 4);
}

#[tokio::test]
async fn test_repeated_query_uses_last_value_through_proxy() {
    let meili = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/indexes/tracks/search"))
        .and(body_json(json!({"q": "b"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "hits": [{"track_id": "2", "title": "B Side"}]
        })))
        .expect(1)
        .mount(&meili)
        .await;

    let (_, proxy) = start_chain(&meili).await;

    let (status, body) = fetch(format!("http://{}/search?query=a&query=b", proxy)).await;
    assert_eq!(status, 200);
    assert_eq!(
        serde_json::from_slice::<Value>(&body).unwrap(),
        json!({"result": [{"track_id": "2", "title": "B Side"}]})
    );
}

#[tokio::test]
async fn test_embedded_core_serves_loaded_tracks_through_proxy() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"42,artist-x,Love Song\n7,artist-y,Blue Moon\n")
        .unwrap();

    let index_settings = IndexSettings {
        embedded: EmbeddedSettings {
            path: None,
            ..Default::default()
        },
        ..Default::default()
    };
    let index = Arc::new(TantivyIndex::open(&index_settings).unwrap());
    let loader_settings = LoaderSettings {
        path: file.path().to_path_buf(),
        ..Default::default()
    };
    let report = Loader::new(index.clone(), loader_settings)
        .run()
        .await
        .unwrap();
    assert_eq!(report.documents, 2);
    assert_eq!(index.num_docs(), 2);

    let core = create_router(Arc::new(IndexBackend::new(index)), "http://localhost:8080").unwrap();
    let core_addr = spawn(core).await;
    let proxy_backend =
        ProxyBackend::new(HttpClient::new().unwrap(), &format!("http://{}", core_addr)).unwrap();
    let proxy_addr = spawn(create_router(Arc::new(proxy_backend), "http://localhost:8081").unwrap()).await;

    let (core_status, core_body) = fetch(format!("http://{}/search?query=LOVE", core_addr)).await;
    let (_, proxy_body) = fetch(format!("http://{}/search?query=LOVE", proxy_addr)).await;

    assert_eq!(core_status, 200);
    assert_eq!(proxy_body, core_body);
    let body: Value = serde_json::from_slice(&core_body).unwrap();
    let hits = body["result"].as_array().unwrap();
    assert!(hits
        .iter()
        .any(|hit| hit["track_id"] == "42" && hit["title"] == "Love Song"));
}
