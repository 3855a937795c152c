use apiframe_client::{
    ApiframeClient, AppError, BlendDimension, BlendRequest, Config, DescribeRequest, ErrorKind, FaceswapRequest,
    FetchManyRequest, FetchRequest, ImagineRequest, InpaintRequest, OutpaintRequest, PanDirection, PanRequest,
    ProcessMode, RerollRequest, SeedRequest, Upscale1xRequest, UpscaleAltRequest, UpscaleAltType,
    UpscaleHighresRequest, UpscaleHighresType, VariationIndex, VariationsRequest,
};
use serde_json::{json, Value};
use wiremock::matchers::{any, body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API_KEY: &str = "test-api-key";

fn client_for(server: &MockServer) -> ApiframeClient {
    let cfg = Config::new(API_KEY).unwrap().with_base_url(server.uri());
    ApiframeClient::with_config(cfg)
}

/// Runs one call against every endpoint with valid input.
async fn call_every_endpoint(client: &ApiframeClient) -> Vec<(&'static str, Result<Value, AppError>)> {
    vec![
        ("imagine", client.imagine(ImagineRequest::new("a quiet harbour")).await),
        ("upscale_1x", client.upscale_1x(Upscale1xRequest::new("p1", 1)).await),
        ("upscale_alt", client.upscale_alt(UpscaleAltRequest::new("p1", UpscaleAltType::Subtle)).await),
        ("upscale_highres", client.upscale_highres(UpscaleHighresRequest::new("p1", UpscaleHighresType::X2)).await),
        ("reroll", client.reroll(RerollRequest::new("p1")).await),
        ("variations", client.variations(VariationsRequest::new("p1", VariationIndex::Image(4))).await),
        ("inpaint", client.inpaint(InpaintRequest::new("p1", "aGVsbG8=")).await),
        ("outpaint", client.outpaint(OutpaintRequest::new("p1", 2.0)).await),
        ("pan", client.pan(PanRequest::new("p1", PanDirection::Up)).await),
        ("describe", client.describe(DescribeRequest::new("https://img.example/a.png")).await),
        ("blend", client.blend(BlendRequest::new(["https://img.example/a.png", "https://img.example/b.png"])).await),
        ("seed", client.seed(SeedRequest::new("t1")).await),
        ("faceswap", client.faceswap(FaceswapRequest::new("https://img.example/a.png", "https://img.example/b.png")).await),
        ("fetch", client.fetch(FetchRequest::new("t1")).await),
        ("fetch_many", client.fetch_many(FetchManyRequest::new(["t1", "t2"])).await),
        ("account", client.account().await),
    ]
}

#[tokio::test]
async fn imagine_posts_defaults_with_auth_header() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/imagine"))
        .and(header("Authorization", API_KEY))
        .and(header("Content-Type", "application/json"))
        .and(body_json(json!({
            "prompt": "a quiet harbour at night",
            "aspect_ratio": "1:1",
            "process_mode": "fast"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"task_id": "task-1"})))
        .expect(1)
        .mount(&server)
        .await;

    let res = client_for(&server)
        .imagine(ImagineRequest::new("a quiet harbour at night"))
        .await
        .unwrap();
    assert_eq!(res, json!({"task_id": "task-1"}));
}

#[tokio::test]
async fn every_request_carries_the_api_key() {
    let server = MockServer::start().await;
    Mock::given(header("Authorization", API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"task_id": "ok"})))
        .expect(16)
        .mount(&server)
        .await;

    let client = client_for(&server);
    for (name, res) in call_every_endpoint(&client).await {
        assert!(res.is_ok(), "{} failed: {:?}", name, res.err());
    }
}

#[tokio::test]
async fn payloads_contain_exactly_the_set_fields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/variations"))
        .and(body_json(json!({
            "parent_task_id": "p1",
            "index": "subtle",
            "prompt": "warmer light",
            "aspect_ratio": "3:2",
            "webhook_url": "https://hooks.example/done",
            "webhook_secret": "shh"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"task_id": "v1"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/blend"))
        .and(body_json(json!({
            "image_urls": ["https://img.example/a.png", "https://img.example/b.png", "https://img.example/c.png"],
            "dimension": "portrait",
            "process_mode": "turbo"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"task_id": "b1"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/fetch-many"))
        .and(body_json(json!({"task_ids": ["t1", "t2", "t3"]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"tasks": []})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let variations = VariationsRequest::new("p1", VariationIndex::Subtle)
        .with_prompt("warmer light")
        .with_aspect_ratio("3:2")
        .with_webhook_url("https://hooks.example/done")
        .with_webhook_secret("shh");
    assert_eq!(client.variations(variations).await.unwrap()["task_id"], "v1");

    let blend = BlendRequest::new(["https://img.example/a.png", "https://img.example/b.png", "https://img.example/c.png"])
        .with_dimension(BlendDimension::Portrait)
        .with_process_mode(ProcessMode::Turbo);
    assert_eq!(client.blend(blend).await.unwrap()["task_id"], "b1");

    client.fetch_many(FetchManyRequest::new(["t1", "t2", "t3"])).await.unwrap();
}

#[tokio::test]
async fn account_is_a_get_without_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/account"))
        .and(header("Authorization", API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"email": "me@example.com", "credits": 120})))
        .expect(1)
        .mount(&server)
        .await;

    let res = client_for(&server).account().await.unwrap();
    assert_eq!(res["credits"], 120);

    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].method.to_string(), "GET");
    assert!(received[0].body.is_empty());
}

#[tokio::test]
async fn api_errors_surface_first_message_for_every_endpoint() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(
            ResponseTemplate::new(429).set_body_json(json!({"errors": [{"msg": "rate limited"}, {"msg": "ignored"}]})),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    for (name, res) in call_every_endpoint(&client).await {
        match res {
            Err(AppError::Api { status, message }) => {
                assert_eq!(status, 429, "{}", name);
                assert_eq!(message, "rate limited", "{}", name);
            }
            other => panic!("{}: expected Api error, got {:?}", name, other),
        }
    }
}

#[tokio::test]
async fn invalid_input_never_reaches_the_network() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"task_id": "should-not-happen"})))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let too_many: Vec<String> = (0..21).map(|i| format!("t{}", i)).collect();
    let failures = vec![
        client.imagine(ImagineRequest::new("hi")).await,
        client.imagine(ImagineRequest::new("x".repeat(1001))).await,
        client.imagine(ImagineRequest::new("a castle").with_aspect_ratio("16x9")).await,
        client.imagine(ImagineRequest::new("a castle").with_webhook_url("hooks/done")).await,
        client.upscale_1x(Upscale1xRequest::new("p1", 0)).await,
        client.upscale_1x(Upscale1xRequest::new("p1", 5)).await,
        client.variations(VariationsRequest::new("p1", VariationIndex::Image(7))).await,
        client.outpaint(OutpaintRequest::new("p1", 0.5)).await,
        client.inpaint(InpaintRequest::new("p1", "")).await,
        client.describe(DescribeRequest::new("not a url")).await,
        client.blend(BlendRequest::new(vec!["https://img.example/a.png"; 6])).await,
        client.seed(SeedRequest::new("")).await,
        client.fetch(FetchRequest::new("  ")).await,
        client.fetch_many(FetchManyRequest::new(["t1"])).await,
        client.fetch_many(FetchManyRequest::new(too_many)).await,
    ];
    for res in failures {
        assert_eq!(res.unwrap_err().kind(), ErrorKind::Validation);
    }
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn plain_text_error_body_is_used_as_message() {
    let server = MockServer::start().await;
    Mock::given(path("/fetch"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway upstream"))
        .mount(&server)
        .await;

    let err = client_for(&server).fetch(FetchRequest::new("t1")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Api);
    assert_eq!(err.message(), "bad gateway upstream");
}

#[tokio::test]
async fn empty_success_body_decodes_to_empty_object() {
    let server = MockServer::start().await;
    Mock::given(path("/seed"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let res = client_for(&server).seed(SeedRequest::new("t1")).await.unwrap();
    assert_eq!(res, json!({}));
}

#[tokio::test]
async fn malformed_success_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(path("/fetch"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server).fetch(FetchRequest::new("t1")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Decode);
}

#[tokio::test]
async fn verbose_client_still_returns_body_verbatim() {
    let server = MockServer::start().await;
    let body = json!({"task_id": "t9", "status": "finished", "image_urls": ["https://cdn.example/1.png"]});
    Mock::given(path("/fetch"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
        .mount(&server)
        .await;

    let cfg = Config::new(API_KEY).unwrap().with_base_url(server.uri()).with_verbose(true);
    let res = ApiframeClient::with_config(cfg).fetch(FetchRequest::new("t9")).await.unwrap();
    assert_eq!(res, body);
}

#[tokio::test]
async fn missing_api_key_fails_before_any_request() {
    let err = ApiframeClient::new("", true).err().unwrap();
    assert_eq!(err.kind(), ErrorKind::Config);
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    // Reserve a free port, then release it so the connection is refused.
    let addr = std::net::TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap();
    let cfg = Config::new(API_KEY).unwrap().with_base_url(format!("http://{}", addr));
    let client = ApiframeClient::with_config(cfg);

    let err = client.fetch(FetchRequest::new("t1")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert!(matches!(err, AppError::Http(_)));

    let err = client.account().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
}
