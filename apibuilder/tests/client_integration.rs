use std::sync::Arc;

use apibuilder::transport::{Direction, TokenStore};
use apibuilder::{
    ApiEndpoint, ContentType, Endpoint, Overrides, RequestProps, Requester, RequesterConfig,
    Server,
};
use serde::Deserialize;
use serde_json::{json, Value};
use wiremock::matchers::{body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug, Deserialize)]
struct Todo {
    id: i64,
    title: String,
}

fn api_for(server: &MockServer, tokens: Arc<TokenStore>) -> ApiEndpoint {
    let requester = Requester::new(&RequesterConfig::default(), tokens).unwrap();
    let root = Endpoint::with_server(Arc::new(Server::new(server.uri())), Some("api"));
    ApiEndpoint::with_requester(root, Arc::new(requester))
}

#[tokio::test]
async fn get_with_query_params() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/todos"))
        .and(query_param("page", "2"))
        .and(query_param("done", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "title": "write tests" }
        ])))
        .mount(&mock_server)
        .await;

    let api = api_for(&mock_server, Arc::new(TokenStore::empty()));
    let list = api.endpoint("todos").get::<Vec<Todo>, Value>(());
    let todos = list.call(json!({ "page": 2, "done": false, "q": "" })).await.unwrap();

    assert_eq!(todos.len(), 1);
    assert_eq!(todos[0].id, 1);
    assert_eq!(todos[0].title, "write tests");
}

#[tokio::test]
async fn non_json_success_yields_null() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/todos/3"))
        .respond_with(ResponseTemplate::new(200).set_body_string("deleted"))
        .mount(&mock_server)
        .await;

    let api = api_for(&mock_server, Arc::new(TokenStore::empty()));
    let remove = api.endpoint("todos").delete::<Option<Value>, i64>(RequestProps::mapped(
        |id: &i64| Overrides::new().entity_id(*id),
    ));
    assert_eq!(remove.call(3).await.unwrap(), None);
}

#[tokio::test]
async fn failed_status_carries_parsed_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/todos"))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({ "error": "title is required" })),
        )
        .mount(&mock_server)
        .await;

    let api = api_for(&mock_server, Arc::new(TokenStore::empty()));
    let create = api.endpoint("todos").post::<Todo, Value>(());
    let err = create.call(json!({ "title": "" })).await.unwrap_err();

    assert_eq!(err.status(), Some(422));
    assert_eq!(err.body(), Some(&json!({ "error": "title is required" })));
    assert!(err.is_client_error());
}

#[tokio::test]
async fn failed_status_with_text_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/todos"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&mock_server)
        .await;

    let api = api_for(&mock_server, Arc::new(TokenStore::empty()));
    let err = api
        .endpoint("todos")
        .get::<Value, ()>(())
        .call(())
        .await
        .unwrap_err();
    assert!(err.is_server_error());
    assert_eq!(err.body(), Some(&json!("Internal Server Error")));
}

#[tokio::test]
async fn missing_token_fails_before_any_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let api = api_for(&mock_server, Arc::new(TokenStore::empty()));
    api.protect();
    let err = api
        .endpoint("me")
        .get::<Value, ()>(())
        .call(())
        .await
        .unwrap_err();
    assert!(err.is_missing_token());
}

#[tokio::test]
async fn token_is_sent_for_protected_handles() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/me"))
        .and(header("Authorization", "Bearer s3cret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 1, "title": "me" })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let tokens = Arc::new(TokenStore::empty());
    let api = api_for(&mock_server, tokens.clone());
    let me = api.endpoint("me").get::<Todo, ()>(()).protect();

    assert!(me.call(()).await.unwrap_err().is_missing_token());
    tokens.set("s3cret");
    assert_eq!(me.call(()).await.unwrap().title, "me");
}

#[tokio::test]
async fn raw_response_skips_status_classification() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/report"))
        .respond_with(
            ResponseTemplate::new(503).set_body_raw("a,b\n1,2\n", "text/csv"),
        )
        .mount(&mock_server)
        .await;

    let api = api_for(&mock_server, Arc::new(TokenStore::empty()));
    let report = api.endpoint("report").get::<Value, ()>(());
    let response = report.raw().call(()).await.unwrap();

    assert_eq!(response.status(), 503);
    assert_eq!(response.content_type(), Some("text/csv"));
    assert_eq!(response.text(), "a,b\n1,2\n");

    let lines = report
        .raw_map(|r| r.text().lines().count())
        .call(())
        .await
        .unwrap();
    assert_eq!(lines, 2);
}

#[tokio::test]
async fn form_encoded_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string("user=ann&pass=a+b"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let api = api_for(&mock_server, Arc::new(TokenStore::empty()));
    let login = api
        .endpoint("login")
        .post::<(), Value>(RequestProps::new().content_type(ContentType::FormEncoded));
    login.call(json!({ "user": "ann", "pass": "a b" })).await.unwrap();
}

#[tokio::test]
async fn progress_handles_have_separate_channels() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/uploads"))
        .and(body_string(r#"{"data":"payload"}"#))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 9, "title": "up" })))
        .mount(&mock_server)
        .await;

    let api = api_for(&mock_server, Arc::new(TokenStore::empty()));
    let upload = api.endpoint("uploads").post::<Todo, Value>(()).with_progress();
    let copy = upload.copy();

    let mut events = upload.progress();
    let mut copy_events = copy.progress();

    let todo = upload.call(json!({ "data": "payload" })).await.unwrap();
    assert_eq!(todo.id, 9);

    let mut directions = Vec::new();
    while let Ok(event) = events.try_recv() {
        directions.push(event.direction);
    }
    assert!(directions.contains(&Direction::Upload));
    assert!(directions.contains(&Direction::Download));
    assert!(copy_events.try_recv().is_err());
}

#[tokio::test]
async fn server_base_can_switch() {
    let first = MockServer::start().await;
    let second = MockServer::start().await;

    for server in [&first, &second] {
        Mock::given(method("GET"))
            .and(path("/api/ping"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(server.uri())))
            .expect(1)
            .mount(server)
            .await;
    }

    let base = Arc::new(Server::new(first.uri()));
    let requester =
        Requester::new(&RequesterConfig::default(), Arc::new(TokenStore::empty())).unwrap();
    let root = Endpoint::with_server(base.clone(), Some("api"));
    let ping = ApiEndpoint::with_requester(root, Arc::new(requester))
        .endpoint("ping")
        .get::<String, ()>(());

    assert_eq!(ping.call(()).await.unwrap(), first.uri());
    base.set_api(second.uri());
    assert_eq!(ping.call(()).await.unwrap(), second.uri());
}

#[tokio::test]
async fn progress_handles_use_the_configured_client() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/whoami"))
        .and(header("user-agent", "custom-agent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(1)))
        .expect(2)
        .mount(&mock_server)
        .await;

    let config = RequesterConfig::default().with_user_agent("custom-agent");
    let requester = Requester::new(&config, Arc::new(TokenStore::empty())).unwrap();
    let root = Endpoint::with_server(Arc::new(Server::new(mock_server.uri())), Some("api"));
    let whoami = ApiEndpoint::with_requester(root, Arc::new(requester))
        .endpoint("whoami")
        .get::<Value, ()>(());

    assert_eq!(whoami.call(()).await.unwrap(), json!(1));
    assert_eq!(whoami.with_progress().call(()).await.unwrap(), json!(1));
}
