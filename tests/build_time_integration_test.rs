use httpmock::prelude::*;
use ovsia_content::core::cache::hash_key;
use ovsia_content::core::content::keys;
use ovsia_content::domain::model::{ContentSource, CopyContentType};
use ovsia_content::{
    generate_build_report, BuildOptions, BuildTimeContent, BuildTimeOrchestrator, ContentConfig,
    ContentError, ContentService, NotionClient,
};
use serde_json::{json, Value};
use tempfile::TempDir;

fn rich(text: &str) -> Value {
    json!({"type": "rich_text", "rich_text": [{"plain_text": text}]})
}

fn title(text: &str) -> Value {
    json!({"type": "title", "title": [{"plain_text": text}]})
}

fn query_response(results: Vec<Value>) -> Value {
    json!({"object": "list", "results": results, "has_more": false, "next_cursor": null})
}

fn config_for(api_url: &str, cache_dir: &TempDir, token: Option<&str>) -> ContentConfig {
    let lookup = |key: &str| -> Option<String> {
        match key {
            "NOTION_TOKEN" => token.map(str::to_string),
            "NOTION_API_URL" => Some(api_url.to_string()),
            "NOTION_VENTURES_DATABASE_ID" => Some("db-ventures".to_string()),
            "NOTION_CAPABILITIES_DATABASE_ID" => Some("db-capabilities".to_string()),
            "NOTION_SITE_COPY_DATABASE_ID" => Some("db-site-copy".to_string()),
            "NOTION_ASSETS_DATABASE_ID" => Some("db-assets".to_string()),
            "CONTENT_CACHE_DIR" => Some(cache_dir.path().to_string_lossy().into_owned()),
            "APP_ENV" => Some("production".to_string()),
            _ => None,
        }
    };
    ContentConfig::from_lookup(lookup).unwrap()
}

fn config(server: &MockServer, cache_dir: &TempDir) -> ContentConfig {
    config_for(&server.url("/v1"), cache_dir, Some("secret_integration"))
}

fn assert_fallback_snapshot(build: &BuildTimeContent) {
    assert_eq!(build.metadata.source, ContentSource::Fallback);
    assert_eq!(build.content.ventures.len(), 3);
    assert_eq!(build.content.site_copy.sections().len(), 6);
    assert!(build
        .content
        .site_copy
        .sections()
        .iter()
        .all(|s| !s.primary_text.is_empty()));
}

fn mock_databases(server: &MockServer) -> Vec<httpmock::Mock<'_>> {
    let ventures = query_response(vec![
        json!({
            "id": "v-2",
            "properties": {
                "Name": title("Fieldline"),
                "Description": rich("Routing for field crews"),
                "Sort Order": {"type": "number", "number": 2}
            }
        }),
        json!({
            "id": "v-1",
            "properties": {
                "Name": title("Lumen"),
                "Description": rich("Patient intake"),
                "Logo": {"type": "files", "files": [
                    {"type": "external", "external": {"url": "https://cdn.example.com/lumen.svg"}}
                ]},
                "Logo Alt": rich("Lumen logo"),
                "Site URL": {"type": "url", "url": "https://lumen.example.com"},
                "Sort Order": {"type": "number", "number": 1}
            }
        }),
    ]);
    let capabilities = query_response(vec![json!({
        "id": "c-1",
        "properties": {
            "Title": title("Product Strategy"),
            "Subtitle": rich("From idea to roadmap"),
            "Description": rich("Shape the product"),
            "Features": {"type": "multi_select", "multi_select": [{"name": "Discovery"}]},
            "Sort Order": {"type": "number", "number": 1}
        }
    })]);
    let site_copy = query_response(vec![json!({
        "id": "s-1",
        "last_edited_time": "2026-09-30T12:00:00.000Z",
        "properties": {
            "Section Name": title("Hero"),
            "Primary Text": rich("We build ventures"),
            "Button Text": rich("Talk to us")
        }
    })]);
    let assets = query_response(vec![json!({
        "id": "a-1",
        "properties": {
            "Name": title("Hero image"),
            "Type": {"type": "select", "select": {"name": "image"}},
            "File": {"type": "files", "files": [
                {"type": "file", "file": {"url": "https://files.example.com/hero.png"}}
            ]},
            "Alt Text": rich("Team at work")
        }
    })]);

    [
        ("db-ventures", ventures),
        ("db-capabilities", capabilities),
        ("db-site-copy", site_copy),
        ("db-assets", assets),
    ]
    .into_iter()
    .map(|(id, body)| {
        server.mock(move |when, then| {
            when.method(POST)
                .path(format!("/v1/databases/{}/query", id))
                .header("authorization", "Bearer secret_integration");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(body);
        })
    })
    .collect()
}

#[tokio::test]
async fn test_build_from_notion_then_serve_from_cache() {
    let server = MockServer::start();
    let cache_dir = TempDir::new().unwrap();
    let mocks = mock_databases(&server);

    let orchestrator = BuildTimeOrchestrator::from_config(config(&server, &cache_dir));
    let build = orchestrator
        .fetch_build_time_content(BuildOptions::default())
        .await
        .unwrap();

    for mock in &mocks {
        mock.assert_hits(1);
    }
    assert_eq!(build.metadata.source, ContentSource::Notion);
    assert!(build.metadata.errors.is_empty());

    let names: Vec<_> = build.content.ventures.iter().map(|v| v.name.as_str()).collect();
    assert_eq!(names, ["Lumen", "Fieldline"]);
    assert_eq!(build.content.ventures[0].logo, "https://cdn.example.com/lumen.svg");
    assert_eq!(build.content.capabilities[0].features, ["Discovery"]);
    assert_eq!(build.content.site_copy.hero.primary_text, "We build ventures");
    assert_eq!(build.content.site_copy.hero.content_type, CopyContentType::Notion);
    assert_eq!(build.content.site_copy.footer.content_type, CopyContentType::Fallback);
    assert_eq!(build.content.assets[0].url, "https://files.example.com/hero.png");

    // Fieldline 沒有 logo，仍保留在快照中
    assert!(build
        .metadata
        .warnings
        .iter()
        .any(|w| w.contains("venture 'Fieldline'") && w.contains("logo")));

    let cache_file = cache_dir
        .path()
        .join(format!("{}.json", hash_key(keys::BUILD_TIME_CONTENT)));
    assert!(cache_file.exists());

    // 新的 orchestrator 只靠磁碟快取
    let orchestrator = BuildTimeOrchestrator::from_config(config(&server, &cache_dir));
    let cached = orchestrator
        .fetch_build_time_content(BuildOptions::default())
        .await
        .unwrap();
    assert_eq!(cached.metadata.source, ContentSource::Cache);
    assert_eq!(cached.content, build.content);
    for mock in &mocks {
        mock.assert_hits(1);
    }
}

#[tokio::test]
async fn test_server_error_falls_back_to_static_content() {
    let server = MockServer::start();
    let cache_dir = TempDir::new().unwrap();
    server.mock(|when, then| {
        when.method(POST);
        then.status(500).json_body(json!({
            "object": "error",
            "code": "internal_server_error",
            "message": "Something went wrong"
        }));
    });

    let orchestrator = BuildTimeOrchestrator::from_config(config(&server, &cache_dir));
    let build = orchestrator
        .fetch_build_time_content(BuildOptions { force_fresh: true })
        .await
        .unwrap();

    assert_fallback_snapshot(&build);
    assert_eq!(build.metadata.errors.len(), 4);
    assert!(build.metadata.errors[0].contains("API_ERROR"));

    let report = generate_build_report(&build);
    assert!(report.contains("- **Source:** fallback"));
    assert!(report.contains("## Errors (4)"));
}

#[tokio::test]
async fn test_unreachable_server_falls_back() {
    // 取得空閒埠後立即關閉，連線會被拒絕
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let cache_dir = TempDir::new().unwrap();
    let api_url = format!("http://127.0.0.1:{}/v1", port);

    let orchestrator =
        BuildTimeOrchestrator::from_config(config_for(&api_url, &cache_dir, Some("secret")));
    let build = orchestrator
        .fetch_build_time_content(BuildOptions::default())
        .await
        .unwrap();

    assert_fallback_snapshot(&build);
    assert!(build
        .metadata
        .errors
        .iter()
        .all(|e| e.contains("NETWORK_ERROR")));
}

#[tokio::test]
async fn test_malformed_success_body_falls_back() {
    let server = MockServer::start();
    let cache_dir = TempDir::new().unwrap();
    server.mock(|when, then| {
        when.method(POST);
        then.status(200)
            .header("Content-Type", "text/html")
            .body("<html>oops</html>");
    });

    let orchestrator = BuildTimeOrchestrator::from_config(config(&server, &cache_dir));
    let build = orchestrator
        .fetch_build_time_content(BuildOptions::default())
        .await
        .unwrap();

    assert_fallback_snapshot(&build);
    assert_eq!(build.metadata.errors.len(), 4);
    assert!(build
        .metadata
        .errors
        .iter()
        .all(|e| e.contains("PROCESSING_ERROR")));
}

#[tokio::test]
async fn test_production_without_token_uses_fallback() {
    let server = MockServer::start();
    let cache_dir = TempDir::new().unwrap();
    let any_request = server.mock(|when, then| {
        when.any_request();
        then.status(200).json_body(query_response(Vec::new()));
    });

    let config = config_for(&server.url("/v1"), &cache_dir, None);
    assert!(config.environment.is_production());
    let orchestrator = BuildTimeOrchestrator::from_config(config);
    let build = orchestrator
        .fetch_build_time_content(BuildOptions::default())
        .await
        .unwrap();

    any_request.assert_hits(0);
    assert!(build.metadata.errors[0].contains("NOTION_TOKEN"));
    assert!(build.metadata.errors[1..]
        .iter()
        .all(|e| e.contains("CONFIG_ERROR")));
    assert_fallback_snapshot(&build);
}

#[tokio::test]
async fn test_fallback_disabled_fails_the_build() {
    let server = MockServer::start();
    let cache_dir = TempDir::new().unwrap();
    server.mock(|when, then| {
        when.method(POST);
        then.status(503).body("unavailable");
    });

    let mut config = config(&server, &cache_dir);
    config.fallback_enabled = false;
    let orchestrator = BuildTimeOrchestrator::from_config(config);

    let err = orchestrator
        .fetch_build_time_content(BuildOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ContentError::NoContentError { .. }));
    assert_eq!(err.code(), "NO_CONTENT");
}

#[tokio::test]
async fn test_content_service_falls_back_per_collection() {
    let server = MockServer::start();
    let cache_dir = TempDir::new().unwrap();
    let config = config(&server, &cache_dir);

    let ventures = server.mock(|when, then| {
        when.method(POST).path("/v1/databases/db-ventures/query");
        then.status(401).json_body(json!({
            "code": "unauthorized",
            "message": "API token is invalid."
        }));
    });
    let capabilities = server.mock(|when, then| {
        when.method(POST).path("/v1/databases/db-capabilities/query");
        then.status(200).json_body(query_response(vec![json!({
            "id": "c-9",
            "properties": {
                "Title": title("Remote capability"),
                "Description": rich("From Notion")
            }
        })]));
    });

    let cache = ovsia_content::ContentCache::new(
        ovsia_content::LocalStorage::new(cache_dir.path()),
        &config.cache,
    );
    let service = ContentService::new(NotionClient::new(&config), cache, true);

    let fetched_ventures = service.get_ventures().await;
    assert_eq!(fetched_ventures.source, ContentSource::Fallback);
    assert_eq!(fetched_ventures.data.unwrap().len(), 3);

    let fetched_capabilities = service.get_capabilities().await;
    assert_eq!(fetched_capabilities.source, ContentSource::Notion);
    assert_eq!(fetched_capabilities.data.unwrap()[0].title, "Remote capability");

    // capabilities 已快取；ventures 為 fallback，會再次請求
    assert_eq!(service.get_capabilities().await.source, ContentSource::Cache);
    service.get_ventures().await;
    capabilities.assert_hits(1);
    ventures.assert_hits(2);
}
