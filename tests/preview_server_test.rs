use a11y_lens::config::toml_config::TomlConfig;
use a11y_lens::server::{create_router, AppState};
use a11y_lens::StyleMode;
use anyhow::Result;
use httpmock::prelude::*;
use tokio::net::TcpListener;

/// 啟動一個綁定隨機埠的服務，回傳 base URL
async fn spawn_app(config: TomlConfig) -> Result<String> {
    let state = AppState::from_config(&config)?;
    let app = create_router(state, config.server.cors_enabled);

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    Ok(format!("http://{}", addr))
}

fn short_timeout_config() -> TomlConfig {
    let mut config = TomlConfig::default();
    config.fetch.timeout_seconds = 3;
    config
}

#[tokio::test]
async fn test_fetch_dyslexia_end_to_end() -> Result<()> {
    let upstream = MockServer::start_async().await;
    let page_mock = upstream
        .mock_async(|when, then| {
            when.method(GET).path("/articles/1");
            then.status(200)
                .header("Content-Type", "text/html")
                .body("<html><body><p>Hello</p></body></html>");
        })
        .await;

    let app = spawn_app(short_timeout_config()).await?;
    let response = reqwest::Client::new()
        .get(format!("{}/fetch", app))
        .query(&[
            ("url", upstream.url("/articles/1").as_str()),
            ("profile", "dyslexia"),
        ])
        .send()
        .await?;

    page_mock.assert_async().await;
    assert_eq!(response.status(), 200);
    assert_eq!(
        response.headers()["content-type"].to_str()?,
        "text/html; charset=utf-8"
    );

    let body = response.text().await?;
    assert!(body.contains(&format!(r#"<base href="{}">"#, upstream.base_url())));
    assert!(body.contains("letter-spacing: 0.06em"));
    assert!(body.contains("<p>Hello</p>"));
    Ok(())
}

#[tokio::test]
async fn test_preview_form_with_custom_profile() -> Result<()> {
    let upstream = MockServer::start_async().await;
    upstream
        .mock_async(|when, then| {
            when.method(GET).path("/blog");
            then.status(200).body("<p>post</p>");
        })
        .await;

    let app = spawn_app(short_timeout_config()).await?;
    let response = reqwest::Client::new()
        .post(format!("{}/preview", app))
        .form(&[
            ("url", upstream.url("/blog").as_str()),
            ("profile", "custom"),
            ("font_size", "20px"),
            ("font_family", "Georgia, serif"),
            ("gradient", "purple-pink"),
        ])
        .send()
        .await?;

    assert_eq!(response.status(), 200);
    let body = response.text().await?;
    assert!(body.contains("font-size: 20px"));
    assert!(body.contains("Georgia, serif"));
    assert!(body.contains("#7c3aed"));
    assert!(body.contains("<p>post</p>"));
    Ok(())
}

#[tokio::test]
async fn test_adhd_profile_strips_scripts_end_to_end() -> Result<()> {
    let upstream = MockServer::start_async().await;
    upstream
        .mock_async(|when, then| {
            when.method(GET).path("/busy");
            then.status(200).body(
                r#"<html><head><script src="/carousel.js"></script></head>
                   <body><p>calm</p><script>startCarousel();</script></body></html>"#,
            );
        })
        .await;

    let app = spawn_app(short_timeout_config()).await?;
    let body = reqwest::Client::new()
        .get(format!("{}/fetch", app))
        .query(&[("url", upstream.url("/busy").as_str()), ("profile", "adhd")])
        .send()
        .await?
        .text()
        .await?;

    assert!(!body.contains("<script"));
    assert!(body.contains("<p>calm</p>"));
    assert!(body.contains("animation: none"));
    Ok(())
}

#[tokio::test]
async fn test_missing_url_is_bad_request() -> Result<()> {
    let app = spawn_app(short_timeout_config()).await?;

    let response = reqwest::Client::new()
        .get(format!("{}/fetch", app))
        .query(&[("profile", "dyslexia")])
        .send()
        .await?;

    assert_eq!(response.status(), 400);
    assert_eq!(response.text().await?, "Missing 'url' parameter");
    Ok(())
}

#[tokio::test]
async fn test_preview_without_form_body_is_bad_request() -> Result<()> {
    let app = spawn_app(short_timeout_config()).await?;

    let response = reqwest::Client::new()
        .post(format!("{}/preview", app))
        .send()
        .await?;

    assert_eq!(response.status(), 400);
    assert_eq!(response.text().await?, "Missing 'url' parameter");
    Ok(())
}

#[tokio::test]
async fn test_upstream_403_is_reported_without_rewrite() -> Result<()> {
    let upstream = MockServer::start_async().await;
    let blocked = upstream
        .mock_async(|when, then| {
            when.method(GET).path("/paywalled");
            then.status(403).body("<html><head></head><body>denied</body></html>");
        })
        .await;

    let app = spawn_app(short_timeout_config()).await?;
    let response = reqwest::Client::new()
        .get(format!("{}/fetch", app))
        .query(&[
            ("url", upstream.url("/paywalled").as_str()),
            ("profile", "elder"),
        ])
        .send()
        .await?;

    blocked.assert_async().await;
    assert_eq!(response.status(), 502);

    let body = response.text().await?;
    assert!(body.contains("Status code: 403"));
    assert!(!body.contains("<base"));
    assert!(!body.contains("denied"));
    Ok(())
}

#[tokio::test]
async fn test_unreachable_host_is_network_error() -> Result<()> {
    let app = spawn_app(short_timeout_config()).await?;

    let response = reqwest::Client::new()
        .get(format!("{}/fetch", app))
        .query(&[("url", "http://127.0.0.1:1/"), ("profile", "motor")])
        .send()
        .await?;

    assert_eq!(response.status(), 502);
    let body = response.text().await?;
    assert!(body.contains("Could not load URL"));
    assert!(!body.contains("<base"));
    Ok(())
}

#[tokio::test]
async fn test_url_without_scheme_defaults_to_http() -> Result<()> {
    let upstream = MockServer::start_async().await;
    let page_mock = upstream
        .mock_async(|when, then| {
            when.method(GET).path("/docs");
            then.status(200).body("<p>docs</p>");
        })
        .await;

    let app = spawn_app(short_timeout_config()).await?;
    let target = format!("{}/docs", upstream.address());
    let response = reqwest::Client::new()
        .get(format!("{}/fetch", app))
        .query(&[("url", target.as_str()), ("profile", "low_vision")])
        .send()
        .await?;

    page_mock.assert_async().await;
    assert_eq!(response.status(), 200);
    assert!(response.text().await?.contains("<p>docs</p>"));
    Ok(())
}

#[tokio::test]
async fn test_shared_class_mode_from_config() -> Result<()> {
    let upstream = MockServer::start_async().await;
    upstream
        .mock_async(|when, then| {
            when.method(GET).path("/");
            then.status(200)
                .body(r#"<html><body class="home profile-old"><p>x</p></body></html>"#);
        })
        .await;

    let mut config = short_timeout_config();
    config.rewrite.style_mode = StyleMode::SharedClass;

    let app = spawn_app(config).await?;
    let body = reqwest::Client::new()
        .get(format!("{}/fetch", app))
        .query(&[("url", upstream.url("/").as_str()), ("profile", "profile-elder")])
        .send()
        .await?
        .text()
        .await?;

    assert!(body.contains(r#"<body class="home profile-elder">"#));
    assert!(body.contains("body.profile-elder"));
    Ok(())
}

#[tokio::test]
async fn test_health_and_index() -> Result<()> {
    let app = spawn_app(short_timeout_config()).await?;
    let client = reqwest::Client::new();

    let health: serde_json::Value = client
        .get(format!("{}/health", app))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(health["healthy"], true);
    assert_eq!(health["style_mode"], "per_profile");
    let profiles = health["profiles"].as_array().unwrap();
    assert!(profiles.iter().any(|p| p == "dyslexia"));
    assert!(profiles.iter().any(|p| p == "custom"));

    let index = client.get(format!("{}/", app)).send().await?;
    assert_eq!(index.status(), 200);
    let page = index.text().await?;
    assert!(page.contains(r#"action="/preview""#));
    assert!(page.contains(r#"value="photosensitive""#));
    Ok(())
}
