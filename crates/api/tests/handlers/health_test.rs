use serde_json::Value;

use crate::test_utils::TestContext;

#[tokio::test]
async fn test_health_reports_mode() {
    let ctx = TestContext::new();

    let response = ctx.server.get("/health").await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["mode"], "demo");
}

#[tokio::test]
async fn test_version_matches_package() {
    let ctx = TestContext::new();

    let body = ctx.server.get("/version").await.json::<Value>();

    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}
