// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::integration::helpers::spawn_app_with;
use axum::http::StatusCode;
use serde_json::Value;

#[tokio::test]
async fn test_requests_over_limit_get_429() {
    let app = spawn_app_with(|settings| {
        settings.rate_limiting.enabled = true;
        settings.rate_limiting.max_requests = 3;
        settings.rate_limiting.window_seconds = 60;
    })
    .await;

    for _ in 0..3 {
        app.server.get("/api/version").await.assert_status_ok();
    }

    let limited = app.server.get("/api/version").await;
    limited.assert_status(StatusCode::TOO_MANY_REQUESTS);
    let retry_after: u64 = limited
        .header("retry-after")
        .to_str()
        .unwrap()
        .parse()
        .unwrap();
    assert!((1..=60).contains(&retry_after));
    assert_eq!(
        limited.json::<Value>()["error"],
        "リクエストが多すぎます。しばらくしてから再度お試しください"
    );

    // 健康检查不计入限流
    app.server.get("/health").await.assert_status_ok();
}
