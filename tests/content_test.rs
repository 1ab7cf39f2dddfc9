//! Public content and admin CRUD tests
//!
//! Settings self-healing and patching, review moderation, uploads and the
//! orphan sweep, analytics counters, crawler files.

mod common;

use common::{TestServer, write_file};
use serde_json::json;

#[tokio::test]
async fn test_health() {
    let server = TestServer::start().await;
    let (status, body) = server.get_json("/health").await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_settings_heal_corrupt_document() {
    let server = TestServer::start().await;
    write_file(&server.data_dir(), "site-settings.json", b"{ not json");

    let (status, body) = server.get_json("/api/settings").await;
    assert_eq!(status, 200);
    assert_eq!(body["ok"], true);
    assert_eq!(body["settings"]["city"], "Saratov");
    assert_eq!(body["settings"]["aboutPhotos"], json!([]));

    let healed = std::fs::read_to_string(server.data_dir().join("site-settings.json")).unwrap();
    assert!(serde_json::from_str::<serde_json::Value>(&healed).is_ok());
}

#[tokio::test]
async fn test_settings_patch_semantics() {
    let server = TestServer::start().await;
    server.login().await;

    let (_, before) = server.get_json("/api/admin/settings").await;

    let (status, body) = server
        .post_json(
            "/api/admin/settings",
            json!({
                "phone": "  +7 900 123-45-67 ",
                "benefits": [" Fast ", "", "Warranty"],
                "city": 42,
            }),
        )
        .await;
    assert_eq!(status, 200);
    let settings = &body["settings"];
    assert_eq!(settings["phone"], "+7 900 123-45-67");
    assert_eq!(settings["benefits"], json!(["Fast", "Warranty"]));
    assert_eq!(settings["city"], before["settings"]["city"]);
    assert_eq!(settings["heroTitle"], before["settings"]["heroTitle"]);

    // An array that sanitizes to nothing restores the default list.
    let (_, body) = server
        .post_json("/api/admin/settings", json!({ "benefits": ["  "] }))
        .await;
    assert_eq!(body["settings"]["benefits"], before["settings"]["benefits"]);

    // Public read sees the update.
    let (_, public) = server.get_json("/api/settings").await;
    assert_eq!(public["settings"]["phone"], "+7 900 123-45-67");
}

#[tokio::test]
async fn test_review_moderation_lifecycle() {
    let server = TestServer::start().await;

    let (status, body) = server
        .post_json("/api/review", json!({ "name": "Ann", "text": "abc" }))
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "empty_review");

    let (status, _) = server
        .post_json("/api/review", json!({ "review": "Fixed the same day" }))
        .await;
    assert_eq!(status, 200);

    let (_, public) = server.get_json("/api/reviews").await;
    assert_eq!(public["reviews"], json!([]));

    server.login().await;
    let (_, admin) = server.get_json("/api/admin/reviews").await;
    let pending = admin["pending"].as_array().unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0]["name"], "Anonymous");
    assert_eq!(pending[0]["status"], "pending");
    let id = pending[0]["id"].as_str().unwrap().to_string();

    let (status, body) = server
        .post_json("/api/admin/reviews", json!({ "action": "approve", "id": "missing" }))
        .await;
    assert_eq!(status, 404);
    assert_eq!(body["error"], "not_found");

    let (status, body) = server
        .post_json("/api/admin/reviews", json!({ "action": "publish", "id": id }))
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "bad_action");

    let (status, body) = server
        .post_json("/api/admin/reviews", json!({ "action": "approve" }))
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "bad_request");

    let (status, body) = server
        .post_json("/api/admin/reviews", json!({ "action": "approve", "id": id }))
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["pending"], json!([]));
    assert_eq!(body["approved"][0]["id"], id);

    let (_, public) = server.get_json("/api/reviews").await;
    assert_eq!(public["reviews"][0]["text"], "Fixed the same day");

    let (_, body) = server
        .post_json("/api/admin/reviews", json!({ "action": "delete", "id": id }))
        .await;
    assert_eq!(body["approved"], json!([]));

    let (_, public) = server.get_json("/api/reviews").await;
    assert_eq!(public["reviews"], json!([]));
}

#[tokio::test]
async fn test_upload_delete_and_sweep() {
    let server = TestServer::start().await;
    server.login().await;

    let part = reqwest::multipart::Part::bytes(b"\x89PNG\r\n\x1a\nfake".to_vec())
        .file_name("photo.png")
        .mime_str("image/png")
        .unwrap();
    let form = reqwest::multipart::Form::new().part("file", part);
    let resp = server
        .client
        .post(server.url("/api/admin/upload"))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    let url = body["url"].as_str().unwrap().to_string();
    assert!(url.starts_with("/uploads/upload-") && url.ends_with(".png"));

    // Served as a static file.
    let served = server.client.get(server.url(&url)).send().await.unwrap();
    assert_eq!(served.status().as_u16(), 200);
    assert_eq!(served.bytes().await.unwrap().as_ref(), b"\x89PNG\r\n\x1a\nfake");

    let gif = reqwest::multipart::Part::bytes(b"GIF89a".to_vec())
        .file_name("a.gif")
        .mime_str("image/gif")
        .unwrap();
    let resp = server
        .client
        .post(server.url("/api/admin/upload"))
        .multipart(reqwest::multipart::Form::new().part("file", gif))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 400);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "bad_type");

    let resp = server
        .client
        .post(server.url("/api/admin/upload"))
        .multipart(reqwest::multipart::Form::new().text("other", "x"))
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "no_file");

    // Reference the upload, and leave two stray files behind.
    server
        .post_json("/api/admin/settings", json!({ "aboutPhotos": [url] }))
        .await;
    write_file(&server.uploads_dir(), "stray-1.jpg", b"x");
    write_file(&server.uploads_dir(), "stray-2.webp", b"x");

    let (status, preview) = server.get_json("/api/admin/uploads/cleanup").await;
    assert_eq!(status, 200);
    assert_eq!(preview["usedCount"], 1);
    assert_eq!(preview["totalFiles"], 3);
    assert_eq!(preview["orphanCount"], 2);
    assert_eq!(preview["orphans"][0]["url"], "/uploads/stray-1.jpg");
    assert!(server.uploads_dir().join("stray-1.jpg").exists());

    let (_, first) = server.post_json("/api/admin/uploads/cleanup", json!({})).await;
    assert_eq!(first["deleted"], 2);
    assert_eq!(first["failed"], json!([]));
    let (_, second) = server.post_json("/api/admin/uploads/cleanup", json!({})).await;
    assert_eq!(second["deleted"], 0);
    assert_eq!(second["orphanCount"], 0);

    // Explicit delete.
    let resp = server
        .client
        .delete(server.url("/api/admin/upload"))
        .query(&[("url", "/uploads/../data/admin.json")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 400);

    let resp = server
        .client
        .delete(server.url("/api/admin/upload"))
        .query(&[("url", url.as_str())])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let name = url.trim_start_matches("/uploads/");
    assert!(!server.uploads_dir().join(name).exists());
}

#[tokio::test]
async fn test_counters_validation() {
    let server = TestServer::start().await;
    server.login().await;

    let (_, body) = server.get_json("/api/admin/counters").await;
    assert_eq!(
        body["data"],
        json!({ "yandexMetrikaId": "", "googleTagId": "", "customHtml": "" })
    );

    let (status, body) = server
        .post_json("/api/admin/counters", json!({ "yandexMetrikaId": "12a" }))
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "bad_yandex_id");

    let (status, body) = server
        .post_json("/api/admin/counters", json!({ "googleTagId": "G 1" }))
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "bad_google_tag_id");

    let (status, _) = server
        .post_json(
            "/api/admin/counters",
            json!({ "yandexMetrikaId": " 12345678 ", "googleTagId": "G-TEST01", "customHtml": "<!-- x -->" }),
        )
        .await;
    assert_eq!(status, 200);

    let (_, body) = server.get_json("/api/admin/counters").await;
    assert_eq!(body["data"]["yandexMetrikaId"], "12345678");
    assert_eq!(body["data"]["customHtml"], "<!-- x -->");
}

#[tokio::test]
async fn test_crawler_files() {
    let server = TestServer::start().await;

    let robots = server
        .client
        .get(server.url("/robots.txt"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(robots.contains("Disallow: /admin"));
    assert!(robots.contains("Sitemap: https://test.local/sitemap.xml"));

    let sitemap = server
        .client
        .get(server.url("/sitemap.xml"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(sitemap.contains("<loc>https://test.local/</loc>"));
}
