mod common;

use anyhow::Result;
use chrono::{Duration, Utc};
use reqwest::StatusCode;
use serde_json::{json, Value};

use common::TestServer;

fn ids(body: &Value) -> Vec<i64> {
    body["data"]
        .as_array()
        .map(|items| items.iter().filter_map(|i| i["id"].as_i64()).collect())
        .unwrap_or_default()
}

#[tokio::test]
async fn portfolio_listings_need_no_token() -> Result<()> {
    let server = TestServer::start().await?;

    let (status, body) = server.get("/portfolio", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), [4, 3, 2, 1]);

    let (_, body) = server.get("/portfolio?featured=true", None).await?;
    assert_eq!(ids(&body), [4, 2, 1]);

    let (_, body) = server.get("/portfolio?category=mobile", None).await?;
    assert_eq!(ids(&body), [2]);

    let (_, body) = server.get("/portfolio/featured", None).await?;
    assert_eq!(ids(&body), [4, 2, 1]);
    let (_, body) = server.get("/portfolio/featured?limit=2", None).await?;
    assert_eq!(ids(&body), [4, 2]);

    let (_, body) = server.get("/portfolio/category/web", None).await?;
    assert_eq!(ids(&body), [1]);
    let (_, body) = server.get("/portfolio/category/print", None).await?;
    assert_eq!(body["data"], json!([]));

    let (_, body) = server.get("/portfolio/categories", None).await?;
    let names: Vec<&str> = body["data"]
        .as_array()
        .expect("categories")
        .iter()
        .filter_map(|c| c["name"].as_str())
        .collect();
    assert_eq!(names, ["design", "ecommerce", "mobile", "web"]);

    let (status, body) = server.get("/portfolio/1", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "E-commerce Website");
    let (status, body) = server.get("/portfolio/99", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Portfolio project not found");
    Ok(())
}

#[tokio::test]
async fn scheduled_and_archived_items_read_as_missing() -> Result<()> {
    let server = TestServer::start().await?;
    let (_, admin_token) = server.admin("admin@artika.test").await?;

    let tomorrow = (Utc::now() + Duration::days(1)).to_rfc3339();
    let (status, body) = server
        .post(
            "/admin/portfolio",
            Some(&admin_token),
            json!({ "title": "Launch Campaign", "featured": true, "published_at": tomorrow }),
        )
        .await?;
    assert_eq!(status, StatusCode::CREATED);
    let scheduled = body["data"]["id"].as_i64().expect("portfolio id");

    let (status, _) = server.get(&format!("/portfolio/{}", scheduled), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, body) = server.get("/portfolio/featured", None).await?;
    assert!(!ids(&body).contains(&scheduled));

    server
        .patch("/admin/portfolio/2", Some(&admin_token), json!({ "status": "archived" }))
        .await?;
    let (status, _) = server.get("/portfolio/2", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, body) = server.get("/portfolio", None).await?;
    assert_eq!(ids(&body), [4, 3, 1]);
    Ok(())
}

#[tokio::test]
async fn published_blog_posts_page_newest_first() -> Result<()> {
    let server = TestServer::start().await?;
    let (_, admin_token) = server.admin("admin@artika.test").await?;

    for n in 1..=3 {
        let published_at = (Utc::now() - Duration::days(10 - n)).to_rfc3339();
        let (status, _) = server
            .post(
                "/admin/blog",
                Some(&admin_token),
                json!({
                    "title": format!("Post {}", n),
                    "content": "Body",
                    "status": "published",
                    "published_at": published_at
                }),
            )
            .await?;
        assert_eq!(status, StatusCode::CREATED);
    }
    server
        .post("/admin/blog", Some(&admin_token), json!({ "title": "Unfinished", "content": "Draft" }))
        .await?;

    let titles = |body: &Value| -> Vec<String> {
        body["data"]
            .as_array()
            .map(|posts| {
                posts
                    .iter()
                    .filter_map(|p| p["title"].as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    };

    let (status, body) = server.get("/blog", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&body), ["Post 3", "Post 2", "Post 1"]);

    let (_, body) = server.get("/blog?limit=2", None).await?;
    assert_eq!(titles(&body), ["Post 3", "Post 2"]);
    let (_, body) = server.get("/blog?limit=2&offset=2", None).await?;
    assert_eq!(titles(&body), ["Post 1"]);

    let (status, body) = server.get("/blog/post-2", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["author_name"], "Studio Admin");
    let (status, _) = server.get("/blog/unfinished", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn contact_form_validates_before_storing() -> Result<()> {
    let server = TestServer::start().await?;
    let (_, admin_token) = server.admin("admin@artika.test").await?;

    for body in [
        json!({ "email": "ada@example.com", "message": "Hi" }),
        json!({ "name": "Ada", "email": "not-an-email", "message": "Hi" }),
        json!({ "name": "Ada", "email": "ada@example.com", "message": "   " }),
    ] {
        let (status, reply) = server.post("/contact", None, body).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(reply["success"], false);
    }

    let (status, body) = server
        .post(
            "/contact",
            None,
            json!({ "name": " Ada ", "email": "Ada@Example.com", "company": "", "message": "Need a logo" }),
        )
        .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["name"], "Ada");
    assert_eq!(body["data"]["email"], "Ada@Example.com");
    assert!(body["data"]["company"].is_null());
    assert_eq!(body["data"]["status"], "new");

    let (_, body) = server.get("/admin/contacts", Some(&admin_token)).await?;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(1));
    Ok(())
}
