mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

use common::TestServer;

#[tokio::test]
async fn add_check_list_and_remove() -> Result<()> {
    let server = TestServer::start().await?;
    let (alice, token) = server.register("alice@artika.test").await?;

    let (status, body) = server
        .post("/favorites", Some(&token), json!({ "projectId": 2 }))
        .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["user_id"], alice);
    assert_eq!(body["data"]["project_id"], 2);

    let (_, body) = server.get("/favorites/check/2", Some(&token)).await?;
    assert_eq!(body["data"]["isFavorite"], true);
    let (_, body) = server.get("/favorites/check/3", Some(&token)).await?;
    assert_eq!(body["data"]["isFavorite"], false);

    let (status, body) = server.get("/favorites", Some(&token)).await?;
    assert_eq!(status, StatusCode::OK);
    let items = body["data"].as_array().expect("favorites");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["title"], "Mobile Banking App");
    assert_eq!(items[0]["category"], "mobile");

    let (status, body) = server.delete("/favorites/2", Some(&token)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Favorite removed successfully");

    let (_, body) = server.get("/favorites", Some(&token)).await?;
    assert_eq!(body["data"], json!([]));
    Ok(())
}

#[tokio::test]
async fn duplicate_favorite_is_409() -> Result<()> {
    let server = TestServer::start().await?;
    let (_, token) = server.register("alice@artika.test").await?;

    let (status, _) = server.post("/favorites", Some(&token), json!({ "project_id": 1 })).await?;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = server.post("/favorites", Some(&token), json!({ "project_id": 1 })).await?;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Favorite already exists");
    Ok(())
}

#[tokio::test]
async fn unknown_portfolio_project_is_404() -> Result<()> {
    let server = TestServer::start().await?;
    let (_, token) = server.register("alice@artika.test").await?;

    let (status, body) = server.post("/favorites", Some(&token), json!({ "project_id": 404 })).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Portfolio project not found");
    Ok(())
}

#[tokio::test]
async fn removing_someone_elses_favorite_is_404_and_keeps_it() -> Result<()> {
    let server = TestServer::start().await?;
    let (_, alice_token) = server.register("alice@artika.test").await?;
    let (_, bob_token) = server.register("bob@artika.test").await?;

    server.post("/favorites", Some(&alice_token), json!({ "project_id": 4 })).await?;

    let (status, body) = server.delete("/favorites/4", Some(&bob_token)).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Favorite not found");

    let (_, body) = server.get("/favorites/check/4", Some(&alice_token)).await?;
    assert_eq!(body["data"]["isFavorite"], true);
    Ok(())
}

#[tokio::test]
async fn deleting_a_portfolio_project_drops_its_favorites() -> Result<()> {
    let server = TestServer::start().await?;
    let (_, token) = server.register("alice@artika.test").await?;
    let (_, admin_token) = server.admin("admin@artika.test").await?;

    server.post("/favorites", Some(&token), json!({ "project_id": 3 })).await?;
    let (status, _) = server.delete("/admin/portfolio/3", Some(&admin_token)).await?;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = server.get("/favorites", Some(&token)).await?;
    assert_eq!(body["data"], json!([]));
    Ok(())
}

#[tokio::test]
async fn dashboard_counts_and_caps_recent_items() -> Result<()> {
    let server = TestServer::start().await?;
    let (alice, token) = server.register("alice@artika.test").await?;
    let (_, admin_token) = server.admin("admin@artika.test").await?;

    for n in 0..7 {
        server
            .post("/projects", Some(&token), json!({ "title": format!("Project {}", n) }))
            .await?;
    }
    server.post("/favorites", Some(&token), json!({ "project_id": 1 })).await?;
    server.post("/orders", Some(&token), json!({ "amount": 99.0 })).await?;
    server
        .post(
            "/admin/messages/send",
            Some(&admin_token),
            json!({ "user_id": alice, "title": "Welcome", "content": "Glad to have you" }),
        )
        .await?;

    let (status, body) = server.get("/user/dashboard", Some(&token)).await?;
    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["projects"]["count"], 7);
    assert_eq!(data["projects"]["items"].as_array().map(Vec::len), Some(5));
    assert_eq!(data["projects"]["items"][0]["title"], "Project 6");
    assert_eq!(data["messages"]["count"], 1);
    assert_eq!(data["messages"]["unreadCount"], 1);
    assert_eq!(data["favorites"]["count"], 1);
    assert_eq!(data["orders"]["count"], 1);
    Ok(())
}

#[tokio::test]
async fn unpublished_portfolio_items_cannot_be_favorited_or_listed() -> Result<()> {
    let server = TestServer::start().await?;
    let (_, token) = server.register("alice@artika.test").await?;
    let (_, admin_token) = server.admin("admin@artika.test").await?;

    let (status, body) = server
        .post(
            "/admin/portfolio",
            Some(&admin_token),
            json!({ "title": "Unreleased Rebrand", "description": "Embargoed", "status": "draft" }),
        )
        .await?;
    assert_eq!(status, StatusCode::CREATED);
    let draft = body["data"]["id"].as_i64().expect("portfolio id");

    let (status, _) = server.get(&format!("/portfolio/{}", draft), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = server.post("/favorites", Some(&token), json!({ "project_id": draft })).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Portfolio project not found");

    // Saved while public, then withdrawn: the summary must not leak.
    let (status, _) = server.post("/favorites", Some(&token), json!({ "project_id": 2 })).await?;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = server
        .patch("/admin/portfolio/2", Some(&admin_token), json!({ "status": "archived" }))
        .await?;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = server.get("/favorites", Some(&token)).await?;
    assert_eq!(body["data"], json!([]));
    let (_, body) = server.get("/user/dashboard", Some(&token)).await?;
    assert_eq!(body["data"]["favorites"]["count"], 0);
    Ok(())
}
