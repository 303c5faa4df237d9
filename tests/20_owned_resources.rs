mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

use common::TestServer;

#[tokio::test]
async fn project_round_trip_is_stamped_with_the_caller() -> Result<()> {
    let server = TestServer::start().await?;
    let (alice, alice_token) = server.register("alice@artika.test").await?;
    let (bob, _) = server.register("bob@artika.test").await?;

    let (status, body) = server
        .post(
            "/projects",
            Some(&alice_token),
            json!({
                "title": "Rebrand",
                "description": "Logo and type system",
                "image": "/img/rebrand.png",
                "user_id": bob
            }),
        )
        .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Project created successfully");
    let created = &body["data"];
    assert_eq!(created["user_id"], alice);
    assert_eq!(created["status"], "pending");

    let id = created["id"].as_i64().expect("project id");
    let (status, body) = server.get(&format!("/projects/{}", id), Some(&alice_token)).await?;
    assert_eq!(status, StatusCode::OK);
    let fetched = &body["data"];
    for field in ["title", "description", "image", "user_id", "status", "created_at"] {
        assert_eq!(fetched[field], created[field], "{}", field);
    }
    assert_eq!(fetched["title"], "Rebrand");
    assert_eq!(fetched["description"], "Logo and type system");
    Ok(())
}

#[tokio::test]
async fn claimed_owner_never_changes_the_stored_owner() -> Result<()> {
    let server = TestServer::start().await?;
    let (alice, token) = server.register("alice@artika.test").await?;
    let (bob, _) = server.register("bob@artika.test").await?;

    let mut owners = Vec::new();
    for claimed in [json!(null), json!(bob), json!(alice), json!(9_999)] {
        let (status, body) = server
            .post("/projects", Some(&token), json!({ "title": "Poster", "user_id": claimed }))
            .await?;
        assert_eq!(status, StatusCode::CREATED);
        owners.push(body["data"]["user_id"].clone());
    }
    assert!(owners.iter().all(|owner| *owner == json!(alice)));
    Ok(())
}

#[tokio::test]
async fn another_clients_project_is_403_and_left_unchanged() -> Result<()> {
    let server = TestServer::start().await?;
    let (_, alice_token) = server.register("alice@artika.test").await?;
    let (_, bob_token) = server.register("bob@artika.test").await?;

    let (_, body) = server
        .post("/projects", Some(&alice_token), json!({ "title": "Alice's site" }))
        .await?;
    let id = body["data"]["id"].as_i64().expect("project id");
    let path = format!("/projects/{}", id);
    let (_, before) = server.get(&path, Some(&alice_token)).await?;

    let (status, body) = server.get(&path, Some(&bob_token)).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Access denied");

    let (status, _) = server
        .patch(&path, Some(&bob_token), json!({ "title": "Bob was here" }))
        .await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = server.delete(&path, Some(&bob_token)).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, after) = server.get(&path, Some(&alice_token)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(before["data"], after["data"]);

    let (_, listed) = server.get("/projects", Some(&bob_token)).await?;
    assert_eq!(listed["data"], json!([]));
    Ok(())
}

#[tokio::test]
async fn missing_records_are_404_for_everyone() -> Result<()> {
    let server = TestServer::start().await?;
    let (_, token) = server.register("alice@artika.test").await?;
    let (_, admin_token) = server.admin("admin@artika.test").await?;

    for path in ["/projects/4242", "/orders/4242", "/messages/4242"] {
        for caller in [&token, &admin_token] {
            let (status, body) = server.get(path, Some(caller)).await?;
            assert_eq!(status, StatusCode::NOT_FOUND, "{}", path);
            assert_eq!(body["error"], "NOT_FOUND");
        }
    }

    let (status, _) = server.get("/projects/not-a-number", Some(&token)).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn admins_may_manage_any_clients_project() -> Result<()> {
    let server = TestServer::start().await?;
    let (_, alice_token) = server.register("alice@artika.test").await?;
    let (_, admin_token) = server.admin("admin@artika.test").await?;

    let (_, body) = server
        .post("/projects", Some(&alice_token), json!({ "title": "Packaging" }))
        .await?;
    let path = format!("/projects/{}", body["data"]["id"]);

    let (status, body) = server
        .put(&path, Some(&admin_token), json!({ "description": "Needs dielines" }))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["description"], "Needs dielines");
    assert_eq!(body["data"]["title"], "Packaging");

    let (status, body) = server.delete(&path, Some(&admin_token)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Project deleted successfully");

    let (status, _) = server.get(&path, Some(&alice_token)).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn project_title_is_required() -> Result<()> {
    let server = TestServer::start().await?;
    let (_, token) = server.register("alice@artika.test").await?;

    let (status, body) = server.post("/projects", Some(&token), json!({ "title": "   " })).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "title is required");
    Ok(())
}

#[tokio::test]
async fn orders_are_owner_scoped() -> Result<()> {
    let server = TestServer::start().await?;
    let (alice, alice_token) = server.register("alice@artika.test").await?;
    let (_, bob_token) = server.register("bob@artika.test").await?;

    let (status, body) = server
        .post(
            "/orders",
            Some(&alice_token),
            json!({ "projectId": 1, "amount": 1250.5, "details": "Brand book", "user_id": 77 }),
        )
        .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["user_id"], alice);
    assert_eq!(body["data"]["project_id"], 1);
    assert_eq!(body["data"]["status"], "pending");
    let path = format!("/orders/{}", body["data"]["id"]);

    let (status, _) = server
        .patch(&format!("{}/status", path), Some(&bob_token), json!({ "status": "completed" }))
        .await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = server
        .put(&format!("{}/status", path), Some(&alice_token), json!({ "status": "processing" }))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "processing");

    let (status, _) = server
        .patch(&format!("{}/status", path), Some(&alice_token), json!({ "status": "shipped" }))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = server
        .post("/orders", Some(&alice_token), json!({ "project_id": 999, "amount": 10 }))
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = server
        .post("/orders", Some(&alice_token), json!({ "amount": -1 }))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, listed) = server.get("/orders", Some(&alice_token)).await?;
    assert_eq!(listed["data"].as_array().map(Vec::len), Some(1));

    let (status, _) = server.delete(&path, Some(&bob_token)).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = server.delete(&path, Some(&alice_token)).await?;
    assert_eq!(status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn messages_flow_between_client_and_admin() -> Result<()> {
    let server = TestServer::start().await?;
    let (alice, alice_token) = server.register("alice@artika.test").await?;
    let (_, bob_token) = server.register("bob@artika.test").await?;
    let (admin, admin_token) = server.admin("admin@artika.test").await?;

    let (status, body) = server
        .post("/messages", Some(&alice_token), json!({ "title": "Question", "content": "When is the proof ready?" }))
        .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["user_id"], alice);
    assert_eq!(body["data"]["sender_id"], alice);
    assert_eq!(body["data"]["message_type"], "user_to_admin");

    let (status, body) = server
        .post(
            "/admin/messages/send",
            Some(&admin_token),
            json!({ "user_id": alice, "title": "Proof", "content": "Attached tomorrow" }),
        )
        .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["sender_id"], admin);
    assert_eq!(body["data"]["message_type"], "admin_to_user");
    let path = format!("/messages/{}", body["data"]["id"]);

    let (_, body) = server.get("/messages/unread-count", Some(&alice_token)).await?;
    assert_eq!(body["data"]["unreadCount"], 2);

    let (status, _) = server.patch(&format!("{}/read", path), Some(&bob_token), json!({})).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = server.patch(&format!("{}/read", path), Some(&alice_token), json!({})).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["is_read"], true);

    let (_, body) = server.get("/messages/unread-count", Some(&alice_token)).await?;
    assert_eq!(body["data"]["unreadCount"], 1);

    let (_, inbox) = server.get("/messages", Some(&alice_token)).await?;
    assert_eq!(inbox["data"].as_array().map(Vec::len), Some(2));
    let (_, inbox) = server.get("/messages", Some(&bob_token)).await?;
    assert_eq!(inbox["data"], json!([]));

    let (_, all) = server.get("/admin/messages", Some(&admin_token)).await?;
    assert!(all["data"]
        .as_array()
        .expect("admin inbox")
        .iter()
        .any(|m| m["recipient_email"] == "alice@artika.test"));

    let (status, _) = server.delete(&path, Some(&alice_token)).await?;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = server.get(&path, Some(&alice_token)).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}
