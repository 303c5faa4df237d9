//! The same flows against `PgStore` and the real schema.
//!
//! Each test runs in a schema of its own inside the database named by
//! `DATABASE_URL`, and returns early when that variable is unset.

mod common;

use std::collections::HashMap;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

use artika_api::database::models::{BlogChanges, NewOrder, NewUser, PortfolioChanges, PortfolioFilter};
use artika_api::database::{schema, DatabaseError, Store};
use artika_api::types::{ContentStatus, Role};
use common::{PgSchema, TestServer};

async fn client(store: &Store, email: &str) -> Result<i64> {
    let user = store
        .users
        .create(NewUser {
            email: email.to_string(),
            password_hash: "not-a-real-hash".to_string(),
            name: None,
            role: Role::Client,
        })
        .await?;
    Ok(user.id)
}

async fn count(pg: &PgSchema, table: &str) -> Result<i64> {
    let sql = format!("SELECT COUNT(*) FROM {}", table);
    Ok(sqlx::query_scalar::<_, i64>(&sql).fetch_one(&pg.pool).await?)
}

#[tokio::test]
async fn migrate_and_seed_can_run_again() -> Result<()> {
    let Some(pg) = PgSchema::create().await? else {
        return Ok(());
    };

    schema::migrate(&pg.pool).await?;
    schema::seed(&pg.pool).await?;
    schema::migrate(&pg.pool).await?;
    schema::seed(&pg.pool).await?;

    assert_eq!(count(&pg, "portfolio_categories").await?, 4);
    assert_eq!(count(&pg, "portfolio_projects").await?, 4);
    assert_eq!(count(&pg, "system_settings").await?, 5);
    assert_eq!(count(&pg, "users").await?, 0);

    let store = pg.store();
    let items = store
        .portfolio
        .list(PortfolioFilter { published_only: true, ..Default::default() })
        .await?;
    let ids: Vec<i64> = items.iter().map(|p| p.id).collect();
    assert_eq!(ids, [4, 3, 2, 1]);
    let featured = store
        .portfolio
        .list(PortfolioFilter { featured: Some(true), published_only: true, limit: Some(2), ..Default::default() })
        .await?;
    assert_eq!(featured.iter().map(|p| p.id).collect::<Vec<_>>(), [4, 2]);

    let names: Vec<String> = store.portfolio.categories().await?.into_iter().map(|c| c.name).collect();
    assert_eq!(names, ["design", "ecommerce", "mobile", "web"]);

    pg.remove().await
}

#[tokio::test]
async fn projects_stay_with_their_owner() -> Result<()> {
    let Some(pg) = PgSchema::create().await? else {
        return Ok(());
    };
    let server = TestServer::start_with_store(pg.store()).await?;
    let (alice, alice_token) = server.register("alice@artika.test").await?;
    let (bob, bob_token) = server.register("bob@artika.test").await?;
    let (_, admin_token) = server.admin("admin@artika.test").await?;

    let (status, body) = server
        .post(
            "/projects",
            Some(&alice_token),
            json!({ "title": "Rebrand", "description": "Logo", "user_id": bob }),
        )
        .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["user_id"], alice);
    assert_eq!(body["data"]["status"], "pending");
    let path = format!("/projects/{}", body["data"]["id"]);

    let (status, _) = server.get(&path, Some(&bob_token)).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = server.patch(&path, Some(&bob_token), json!({ "title": "Bob was here" })).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (_, body) = server.get("/projects", Some(&bob_token)).await?;
    assert_eq!(body["data"], json!([]));

    let (status, body) = server
        .patch(&path, Some(&alice_token), json!({ "description": "Logo and type system" }))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "Rebrand");
    assert_eq!(body["data"]["description"], "Logo and type system");

    let status_path = format!("{}/status", path.replace("/projects", "/admin/projects"));
    let (status, body) = server
        .patch(&status_path, Some(&admin_token), json!({ "status": "review" }))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "review");
    let (_, body) = server.get("/admin/projects?status=review", Some(&admin_token)).await?;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(1));
    let (_, body) = server.get("/admin/projects?status=pending", Some(&admin_token)).await?;
    assert_eq!(body["data"], json!([]));

    let (status, _) = server.delete(&path, Some(&bob_token)).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = server.delete(&path, Some(&alice_token)).await?;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = server.get(&path, Some(&alice_token)).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    pg.remove().await
}

#[tokio::test]
async fn orders_and_messages_round_trip() -> Result<()> {
    let Some(pg) = PgSchema::create().await? else {
        return Ok(());
    };
    let server = TestServer::start_with_store(pg.store()).await?;
    let (alice, token) = server.register("alice@artika.test").await?;
    let (_, other_token) = server.register("bob@artika.test").await?;
    let (_, admin_token) = server.admin("admin@artika.test").await?;

    let (status, body) = server
        .post("/orders", Some(&token), json!({ "project_id": 1, "amount": 250.0, "details": "Logo pack" }))
        .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["status"], "pending");
    let order_path = format!("/orders/{}", body["data"]["id"]);
    let (status, _) = server.get(&order_path, Some(&other_token)).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = server
        .post("/orders", Some(&token), json!({ "project_id": 999, "amount": 10.0 }))
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = server
        .post(
            "/admin/messages/send",
            Some(&admin_token),
            json!({ "user_id": alice, "title": "Welcome", "content": "Glad to have you" }),
        )
        .await?;
    assert_eq!(status, StatusCode::CREATED);
    let (_, body) = server.get("/messages/unread-count", Some(&token)).await?;
    assert_eq!(body["data"]["unreadCount"], 1);
    let (_, body) = server.get("/messages", Some(&token)).await?;
    let message_path = format!("/messages/{}/read", body["data"][0]["id"]);
    let (status, body) = server.patch(&message_path, Some(&token), json!({})).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["is_read"], true);
    let (_, body) = server.get("/messages/unread-count", Some(&token)).await?;
    assert_eq!(body["data"]["unreadCount"], 0);

    let (_, body) = server.get("/admin/orders/stats", Some(&admin_token)).await?;
    assert_eq!(body["data"]["total_orders"], 1);
    assert_eq!(body["data"]["total_revenue"].as_f64(), Some(250.0));
    let (_, body) = server.get("/admin/users/stats", Some(&admin_token)).await?;
    assert_eq!(body["data"]["total_users"], 3);
    assert_eq!(body["data"]["client_count"], 2);
    let (status, body) = server.get("/admin/dashboard", Some(&admin_token)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["statistics"]["totalProjects"], 4);

    pg.remove().await
}

#[tokio::test]
async fn bulk_settings_are_all_or_nothing() -> Result<()> {
    let Some(pg) = PgSchema::create().await? else {
        return Ok(());
    };
    let server = TestServer::start_with_store(pg.store()).await?;
    let (_, admin_token) = server.admin("admin@artika.test").await?;

    let (status, _) = server
        .patch(
            "/admin/settings",
            Some(&admin_token),
            json!({ "site_name": "Renamed", "no_such_key": "x" }),
        )
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, body) = server.get("/admin/settings/object", Some(&admin_token)).await?;
    assert_eq!(body["data"]["site_name"], "Artika Graphics");

    let (status, body) = server
        .put(
            "/admin/settings",
            Some(&admin_token),
            json!({ "items_per_page": 24, "maintenance_mode": true, "social_links": { "x": "@artika" } }),
        )
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().map(Vec::len), Some(3));

    let (_, body) = server.get("/admin/settings/object", Some(&admin_token)).await?;
    assert_eq!(body["data"]["items_per_page"].as_f64(), Some(24.0));
    assert_eq!(body["data"]["maintenance_mode"], true);
    assert_eq!(body["data"]["social_links"]["x"], "@artika");

    let store = pg.store();
    let updated = store
        .settings
        .update_many(HashMap::from([
            ("site_name".to_string(), "Artika Studio".to_string()),
            ("contact_email".to_string(), "studio@artika.test".to_string()),
        ]))
        .await?;
    let keys: Vec<&str> = updated.iter().map(|s| s.key.as_str()).collect();
    assert_eq!(keys, ["contact_email", "site_name"]);

    pg.remove().await
}

#[tokio::test]
async fn constraint_violations_become_domain_errors() -> Result<()> {
    let Some(pg) = PgSchema::create().await? else {
        return Ok(());
    };
    let store = pg.store();
    let alice = client(&store, "alice@artika.test").await?;

    let duplicate = client(&store, "alice@artika.test").await;
    let err = duplicate.expect_err("duplicate email").downcast::<DatabaseError>()?;
    assert!(matches!(err, DatabaseError::Conflict(_)), "{:?}", err);
    // Emails match exactly, so a different case is a different account.
    client(&store, "Alice@artika.test").await?;

    let missing = store.favorites.add(alice, 999).await;
    assert!(matches!(missing, Err(DatabaseError::NotFound(_))), "{:?}", missing);
    store.favorites.add(alice, 1).await?;
    let again = store.favorites.add(alice, 1).await;
    assert!(matches!(again, Err(DatabaseError::Conflict(_))), "{:?}", again);

    let order = store
        .orders
        .create(NewOrder { user_id: alice, project_id: Some(999), amount: 10.0, details: None })
        .await;
    assert!(matches!(order, Err(DatabaseError::NotFound(_))), "{:?}", order);

    let missing = store.projects.delete(12_345).await;
    assert!(matches!(missing, Err(DatabaseError::NotFound(_))), "{:?}", missing);

    pg.remove().await
}

#[tokio::test]
async fn ban_fields_are_set_and_cleared_together() -> Result<()> {
    let Some(pg) = PgSchema::create().await? else {
        return Ok(());
    };
    let store = pg.store();
    let alice = client(&store, "alice@artika.test").await?;

    let banned = store.users.ban(alice, "Chargebacks".to_string()).await?;
    assert!(!banned.is_active);
    assert!(banned.banned_at.is_some());
    assert_eq!(banned.ban_reason.as_deref(), Some("Chargebacks"));

    let restored = store.users.unban(alice).await?;
    assert!(restored.is_active);
    assert!(restored.banned_at.is_none());
    assert!(restored.ban_reason.is_none());

    for sql in [
        "UPDATE users SET is_active = FALSE, banned_at = NOW() WHERE id = $1",
        "UPDATE users SET ban_reason = 'spam' WHERE id = $1",
        "UPDATE users SET is_active = FALSE WHERE id = $1",
    ] {
        let err = sqlx::query(sql)
            .bind(alice)
            .execute(&pg.pool)
            .await
            .expect_err(sql);
        let code = err.as_database_error().and_then(|db| db.code()).map(|c| c.into_owned());
        assert_eq!(code.as_deref(), Some("23514"), "{}", sql);
    }

    pg.remove().await
}

#[tokio::test]
async fn blog_posts_join_their_author_and_keep_slugs_unique() -> Result<()> {
    let Some(pg) = PgSchema::create().await? else {
        return Ok(());
    };
    let server = TestServer::start_with_store(pg.store()).await?;
    let (_, admin_token) = server.admin("admin@artika.test").await?;

    let (status, body) = server
        .post(
            "/admin/blog",
            Some(&admin_token),
            json!({ "title": "Hello, World!", "content": "First post", "tags": ["news", "studio"] }),
        )
        .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["slug"], "hello-world");
    assert_eq!(body["data"]["author_name"], "Studio Admin");
    assert_eq!(body["data"]["tags"], json!(["news", "studio"]));
    let first = body["data"]["id"].as_i64().expect("post id");

    let (status, _) = server
        .post("/admin/blog", Some(&admin_token), json!({ "title": "Hello World", "content": "Same slug" }))
        .await?;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, body) = server
        .post("/admin/blog", Some(&admin_token), json!({ "title": "Second", "content": "Body" }))
        .await?;
    let second = body["data"]["id"].as_i64().expect("post id");

    let store = pg.store();
    let clash = store
        .blog
        .update(second, BlogChanges { slug: Some("hello-world".to_string()), ..Default::default() })
        .await;
    assert!(matches!(clash, Err(DatabaseError::Conflict(_))), "{:?}", clash);

    let (status, body) = server
        .patch(&format!("/admin/blog/{}", first), Some(&admin_token), json!({ "status": "published" }))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["author_name"], "Studio Admin");
    assert_eq!(body["data"]["content"], "First post");

    let (status, body) = server.get("/blog/hello-world", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["author_name"], "Studio Admin");
    let (_, body) = server.get("/blog", None).await?;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(1));

    let (_, body) = server.get("/admin/blog/stats", Some(&admin_token)).await?;
    assert_eq!(body["data"]["total_posts"], 2);
    assert_eq!(body["data"]["published_count"], 1);

    pg.remove().await
}

#[tokio::test]
async fn portfolio_changes_reach_favorites_and_orders() -> Result<()> {
    let Some(pg) = PgSchema::create().await? else {
        return Ok(());
    };
    let store = pg.store();
    let alice = client(&store, "alice@artika.test").await?;

    store.favorites.add(alice, 2).await?;
    store.favorites.add(alice, 3).await?;
    let order = store
        .orders
        .create(NewOrder { user_id: alice, project_id: Some(3), amount: 99.0, details: None })
        .await?;

    let listed = store.favorites.find_by_owner(alice).await?;
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].title, "Portfolio Website");

    store
        .portfolio
        .update(2, PortfolioChanges { status: Some(ContentStatus::Archived), ..Default::default() })
        .await?;
    let listed = store.favorites.find_by_owner(alice).await?;
    assert_eq!(listed.iter().map(|f| f.favorite.project_id).collect::<Vec<_>>(), [3]);
    assert!(store.favorites.exists(alice, 2).await?);

    store.portfolio.delete(3).await?;
    assert!(!store.favorites.exists(alice, 3).await?);
    let order = store.orders.find_by_id(order.id).await?.expect("order survives");
    assert_eq!(order.project_id, None);

    let missing = store.portfolio.delete(3).await;
    assert!(matches!(missing, Err(DatabaseError::NotFound(_))), "{:?}", missing);

    pg.remove().await
}
