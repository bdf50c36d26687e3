use std::time::{SystemTime, UNIX_EPOCH};

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

fn unique_suffix() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock must be after unix epoch")
        .as_nanos();
    format!("{nanos}")
}

fn base_url() -> String {
    std::env::var("BLOGICUM_HTTP_URL").unwrap_or_else(|_| "http://127.0.0.1:8080".to_string())
}

async fn register(client: &Client, base: &str, username: &str) -> (i64, String) {
    let response = client
        .post(format!("{base}/api/auth/register"))
        .json(&json!({
            "username": username,
            "email": format!("{username}@example.com"),
            "password": "password123",
            "password_confirmation": "password123",
        }))
        .send()
        .await
        .expect("register request must be sent");
    assert_eq!(response.status(), StatusCode::CREATED);

    let body: Value = response.json().await.expect("register body must be json");
    let token = body["access_token"]
        .as_str()
        .expect("access_token must be a string")
        .to_string();
    assert_eq!(body["token_type"], "Bearer");
    let user_id = body["account"]["id"].as_i64().expect("user id must be a number");
    (user_id, token)
}

#[tokio::test]
#[ignore = "requires running HTTP server and database"]
async fn http_smoke_flow() {
    let base = base_url();
    let client = Client::new();
    let suffix = unique_suffix();

    let alice = format!("alice_{suffix}");
    let bob = format!("bob_{suffix}");
    let (alice_id, alice_token) = register(&client, &base, &alice).await;
    let (_, bob_token) = register(&client, &base, &bob).await;

    let login = client
        .post(format!("{base}/api/auth/login"))
        .json(&json!({ "username": alice, "password": "password123" }))
        .send()
        .await
        .expect("login request must be sent");
    assert_eq!(login.status(), StatusCode::OK);

    let me: Value = client
        .get(format!("{base}/api/auth/me"))
        .bearer_auth(&alice_token)
        .send()
        .await
        .expect("me request must be sent")
        .json()
        .await
        .expect("me body must be json");
    assert_eq!(me["id"].as_i64(), Some(alice_id));

    let anonymous_delete = client
        .delete(format!("{base}/api/admin/categories/1"))
        .send()
        .await
        .expect("delete request must be sent");
    assert_eq!(anonymous_delete.status(), StatusCode::UNAUTHORIZED);

    let non_staff_delete = client
        .delete(format!("{base}/api/admin/categories/1"))
        .bearer_auth(&bob_token)
        .send()
        .await
        .expect("delete request must be sent");
    assert_eq!(non_staff_delete.status(), StatusCode::FORBIDDEN);

    let created: Value = client
        .post(format!("{base}/api/posts"))
        .bearer_auth(&alice_token)
        .json(&json!({ "title": "smoke title", "text": "smoke text" }))
        .send()
        .await
        .expect("create request must be sent")
        .json()
        .await
        .expect("create body must be json");
    let post_id = created["id"].as_i64().expect("post id must be a number");
    assert_eq!(created["title"], "smoke title");

    let listed: Value = client
        .get(format!("{base}/api/posts"))
        .send()
        .await
        .expect("list request must be sent")
        .json()
        .await
        .expect("list body must be json");
    let items = listed["items"].as_array().expect("items must be an array");
    assert!(items.iter().any(|item| item["id"] == post_id));

    let comment = client
        .post(format!("{base}/api/posts/{post_id}/comments"))
        .bearer_auth(&bob_token)
        .json(&json!({ "text": "nice" }))
        .send()
        .await
        .expect("comment request must be sent");
    assert_eq!(comment.status(), StatusCode::CREATED);
    let comment: Value = comment.json().await.expect("comment body must be json");
    let comment_id = comment["id"].as_i64().expect("comment id must be a number");

    let foreign_delete = client
        .delete(format!("{base}/api/posts/{post_id}/comments/{comment_id}"))
        .bearer_auth(&alice_token)
        .send()
        .await
        .expect("delete request must be sent");
    assert_eq!(foreign_delete.status(), StatusCode::FORBIDDEN);

    let draft = client
        .put(format!("{base}/api/posts/{post_id}"))
        .bearer_auth(&alice_token)
        .json(&json!({ "title": "smoke draft", "text": "smoke text", "is_published": false }))
        .send()
        .await
        .expect("update request must be sent");
    assert_eq!(draft.status(), StatusCode::OK);

    let anonymous = client
        .get(format!("{base}/api/posts/{post_id}"))
        .send()
        .await
        .expect("detail request must be sent");
    assert_eq!(anonymous.status(), StatusCode::NOT_FOUND);

    let own: Value = client
        .get(format!("{base}/api/posts/{post_id}"))
        .bearer_auth(&alice_token)
        .send()
        .await
        .expect("detail request must be sent")
        .json()
        .await
        .expect("detail body must be json");
    assert_eq!(own["post"]["title"], "smoke draft");
    assert_eq!(own["post"]["comment_count"], 1);

    let profile: Value = client
        .get(format!("{base}/api/profile/{alice}"))
        .query(&[("page", "1")])
        .bearer_auth(&bob_token)
        .send()
        .await
        .expect("profile request must be sent")
        .json()
        .await
        .expect("profile body must be json");
    assert_eq!(profile["posts"]["total_items"], 0);

    let deleted = client
        .delete(format!("{base}/api/posts/{post_id}"))
        .bearer_auth(&alice_token)
        .send()
        .await
        .expect("delete request must be sent");
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    let after_delete = client
        .get(format!("{base}/api/posts/{post_id}"))
        .bearer_auth(&alice_token)
        .send()
        .await
        .expect("detail request must be sent");
    assert_eq!(after_delete.status(), StatusCode::NOT_FOUND);
}
