use sqlx::{postgres::PgRow, Row};

use crate::helpers::TestApp;

#[tokio::test]
async fn create_user_returns_201_and_the_new_user() {
    let test_app = TestApp::spawn_app().await;

    let response = test_app
        .post_user(serde_json::json!({ "name": "Alice", "email": "a@x.com" }))
        .await;

    assert_eq!(201, response.status().as_u16());

    let body: serde_json::Value = response.json().await.unwrap();

    assert!(body["id"].is_string());
    assert_eq!(body["name"], "Alice");
    assert_eq!(body["email"], "a@x.com");
}

#[tokio::test]
async fn create_user_persists_the_new_user() {
    let test_app = TestApp::spawn_app().await;

    test_app.create_user("Alice", "a@x.com").await;

    let (name, email): (String, String) = sqlx::query("SELECT name, email FROM users;")
        .map(|row: PgRow| (row.get::<String, _>("name"), row.get::<String, _>("email")))
        .fetch_one(&test_app.db_pool)
        .await
        .expect("Query to fetch users failed.");

    assert_eq!(name, "Alice");
    assert_eq!(email, "a@x.com");
}

#[tokio::test]
async fn create_user_returns_409_when_email_is_taken() {
    let test_app = TestApp::spawn_app().await;

    test_app.create_user("Alice", "a@x.com").await;
    let response = test_app
        .post_user(serde_json::json!({ "name": "Bob", "email": "a@x.com" }))
        .await;

    assert_eq!(409, response.status().as_u16());
}

#[tokio::test]
async fn create_user_returns_400_when_body_is_invalid() {
    let test_app = TestApp::spawn_app().await;

    // This is a common practice and it is called table-driven tests. In this case, it simulates different kind of possible request bodies
    // where API should return 400.
    let test_cases = vec![
        (serde_json::json!({}), "missing body parameters"),
        (serde_json::json!({ "name": "Alice" }), "missing email parameter"),
        (serde_json::json!({ "email": "a@x.com" }), "missing name parameter"),
        (
            serde_json::json!({ "name": "", "email": "a@x.com" }),
            "empty name parameter",
        ),
        (
            serde_json::json!({ "name": "   ", "email": "a@x.com" }),
            "blank name parameter",
        ),
        (
            serde_json::json!({ "name": "Alice", "email": "x.com" }),
            "invalid email parameter",
        ),
    ];

    for (invalid_body, error_message) in test_cases {
        let response = test_app.post_user(invalid_body).await;

        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 status when payload was {}",
            error_message
        );
    }
}

#[tokio::test]
async fn create_user_accepts_names_with_punctuation() {
    let test_app = TestApp::spawn_app().await;

    let response = test_app
        .post_user(serde_json::json!({ "name": "Smith (Jr)", "email": "smith@x.com" }))
        .await;

    assert_eq!(201, response.status().as_u16());

    let body: serde_json::Value = response.json().await.unwrap();

    assert_eq!(body["name"], "Smith (Jr)");
}

#[tokio::test]
async fn get_user_returns_the_stored_user() {
    let test_app = TestApp::spawn_app().await;
    let user_id = test_app.create_user("Alice", "a@x.com").await;

    let response = test_app.get_user(&user_id).await;

    assert_eq!(200, response.status().as_u16());

    let body: serde_json::Value = response.json().await.unwrap();

    assert_eq!(body["id"], user_id.as_str());
    assert_eq!(body["name"], "Alice");
    assert_eq!(body["email"], "a@x.com");
}

#[tokio::test]
async fn get_user_returns_404_when_user_does_not_exist() {
    let test_app = TestApp::spawn_app().await;

    let response = test_app.get_user(&uuid::Uuid::new_v4().to_string()).await;

    assert_eq!(404, response.status().as_u16());
    assert!(response.text().await.unwrap().contains("not found"));
}

#[tokio::test]
async fn update_user_overwrites_name_and_email() {
    let test_app = TestApp::spawn_app().await;
    let user_id = test_app.create_user("Alice", "a@x.com").await;

    let response = test_app
        .put_user(
            &user_id,
            serde_json::json!({ "name": "Alicia", "email": "alicia@x.com" }),
        )
        .await;

    assert_eq!(200, response.status().as_u16());

    let stored: serde_json::Value = test_app.get_user(&user_id).await.json().await.unwrap();

    assert_eq!(stored["name"], "Alicia");
    assert_eq!(stored["email"], "alicia@x.com");
}

#[tokio::test]
async fn update_user_with_its_own_email_succeeds() {
    let test_app = TestApp::spawn_app().await;
    let user_id = test_app.create_user("Alice", "a@x.com").await;

    let response = test_app
        .put_user(
            &user_id,
            serde_json::json!({ "name": "Alice Smith", "email": "a@x.com" }),
        )
        .await;

    assert_eq!(200, response.status().as_u16());
}

#[tokio::test]
async fn update_user_returns_409_when_email_belongs_to_another_user() {
    let test_app = TestApp::spawn_app().await;
    let alice_id = test_app.create_user("Alice", "a@x.com").await;
    test_app.create_user("Bob", "b@x.com").await;

    let response = test_app
        .put_user(
            &alice_id,
            serde_json::json!({ "name": "Alice", "email": "b@x.com" }),
        )
        .await;

    assert_eq!(409, response.status().as_u16());
}

#[tokio::test]
async fn update_user_returns_404_when_user_does_not_exist() {
    let test_app = TestApp::spawn_app().await;

    let response = test_app
        .put_user(
            &uuid::Uuid::new_v4().to_string(),
            serde_json::json!({ "name": "Alice", "email": "a@x.com" }),
        )
        .await;

    assert_eq!(404, response.status().as_u16());
}

#[tokio::test]
async fn delete_user_is_idempotent() {
    let test_app = TestApp::spawn_app().await;
    let user_id = test_app.create_user("Alice", "a@x.com").await;

    assert_eq!(200, test_app.delete_user(&user_id).await.status().as_u16());
    assert_eq!(200, test_app.delete_user(&user_id).await.status().as_u16());
    assert_eq!(404, test_app.get_user(&user_id).await.status().as_u16());
}

#[tokio::test]
async fn get_user_returns_404_when_id_is_not_a_uuid() {
    let test_app = TestApp::spawn_app().await;

    let response = test_app.get_user("42").await;

    assert_eq!(404, response.status().as_u16());
}
