use reqwest::Response;
use sqlx::{migrate, Connection, Executor, PgConnection, PgPool};
use uuid::Uuid;

use user_subscriptions::{
    config::{get_configuration, DatabaseSettings},
    startup::{get_connection_db_pool, Application},
};

pub struct TestApp {
    pub address: String,
    pub db_pool: PgPool,
    pub api_client: reqwest::Client,
}

impl TestApp {
    pub async fn spawn_app() -> TestApp {
        let mut config = get_configuration().expect("Missing configuration file.");
        let db_test_name = format!("db_{}", Uuid::new_v4().to_string().replace('-', "_"));

        // We are using port 0 as way to define a different port per each test. Port 0 is a special case that operating systems
        // take into account: when port is 0, the OS will search for the first available port
        config.set_app_port(0);

        let db_pool = configure_db(&mut config.database, db_test_name.clone()).await;

        let application = Application::build(config)
            .await
            .expect("Failed to build application.");

        let address = format!("http://127.0.0.1:{}", application.get_port());

        tokio::spawn(application.run_until_stop());

        TestApp {
            address,
            db_pool,
            api_client: reqwest::Client::new(),
        }
    }

    pub async fn post_user(&self, body: serde_json::Value) -> Response {
        self.api_client
            .post(&format!("{}/users", self.address))
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get_user(&self, user_id: &str) -> Response {
        self.api_client
            .get(&format!("{}/users/{}", self.address, user_id))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn put_user(&self, user_id: &str, body: serde_json::Value) -> Response {
        self.api_client
            .put(&format!("{}/users/{}", self.address, user_id))
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn delete_user(&self, user_id: &str) -> Response {
        self.api_client
            .delete(&format!("{}/users/{}", self.address, user_id))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_subscription(&self, user_id: &str, body: serde_json::Value) -> Response {
        self.api_client
            .post(&format!("{}/users/{}/subscriptions", self.address, user_id))
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get_subscriptions(&self, user_id: &str) -> Response {
        self.api_client
            .get(&format!("{}/users/{}/subscriptions", self.address, user_id))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn delete_subscription(&self, user_id: &str, subscription_id: &str) -> Response {
        self.api_client
            .delete(&format!(
                "{}/users/{}/subscriptions/{}",
                self.address, user_id, subscription_id
            ))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get_top_subscriptions(&self) -> Response {
        self.api_client
            .get(&format!("{}/subscriptions/top", self.address))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    /// Creates a user and returns its id.
    pub async fn create_user(&self, name: &str, email: &str) -> String {
        let response = self
            .post_user(serde_json::json!({ "name": name, "email": email }))
            .await;

        assert_eq!(201, response.status().as_u16());

        let body: serde_json::Value = response.json().await.expect("Invalid user body.");

        body["id"].as_str().expect("Missing user id.").to_string()
    }

    /// Adds a subscription to `user_id` and returns its id.
    pub async fn create_subscription(&self, user_id: &str, service_name: &str) -> String {
        let response = self
            .post_subscription(user_id, serde_json::json!({ "serviceName": service_name }))
            .await;

        assert_eq!(201, response.status().as_u16());

        let body: serde_json::Value = response
            .json()
            .await
            .expect("Invalid subscription body.");

        body["id"]
            .as_str()
            .expect("Missing subscription id.")
            .to_string()
    }
}

async fn configure_db(db_config: &mut DatabaseSettings, db_test_name: String) -> PgPool {
    // Create database
    let mut connection = PgConnection::connect_with(&db_config.get_db_options_without_name())
        .await
        .expect("Failed to connect to Postgres.");

    connection
        .execute(&*format!(r#"CREATE DATABASE "{}";"#, db_test_name))
        .await
        .expect("Failed to create database.");

    connection
        .close()
        .await
        .expect("Failed to close connection.");

    // Execute migrations
    db_config.set_name(db_test_name.clone());

    let db_pool = get_connection_db_pool(db_config);

    migrate!("./migrations")
        .run(&db_pool)
        .await
        .expect("Failed to run migrations.");

    println!("Database {} created!!", db_test_name);

    db_pool
}
