use actix_web::dev::Server;
use actix_web::{web, App, HttpServer};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Pool, Postgres};
use std::net::TcpListener;
use std::sync::Arc;
use tracing_actix_web::TracingLogger;

use crate::config::{DatabaseSettings, Settings};
use crate::managers::{SubscriptionManager, UserManager};
use crate::routes::{
    handle_add_subscription, handle_create_user, handle_delete_subscription, handle_delete_user,
    handle_get_user, handle_list_subscriptions, handle_top_subscriptions, handle_update_user,
    health_check,
};
use crate::storage::{PgStorage, Storage};

pub struct Application {
    pub port: u16,
    pub server: Server,
}

impl Application {
    pub async fn build(config: Settings) -> Result<Self, std::io::Error> {
        let db_pool = get_connection_db_pool(&config.database);
        let listener = TcpListener::bind(config.get_address())?;
        let port = listener.local_addr()?.port();
        let server = run(listener, db_pool)?;

        Ok(Self { port, server })
    }

    pub fn get_port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stop(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

pub fn run(listener: TcpListener, db_pool: PgPool) -> Result<Server, std::io::Error> {
    let storage: Arc<dyn Storage> = Arc::new(PgStorage::new(db_pool));
    let user_manager = web::Data::new(UserManager::new(storage.clone()));
    let subscription_manager = web::Data::new(SubscriptionManager::new(storage));

    let server = HttpServer::new(move || {
        // App is where your application logic lives: routing, middlewares, request handler, etc
        App::new()
            // 'wrap' method adds a middleware to the App. This specific middleware provide incoming
            // request logger
            .wrap(TracingLogger::default())
            .route("/health_check", web::get().to(health_check))
            .route("/users", web::post().to(handle_create_user))
            .route("/users/{id}", web::get().to(handle_get_user))
            .route("/users/{id}", web::put().to(handle_update_user))
            .route("/users/{id}", web::delete().to(handle_delete_user))
            .route(
                "/users/{user_id}/subscriptions",
                web::post().to(handle_add_subscription),
            )
            .route(
                "/users/{user_id}/subscriptions",
                web::get().to(handle_list_subscriptions),
            )
            .route(
                "/users/{user_id}/subscriptions/{id}",
                web::delete().to(handle_delete_subscription),
            )
            .route("/subscriptions/top", web::get().to(handle_top_subscriptions))
            .app_data(user_manager.clone())
            .app_data(subscription_manager.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}

pub fn get_connection_db_pool(config: &DatabaseSettings) -> Pool<Postgres> {
    PgPoolOptions::new()
        .acquire_timeout(std::time::Duration::from_secs(2))
        .connect_lazy_with(config.get_db_options())
}
