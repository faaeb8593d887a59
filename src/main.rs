use user_subscriptions::config::get_configuration;
use user_subscriptions::startup::Application;
use user_subscriptions::telemetry::{get_subscriber, init_subscriber};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let subscriber = get_subscriber(String::from("user_subscriptions"), String::from("info"));

    init_subscriber(subscriber);

    let config = get_configuration().map_err(|err| {
        tracing::error!("Failed to load configuration: {:?}", err);
        std::io::Error::new(std::io::ErrorKind::Other, err)
    })?;
    let application = Application::build(config).await?;

    tracing::info!("Server listening on port {}", application.get_port());

    application.run_until_stop().await
}
