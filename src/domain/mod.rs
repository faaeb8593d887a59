pub mod new_subscription;
pub mod new_user;
pub mod service_name;
pub mod subscription;
pub mod user;
pub mod user_email;
pub mod user_name;
