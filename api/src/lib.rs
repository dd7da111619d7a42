// Library exports for testing and the server binary

pub mod app;
pub mod dto;
pub mod handlers;
pub mod routes;
pub mod telemetry;

pub use app::create_app;
pub use routes::otp::AppState;
