pub mod health_check_routes;
pub mod service_routes;

pub use health_check_routes::create_health_check_router;
pub use service_routes::create_service_router;
