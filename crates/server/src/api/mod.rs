pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod submissions;
pub mod ws;

pub use routes::create_router;
