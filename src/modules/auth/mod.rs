pub mod middleware;
mod routes;
pub mod service;

pub use routes::get_router;
