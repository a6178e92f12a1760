pub mod auth;
pub mod menu;
pub mod menu_item;
pub mod notification;
pub mod restaurant;
pub mod user;

mod router;
pub use router::get_router;
