mod handler;
mod service;
mod types;

pub use handler::{email_handler, sms_handler};
