pub mod cookies;
pub mod crypto;
pub mod encryption;
pub mod global_error_handler;
pub mod jwt;
pub mod response;
