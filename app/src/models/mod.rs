pub mod account;
pub mod address;
pub mod user;
