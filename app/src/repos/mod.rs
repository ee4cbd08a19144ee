pub mod accounts;
pub mod addresses;
pub mod users;
