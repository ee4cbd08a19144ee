pub mod auth_adapter;
pub mod google;
pub mod onboarding;
