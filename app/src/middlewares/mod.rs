pub mod auth;
pub mod onboarding_gate;
