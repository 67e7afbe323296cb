pub mod auth;
pub mod health;
pub mod mfa;
pub mod session;
