pub mod dashboard;
pub mod health;
pub mod otp;
pub mod templates;
pub mod tenants;
