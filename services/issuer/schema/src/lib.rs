//! sea-orm entities for the issuer service.

pub mod otp_records;
pub mod templates;
pub mod tenants;
