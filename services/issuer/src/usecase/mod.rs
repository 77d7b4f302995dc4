pub mod dashboard;
pub mod ledger;
pub mod otp;
pub mod template;
pub mod tenant;
