//! Service layer for msgcrypt
//!
//! The service layer ties the crypto core to persisted settings.

pub mod account;

pub use account::AccountService;
