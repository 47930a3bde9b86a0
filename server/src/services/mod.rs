//! Domain services used by the procedure routes.
//!
//! Service modules own validation, hashing and persistence so handlers stay
//! focused on envelope translation and bearer-token plumbing.

pub mod account;
pub mod session;
