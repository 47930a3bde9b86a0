//! # client
//!
//! Client-side half of the account system: a typed procedure client for the
//! auth server, the session store that keeps the signed-in user and token,
//! token persistence, and the view state behind the admin data tables.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`net`] | Wire types and the [`net::api::AuthApi`] procedure client |
//! | [`state`] | [`state::session::AuthSession`] and [`state::table::DataTableState`] |
//! | [`util`] | Token storage backends and form validation |

pub mod net;
pub mod state;
pub mod util;
