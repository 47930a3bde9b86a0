pub mod session;
pub mod table;
