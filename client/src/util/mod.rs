pub mod storage;
pub mod validate;
