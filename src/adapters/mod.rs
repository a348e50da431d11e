pub mod identity;
pub mod repositories;
pub mod storage;
