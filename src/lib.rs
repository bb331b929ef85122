pub mod application;
pub mod automation;
pub mod cli;
pub mod domain;
pub mod protocol;
pub mod reports;
pub mod storage;
pub mod tr;

pub use domain::*;
pub use storage::Repository;
