mod config;
mod error;
mod progress;
mod service;
mod watcher;

pub use config::*;
pub use error::*;
pub use progress::*;
pub use service::*;
pub use watcher::*;
