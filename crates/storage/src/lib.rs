#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

pub mod app_log;
pub mod database;
pub mod file;
pub mod memory;

pub use app_log::Log;
pub use database::Database;
pub use file::FileStore;
pub use memory::MemoryStore;
