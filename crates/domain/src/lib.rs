#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

pub mod log;
pub mod text;

mod custom_workout;
mod error;
mod exercise;
mod key_value;
mod keyword;
mod met;
mod name;
mod pace;
mod plan;
mod profile;
mod service;
mod session_record;
mod settings;
mod workout;

pub use custom_workout::*;
pub use error::*;
pub use exercise::*;
pub use key_value::*;
pub use keyword::*;
pub use met::*;
pub use name::*;
pub use pace::*;
pub use plan::*;
pub use profile::*;
pub use service::*;
pub use session_record::*;
pub use settings::*;
pub use workout::*;
