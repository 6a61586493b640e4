pub mod api;
pub mod auth;
pub mod commands;
pub mod palette;
pub mod questions;
pub mod utils;

pub use api::{ChatClient, Outcome};
pub use auth::{clear_api_key, ensure_api_key, store_api_key};
pub use questions::load_questions;
