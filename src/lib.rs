pub mod browser;
pub mod config;
pub mod discord;
pub mod email;
pub mod error;
pub mod models;
pub mod notify;
pub mod parsers;
pub mod poller;
pub mod utils;
pub mod vendors;
