mod database {
    pub mod actions;
    pub mod connection;
    pub mod error;
    pub mod filter;
    pub mod form;
    pub mod schema;
    pub mod views;
}
mod authentication {
    pub mod cryptography;
    pub mod jwt;
    pub mod middleware;
    pub mod permissions;
}
mod config;
mod constants;
mod reply;

pub use authentication::*;
pub use config::*;
pub use constants::*;
pub use database::*;
pub use reply::*;
