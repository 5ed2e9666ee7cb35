// Single-instance coordination and the local URL delivery channel

pub mod client;
pub mod error;
pub mod server;
pub mod singleton;

pub use client::{ServiceOptions, UrlClient};
pub use error::{Error, Result};
pub use server::{UrlDelivery, UrlServer};
pub use singleton::SingletonGuard;
