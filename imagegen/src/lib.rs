//! Client for the streaming image generation service.

pub mod client;
pub mod decoder;
pub mod error;
pub mod events;

pub use client::*;
pub use decoder::*;
pub use error::*;
pub use events::*;
