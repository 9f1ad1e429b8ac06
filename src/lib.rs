//! Pure Rust async implementation of the [Source RCON protocol](https://developer.valvesoftware.com/wiki/Source_RCON_Protocol).
pub mod client;
pub mod config;
pub mod console;
pub mod error;
pub mod packet;
pub mod session;

#[cfg(test)]
mod testing;

pub use client::{Client, Response};
pub use config::ClientConfig;
pub use error::RconError;
pub use packet::{Origin, Packet, PacketType};
pub use session::{Session, SessionState};
