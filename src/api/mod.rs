pub mod client;
pub mod recordings;

pub use client::*;
