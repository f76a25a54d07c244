//! # SignalRGB Control Library
//!
//! `signalrgb-control-lib` is a Rust library for controlling a SignalRGB
//! instance over its local REST API. It provides typed access to lighting
//! effects, effect presets, canvas brightness and enabled state, and device
//! layouts.
//!
//! This library is designed to be used by command-line tools or other client
//! applications that require control over SignalRGB lighting.
//!
//! ## Features
//!
//! - Asynchronous client ([`AsyncSignalRgbClient`]) and a blocking
//!   counterpart ([`SignalRgbClient`]) built on top of it
//! - Effect listing with single-slot caching and explicit refresh
//! - Effect lookup and apply by id or by name
//! - Brightness, enabled-state, preset, and layout control
//! - A closed error taxonomy ([`SignalRgbError`]) suitable for matching in
//!   user-facing tools
//!
//! ## Example
//!
//! ```no_run
//! use signalrgb_control_lib::AsyncSignalRgbClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = AsyncSignalRgbClient::new("localhost", 16038);
//!
//!     for effect in client.list_effects().await? {
//!         println!("{}: {}", effect.id, effect.attributes.name);
//!     }
//!
//!     client.apply_effect_by_name("Rainbow Wave").await?;
//!     client.set_brightness(75).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! Set the `SIGNALRGB_DEBUG=1` environment variable to trace requests and
//! responses through the `log` facade.
//!
//! ## Disclaimer
//!
//! This project is not affiliated with, authorized by, endorsed by, or in any
//! way officially connected with WhirlwindFX or SignalRGB. The official
//! SignalRGB website can be found at [https://signalrgb.com](https://signalrgb.com).
//!
//! ## License
//!
//! This project is dual-licensed under the MIT License and the Apache License,
//! Version 2.0. You may choose to use either license, depending on your
//! project needs.

// The `client` module provides the domain operations: effect listing and
// lookup, apply actions, brightness/enabled control, presets, and layouts,
// in both async and blocking flavors.
pub mod client;

// The `error` module defines the closed error taxonomy every operation
// reports through.
pub mod error;

// The `model` module contains the serde types for the wire format: effects,
// layouts, presets, the current canvas state, and the response envelope.
pub mod model;

mod transport;

#[cfg(test)]
mod testing;

pub use client::blocking::SignalRgbClient;
pub use client::AsyncSignalRgbClient;
pub use error::{Result, SignalRgbError};
pub use transport::{DEBUG_ENV_VAR, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_TIMEOUT};
