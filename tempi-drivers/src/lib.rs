//! Seesaw capability drivers
//!
//! This crate provides drivers for seesaw-based breakouts, each written
//! against the [`tempi_seesaw::Seesaw`] read/write capability:
//!
//! - Soil sensor: capacitive moisture with a sliding-window filter
//! - NeoPixel: device-side pixel buffer upload and latch
//! - Keypad: key matrix event FIFO
//!
//! The drivers never talk to each other. Each one owns the device handle it
//! was constructed with.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod keypad;
pub mod neopixel;
pub mod soil;

pub use keypad::{Edge, KeyEvent, Keypad, KeypadError};
pub use neopixel::{NeoPixel, NeoPixelConfig, NeoPixelError, Rgba};
pub use soil::{MoistureFilter, SoilError, SoilSensor};
