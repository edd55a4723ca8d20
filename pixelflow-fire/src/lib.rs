//! # pixelflow-fire — fire effect demo
//!
//! Drives a pixelflow display with the classic palette fire effect. The
//! simulation reads and writes the canvas through the public
//! `pixelflow-core` API only; keys from the terminal adjust the heat.

pub mod config;
pub mod fire;
pub mod keys;
