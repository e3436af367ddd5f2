//! Gateway for AI skin analysis - forwards a photo to the inference service
//!
//! Takes an image as a base64 data URI, sends it to the Python inference
//! endpoint, validates the predicted conditions, and optionally asks a
//! text-generation service for a skincare routine. Results come back as an
//! explicit success/failure outcome ready for display.

pub mod ai;
pub mod chart;
pub mod data_uri;
pub mod error;
pub mod gateway;
pub mod mime;
pub mod models;
pub mod prompts;
pub mod recommendations;
pub mod report;

pub use error::{Error, Result};
pub use gateway::{Gateway, GatewayServices};
