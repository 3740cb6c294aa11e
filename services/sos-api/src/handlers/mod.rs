//! HTTP request handlers for the SOS API.

pub mod health;
pub mod observation;
