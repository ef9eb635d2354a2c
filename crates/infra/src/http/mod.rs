//! HTTP plumbing shared by calendar providers

pub mod client;

pub use client::{HttpClient, HttpClientBuilder};
