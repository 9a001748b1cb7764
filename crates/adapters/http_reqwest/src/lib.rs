//! # cimi-browser-adapter-http-reqwest
//!
//! Driven adapter implementing the `ResourceClient` port over HTTP with
//! `reqwest`.
//!
//! ## Responsibilities
//! - Send `GET` / `PUT` / `POST` / `DELETE` with `Accept: application/json`
//! - Serialize JSON request bodies and decode JSON responses
//! - Map non-2xx statuses and network failures to transport errors
//! - Read the `Location` header of a create
//!
//! ## Dependency rule
//! Depends on `cimi-browser-domain` and `cimi-browser-app` (for the port trait).

pub mod client;
pub mod config;
pub mod error;

pub use client::ReqwestResourceClient;
pub use config::HttpClientConfig;
pub use error::HttpClientError;
