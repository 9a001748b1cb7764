//! # cimi-browser-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve the CIMI browser as **server-side rendered HTML** that works with
//!   **zero JavaScript**
//! - Map requests into `BrowserService` calls (driving adapter)
//! - Map pages and errors into HTML responses
//!
//! ## No-JS approach
//! - Resources are addressed by path: `/webui/MachineCollection/abc`.
//! - The view mode travels in the query string (`?mode=edit`), so every
//!   request is stateless.
//! - Writes are `<form>` posts to `/actions/*` answered with a redirect
//!   (PRG pattern); outcome messages ride along as `?message=`.
//!
//! ## Dependency rule
//! Depends on `cimi-browser-app` (for the port trait and services) and
//! `cimi-browser-domain` (for locations and errors). Never leaks axum types
//! into the domain.

pub mod error;
pub mod router;
pub mod state;
pub mod webui;

#[cfg(test)]
mod test_support;
