//! # cimi-browser-app
//!
//! Application layer: use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define the **driven port** adapters implement:
//!   - `ResourceClient` — GET / PUT / POST / DELETE of JSON resources
//! - Define the **driving** use-cases:
//!   - `BrowserService` — load a page, update, create, delete, run actions
//!   - `BrowserSession` — one viewer: view mode, editor buffer, messages
//! - Build the presentation-agnostic **page view model**
//! - Sequence overlapping navigations so only the latest one renders
//!
//! ## Dependency rule
//! Depends on `cimi-browser-domain` only.
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod editor;
pub mod navigation;
pub mod page;
pub mod ports;
pub mod services;
pub mod session;

#[cfg(test)]
mod test_support;
