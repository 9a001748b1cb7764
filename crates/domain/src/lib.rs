//! # cimi-browser-domain
//!
//! Pure domain model for browsing a CIMI (Cloud Infrastructure Management
//! Interface) server.
//!
//! ## Responsibilities
//! - Resource **references** and the **base endpoint** they resolve against
//! - **Page locations**: reading the viewed reference out of a fragment,
//!   building view URLs and breadcrumb trails
//! - **Documents**: classification (entry point / collection / item) and the
//!   order-preserving metadata/content partition
//! - Typed views: **metadata**, **operations**, **ACLs**, **collections**,
//!   **entry point links**
//! - The **view mode** state machine
//! - The `$filter` expression grammar
//!
//! ## Dependency rule
//! This crate has **no internal dependencies** and performs no IO.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;

pub mod acl;
pub mod collection;
pub mod document;
pub mod entry_point;
pub mod filter;
pub mod location;
pub mod metadata;
pub mod operation;
pub mod reference;
pub mod view_mode;
