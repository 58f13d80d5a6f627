//! Keystone Core - shared types and pure view-model logic.
//!
//! This crate is used by both binaries of the Keystone web platform:
//! - `site` - Public marketing site API (services, projects, blog, lead funnel)
//! - `admin` - Back-office API for content, moderation and gallery management
//!
//! # Architecture
//!
//! Nothing in here performs I/O.
//! Persistence and HTTP live in the binaries; this crate owns the rules they
//! must agree on.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, validated email, status enums
//! - [`gallery`] - Ordered project gallery with dense display order and a single feature image
//! - [`notifications`] - Back-office notification counts, memoized over their source collections

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod gallery;
pub mod notifications;
pub mod types;

pub use types::*;
