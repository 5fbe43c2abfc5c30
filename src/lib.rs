//! preen - async media core for list-style feed clients.
//!
//! Fetches remote images and link thumbnails in the background, caches
//! decoded results with request deduplication and forced-refresh semantics,
//! and delivers completions to a single UI-affine queue so a scrolling list
//! never blocks on the network.
//!
//! The crate is organized hexagonally: `domain` holds entities, errors, and
//! port traits; `infrastructure` the HTTP, cache, and provider adapters;
//! `application` the resolver dispatch; `presentation` the UI queue and the
//! row/pane bindings a widget layer drives.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Application layer containing resolver dispatch.
pub mod application;
/// Domain layer containing entities, errors, and port definitions.
pub mod domain;
/// Infrastructure layer containing HTTP, cache, and provider adapters.
pub mod infrastructure;
/// Presentation layer containing the UI queue and display bindings.
pub mod presentation;

/// Current version of the crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
