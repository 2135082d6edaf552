//! Test-suite support for Helio applications
//!
//! Three independent conveniences:
//!
//! - [`ServerGuard`] starts the local dev server before a suite when nothing
//!   is listening on the configured pair, and stops it afterwards only if it
//!   was the one that started it. The [`suite`] module exposes the
//!   before-first/after-last hooks a test runner drives.
//! - [`TestResponse`] wraps a framework response with redirect inspection
//!   and a bounded redirect-following loop over the application
//!   [`Entrypoint`].
//! - [`assert_raises`] runs an operation that must error and checks the
//!   error's concrete type.

pub mod assert;
pub mod config;
pub mod error;
pub mod response;
pub mod server;
pub mod suite;

pub use assert::{assert_raises, BoxError};
pub use config::ServerConfig;
pub use error::{Result, TestingError};
pub use response::{Entrypoint, Request, Response, TestResponse, DEFAULT_MAX_HOPS};
pub use server::ServerGuard;
