//! # State Module
//!
//! Explicit state objects for the kiosk application.
//!
//! The original deployment of this system kept cart, stats and camera as
//! module-level singletons; here every piece of state is an explicit
//! object with constructor-injected dependencies, owned by whatever
//! coordinates the UI:
//!
//! - [`CartState`] - the live cart behind `Arc<Mutex<..>>`
//! - [`KioskConfig`] - read-only configuration resolved at startup
//!
//! The store handle ([`scanline_store::Store`]) is its own state object;
//! its pool is internally thread-safe, so it needs no wrapper here.

mod cart;
mod config;

pub use cart::CartState;
pub use config::KioskConfig;
