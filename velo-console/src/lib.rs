//! velo-console library interface
//!
//! Exposes the console core for integration testing: data models, the
//! session store, API service clients, and the listing/review controllers.

pub mod controllers;
pub mod models;
pub mod services;
pub mod store;
