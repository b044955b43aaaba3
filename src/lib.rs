//! Franchise pulse library
//!
//! Trailer sentiment and franchise-relative performance scores for movie
//! franchises. Exposes modules for integration testing and binary reuse.

pub mod domain;
pub mod infra;
pub mod io;
pub mod services;
