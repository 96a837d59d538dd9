//! Virtual tables over remote collaboration APIs, built on `api-wrappers`.
//!
//! Each wrapper lives under [`fdw`] behind its own cargo feature.

pub mod fdw;
pub mod stats;
