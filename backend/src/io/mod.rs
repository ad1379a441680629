//! # IO Module
//!
//! Adapter layer between HTTP callers and the domain. Translates requests into domain
//! commands, domain results into the DTOs of the `shared` crate, and domain errors into
//! status codes.

pub mod rest;
