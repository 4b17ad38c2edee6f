//! CityZen: citizen complaint reporting.
//!
//! The HTTP API lives under [`features`]; [`client`] holds the submission flow used by
//! the `cityzen-submit` binary.

pub mod client;
pub mod core;
pub mod features;
pub mod modules;
pub mod shared;
