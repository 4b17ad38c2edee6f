mod health_service;

pub use health_service::*;

#[cfg(test)]
pub(crate) use health_service::tests::FixedProbe;
