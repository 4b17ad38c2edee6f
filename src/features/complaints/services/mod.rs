mod complaint_service;
mod recommendation_service;

pub use complaint_service::*;
pub use recommendation_service::*;

#[cfg(test)]
pub(crate) use recommendation_service::tests::StubRecommender;
