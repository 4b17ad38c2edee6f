mod ai_service;

pub use ai_service::AiService;

#[cfg(test)]
pub(crate) use ai_service::tests::FakeAiGateway;
