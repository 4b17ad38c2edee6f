pub mod clients;
pub mod dtos;
pub mod handlers;
pub mod routes;
pub mod services;

pub use clients::HttpAiGateway;
pub use routes::routes;
pub use services::AiService;
