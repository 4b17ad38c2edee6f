mod ai_client;

pub use ai_client::*;
