pub mod constants;
pub mod media;
pub mod types;
pub mod validation;
