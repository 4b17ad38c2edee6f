//! User profiles keyed by Firebase UID.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | POST | `/api/users` | Register a citizen, authority or admin profile |
//! | GET | `/api/users/{firebaseUid}` | Fetch a profile after sign-in |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;

pub use routes::routes;
pub use services::UserService;
