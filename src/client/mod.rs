//! Citizen-side capture-and-submit flow.
//!
//! | Piece | Role |
//! |-------|------|
//! | [`SubmissionFlow`] | Owns the draft and drives capture, enrichment and submission |
//! | [`ComplaintGateway`] / [`CityZenApi`] | Backend calls (AI detection, recommendations, upload) |
//! | [`Device`] / [`LocalDevice`] | Camera, photo library and GPS |
//! | [`read_exif_gps`] | Position from photo EXIF tags |
//! | [`ReverseGeocoder`] / [`NominatimGeocoder`] | Coordinates to address |
//! | [`RoleView`] | Per-role home view |

pub mod ai_gate;
pub mod api;
pub mod debounce;
pub mod device;
pub mod draft;
pub mod error;
#[cfg(test)]
pub(crate) mod fakes;
pub mod flow;
pub mod local;
pub mod location;
pub mod photo;
pub mod session;

pub use api::{CityZenApi, ComplaintGateway};
pub use device::{CapturedImage, Device, ImageSource, Permission};
pub use draft::{CategoryChoice, ComplaintDraft};
pub use error::ClientError;
pub use flow::{CaptureReport, FlowState, Screen, SubmissionFlow};
pub use local::LocalDevice;
pub use location::{ExifCoordinate, ExifGps, NominatimGeocoder, ReverseGeocoder};
pub use photo::read_exif_gps;
pub use session::RoleView;
