use async_trait::async_trait;
use std::path::PathBuf;

use crate::client::error::ClientError;
use crate::client::location::ExifGps;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Camera,
    MediaLibrary,
    Location,
}

impl Permission {
    pub fn resource(self) -> &'static str {
        match self {
            Self::Camera => "camera",
            Self::MediaLibrary => "media library",
            Self::Location => "location",
        }
    }

    pub fn denied(self) -> ClientError {
        ClientError::PermissionDenied(self.resource())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSource {
    Camera,
    Library,
}

impl ImageSource {
    pub fn permission(self) -> Permission {
        match self {
            Self::Camera => Permission::Camera,
            Self::Library => Permission::MediaLibrary,
        }
    }
}

/// A photo reference plus whatever GPS tags its metadata carried
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedImage {
    pub path: PathBuf,
    pub exif_gps: Option<ExifGps>,
}

/// Camera, photo library and GPS of the device running the flow
#[async_trait]
pub trait Device: Send + Sync {
    /// Ask the user; `false` means refused
    async fn request_permission(&self, permission: Permission) -> bool;

    /// Returns no images when the user cancels the picker
    async fn capture(&self, source: ImageSource) -> Result<Vec<CapturedImage>, ClientError>;

    /// Current `(latitude, longitude)`
    async fn current_position(&self) -> Result<(f64, f64), ClientError>;
}
