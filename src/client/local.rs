use async_trait::async_trait;
use std::path::PathBuf;

use crate::client::device::{CapturedImage, Device, ImageSource, Permission};
use crate::client::error::ClientError;
use crate::client::photo::read_exif_gps;

/// Photos come from files on disk. Their GPS tags are read from the file metadata; the fixed
/// position, when given, stands in for the device GPS.
pub struct LocalDevice {
    images: Vec<PathBuf>,
    fallback_position: Option<(f64, f64)>,
}

impl LocalDevice {
    pub fn new(images: Vec<PathBuf>, fallback_position: Option<(f64, f64)>) -> Self {
        Self {
            images,
            fallback_position,
        }
    }
}

#[async_trait]
impl Device for LocalDevice {
    async fn request_permission(&self, permission: Permission) -> bool {
        match permission {
            Permission::Camera => false,
            Permission::MediaLibrary => true,
            Permission::Location => self.fallback_position.is_some(),
        }
    }

    async fn capture(&self, _source: ImageSource) -> Result<Vec<CapturedImage>, ClientError> {
        let mut captured = Vec::with_capacity(self.images.len());
        for path in &self.images {
            let bytes = tokio::fs::read(path).await?;
            let exif_gps = read_exif_gps(&bytes);
            if exif_gps.is_some() {
                tracing::debug!("GPS tags found in {}", path.display());
            }
            captured.push(CapturedImage {
                path: path.clone(),
                exif_gps,
            });
        }
        Ok(captured)
    }

    async fn current_position(&self) -> Result<(f64, f64), ClientError> {
        self.fallback_position.ok_or_else(|| {
            ClientError::LocationUnavailable("the photo has no GPS tags".to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::fakes::{geotagged_tiff, FakeGateway, FakeGeocoder};
    use crate::client::flow::SubmissionFlow;
    use std::path::Path;
    use std::sync::Arc;

    async fn write_photo(name: &str, bytes: &[u8]) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("cityzen-{}", uuid::Uuid::new_v4()));
        tokio::fs::create_dir_all(&dir).await.unwrap();
        let path = dir.join(name);
        tokio::fs::write(&path, bytes).await.unwrap();
        path
    }

    fn flow(device: LocalDevice) -> SubmissionFlow {
        let mut flow = SubmissionFlow::new(
            Arc::new(FakeGateway::detecting("Pothole", 91.0)),
            Arc::new(device),
            Arc::new(FakeGeocoder::answering("Mirpur Road, Dhaka")),
            "citizen-001",
        );
        flow.start();
        flow
    }

    #[tokio::test]
    async fn test_geotagged_photo_locates_without_a_position() {
        let tagged = write_photo(
            "tagged.tiff",
            &geotagged_tiff(
                [(23, 1), (48, 1), (3708, 100)],
                "N",
                [(90, 1), (24, 1), (45, 1)],
                "E",
            ),
        )
        .await;
        let mut flow = flow(LocalDevice::new(vec![tagged], None));

        let report = flow
            .capture_or_pick_image(ImageSource::Library)
            .await
            .unwrap();

        assert!(report.location_error.is_none());
        let location = flow.draft().location.clone().unwrap();
        assert!((location.latitude - 23.8103).abs() < 1e-6);
        assert!((location.longitude - 90.4125).abs() < 1e-6);
        assert_eq!(location.address, "Mirpur Road, Dhaka");
    }

    #[tokio::test]
    async fn test_untagged_photo_uses_the_fixed_position() {
        let plain = write_photo("plain.jpg", &[0xFF, 0xD8, 0xFF, 0xE0]).await;
        let mut flow = flow(LocalDevice::new(vec![plain], Some((22.3569, 91.7832))));

        flow.capture_or_pick_image(ImageSource::Library)
            .await
            .unwrap();

        let location = flow.draft().location.clone().unwrap();
        assert_eq!((location.latitude, location.longitude), (22.3569, 91.7832));
    }

    #[tokio::test]
    async fn test_untagged_photo_without_position_reports_location() {
        let plain = write_photo("plain.jpg", &[0xFF, 0xD8, 0xFF, 0xE0]).await;
        let mut flow = flow(LocalDevice::new(vec![plain], None));

        let report = flow
            .capture_or_pick_image(ImageSource::Library)
            .await
            .unwrap();

        assert!(matches!(
            report.location_error,
            Some(ClientError::PermissionDenied("location"))
        ));
        assert!(flow.draft().location.is_none());
        assert_eq!(flow.draft().images.len(), 1);
    }

    #[tokio::test]
    async fn test_camera_is_unavailable_and_missing_files_fail() {
        let device = LocalDevice::new(vec![Path::new("/nonexistent/cityzen.jpg").into()], None);

        assert!(!device.request_permission(Permission::Camera).await);
        assert!(matches!(
            device.capture(ImageSource::Library).await,
            Err(ClientError::Io(_))
        ));
    }
}
