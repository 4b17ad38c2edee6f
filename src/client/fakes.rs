//! In-process stand-ins for the device, the geocoder and the backend.

use async_trait::async_trait;
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use uuid::Uuid;

use crate::client::api::ComplaintGateway;
use crate::client::device::{CapturedImage, Device, ImageSource, Permission};
use crate::client::draft::{RecommendationInput, Submission};
use crate::client::error::ClientError;
use crate::client::location::{ExifGps, ReverseGeocoder};
use crate::features::ai::clients::Detection;
use crate::features::categories::dtos::CategoryResponseDto;
use crate::features::complaints::dtos::{
    AuthorityRecommendationDto, ComplaintDetailDto, ComplaintResponseDto,
    CreateComplaintResponseDto,
};
use crate::features::complaints::models::ComplaintStatus;
use crate::features::users::dtos::UserResponseDto;
use crate::features::users::models::UserRole;

pub(crate) struct FakeDevice {
    position: (f64, f64),
    denied: Vec<Permission>,
    images: Vec<CapturedImage>,
    position_requests: AtomicUsize,
}

impl FakeDevice {
    pub(crate) fn with_position(latitude: f64, longitude: f64) -> Self {
        Self {
            position: (latitude, longitude),
            denied: Vec::new(),
            images: vec![CapturedImage {
                path: PathBuf::from("pothole.jpg"),
                exif_gps: None,
            }],
            position_requests: AtomicUsize::new(0),
        }
    }

    pub(crate) fn denying(mut self, permission: Permission) -> Self {
        self.denied.push(permission);
        self
    }

    pub(crate) fn capturing(mut self, paths: &[&str], exif_gps: Option<ExifGps>) -> Self {
        self.images = paths
            .iter()
            .map(|p| CapturedImage {
                path: PathBuf::from(p),
                exif_gps: exif_gps.clone(),
            })
            .collect();
        self
    }

    pub(crate) fn position_requests(&self) -> usize {
        self.position_requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Device for FakeDevice {
    async fn request_permission(&self, permission: Permission) -> bool {
        !self.denied.contains(&permission)
    }

    async fn capture(&self, _source: ImageSource) -> Result<Vec<CapturedImage>, ClientError> {
        Ok(self.images.clone())
    }

    async fn current_position(&self) -> Result<(f64, f64), ClientError> {
        self.position_requests.fetch_add(1, Ordering::SeqCst);
        Ok(self.position)
    }
}

pub(crate) struct FakeGeocoder {
    address: Option<String>,
}

impl FakeGeocoder {
    pub(crate) fn answering(address: &str) -> Self {
        Self {
            address: Some(address.to_string()),
        }
    }

    pub(crate) fn failing() -> Self {
        Self { address: None }
    }
}

#[async_trait]
impl ReverseGeocoder for FakeGeocoder {
    async fn reverse(&self, _latitude: f64, _longitude: f64) -> Result<String, ClientError> {
        self.address
            .clone()
            .ok_or_else(|| ClientError::Network("geocoder offline".to_string()))
    }
}

/// Backend double; detection fails when `detection` is `None`
#[derive(Default)]
pub(crate) struct FakeGateway {
    pub(crate) detection: Option<Detection>,
    pub(crate) recommendations: Vec<AuthorityRecommendationDto>,
    pub(crate) submit_failure: Option<(u16, String)>,
    pub(crate) submit_delay: Option<Duration>,
    pub(crate) role: Option<UserRole>,
    pub(crate) detect_calls: AtomicUsize,
    pub(crate) recommend_inputs: Mutex<Vec<RecommendationInput>>,
    pub(crate) submissions: Mutex<Vec<Submission>>,
}

impl FakeGateway {
    pub(crate) fn detecting(label: &str, confidence: f64) -> Self {
        Self {
            detection: Some(Detection {
                label: label.to_string(),
                confidence,
            }),
            ..Default::default()
        }
    }

    pub(crate) fn submission_count(&self) -> usize {
        self.submissions.lock().unwrap().len()
    }

    pub(crate) fn recommend_inputs(&self) -> Vec<RecommendationInput> {
        self.recommend_inputs.lock().unwrap().clone()
    }
}

#[async_trait]
impl ComplaintGateway for FakeGateway {
    async fn detect_pothole(&self, _image: &Path) -> Result<Detection, ClientError> {
        self.detect_calls.fetch_add(1, Ordering::SeqCst);
        self.detection.clone().ok_or(ClientError::Server {
            status: 502,
            message: "AI detection failed".to_string(),
        })
    }

    async fn recommend_authorities(
        &self,
        input: &RecommendationInput,
    ) -> Result<Vec<AuthorityRecommendationDto>, ClientError> {
        self.recommend_inputs.lock().unwrap().push(input.clone());
        Ok(self.recommendations.clone())
    }

    async fn submit_complaint(
        &self,
        submission: &Submission,
    ) -> Result<CreateComplaintResponseDto, ClientError> {
        self.submissions.lock().unwrap().push(submission.clone());
        if let Some(delay) = self.submit_delay {
            tokio::time::sleep(delay).await;
        }

        if let Some((status, message)) = &self.submit_failure {
            return Err(ClientError::Server {
                status: *status,
                message: message.clone(),
            });
        }

        let now = Utc::now();
        Ok(CreateComplaintResponseDto {
            message: "Complaint created successfully".to_string(),
            complaint: ComplaintDetailDto {
                complaint: ComplaintResponseDto {
                    id: Uuid::now_v7(),
                    title: submission.title.clone(),
                    description: Some(submission.description.clone()),
                    latitude: submission.latitude,
                    longitude: submission.longitude,
                    citizen_uid: submission.citizen_uid.clone(),
                    category_id: submission.category_id,
                    current_status: ComplaintStatus::Pending,
                    status_notes: None,
                    created_at: now,
                    updated_at: now,
                },
                category: None,
                images: Vec::new(),
                authority_ids: submission.authority_ids.clone(),
            },
        })
    }

    async fn categories(&self) -> Result<Vec<CategoryResponseDto>, ClientError> {
        Ok(vec![CategoryResponseDto {
            id: 1,
            name: "Roads & Transport".to_string(),
            description: None,
        }])
    }

    async fn profile(&self, firebase_uid: &str) -> Result<UserResponseDto, ClientError> {
        let role = self.role.ok_or(ClientError::Server {
            status: 404,
            message: "User profile not found in database.".to_string(),
        })?;
        Ok(UserResponseDto {
            firebase_uid: firebase_uid.to_string(),
            email: format!("{}@example.com", firebase_uid),
            full_name: "Test Citizen".to_string(),
            role,
            created_at: Utc::now(),
        })
    }
}

/// Minimal TIFF whose only metadata is a GPS position
pub(crate) fn geotagged_tiff(
    latitude: [(u32, u32); 3],
    latitude_ref: &str,
    longitude: [(u32, u32); 3],
    longitude_ref: &str,
) -> Vec<u8> {
    use exif::experimental::Writer;
    use exif::{Field, In, Rational, Tag, Value};

    let ascii = |tag: Tag, text: &str| Field {
        tag,
        ifd_num: In::PRIMARY,
        value: Value::Ascii(vec![text.as_bytes().to_vec()]),
    };
    let rational = |tag: Tag, parts: [(u32, u32); 3]| Field {
        tag,
        ifd_num: In::PRIMARY,
        value: Value::Rational(
            parts
                .iter()
                .map(|&(num, denom)| Rational { num, denom })
                .collect(),
        ),
    };

    let fields = [
        ascii(Tag::GPSLatitudeRef, latitude_ref),
        rational(Tag::GPSLatitude, latitude),
        ascii(Tag::GPSLongitudeRef, longitude_ref),
        rational(Tag::GPSLongitude, longitude),
    ];

    let mut writer = Writer::new();
    for field in &fields {
        writer.push_field(field);
    }
    let mut buffer = std::io::Cursor::new(Vec::new());
    writer.write(&mut buffer, false).unwrap();
    buffer.into_inner()
}
