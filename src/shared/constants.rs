/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

// =============================================================================
// COMPLAINT UPLOADS
// =============================================================================

/// Multipart field carrying complaint photos
pub const IMAGES_FIELD: &str = "images";

/// Maximum size of a single uploaded image (10MB)
pub const MAX_IMAGE_SIZE: usize = 10 * 1024 * 1024;

/// Maximum number of photos attached to one complaint
pub const MAX_IMAGES_PER_COMPLAINT: usize = 10;

/// Body limit for multipart routes: every image plus form overhead
pub const MAX_UPLOAD_BODY_SIZE: usize = MAX_IMAGE_SIZE * MAX_IMAGES_PER_COMPLAINT + 1024 * 1024;
