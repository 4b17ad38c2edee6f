mod complaint;
mod complaint_image;

pub use complaint::{
    Complaint, ComplaintCategory, ComplaintDetails, ComplaintFilter, ComplaintStatus,
    CreateComplaint,
};
pub use complaint_image::ComplaintImage;
