use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;

pub static START_TIME: Lazy<DateTime<Utc>> = Lazy::new(Utc::now);

/// Content types the ingestion pipeline accepts.
pub const ALLOWED_IMAGE_TYPES: [&str; 4] = [
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/webp",
];

/// Role header injected by the fronting authenticator. Requests reach this
/// service only through that proxy, so the header value is trusted as-is.
pub const ROLE_HEADER: &str = "x-user-role";

pub fn is_allowed_image_type(content_type: &str) -> bool {
    ALLOWED_IMAGE_TYPES.contains(&content_type)
}
