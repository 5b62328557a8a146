pub mod key;
pub mod params;

pub use key::{decode_notification_key, validate_key};
pub use params::{parse_bool, parse_jpeg_quality, parse_png_compression, parse_unsupported_policy};
