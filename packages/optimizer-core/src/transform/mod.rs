pub mod decode;
pub mod encode;
pub mod format;
pub mod params;
pub mod transcode;

pub use decode::{decode_image, read_dimensions};
pub use encode::encode_image;
pub use format::{Classification, FormatRegistry, extension_of};
pub use params::{Codec, EncodeSettings, JpegQuality, PngCompression};
pub use transcode::{Transcoded, transcode};
