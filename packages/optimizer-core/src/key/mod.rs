pub mod derive;

pub use derive::{KeyMarker, derive_destination_key};
