pub mod address;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod fs;
pub mod page;
pub mod volumes;

pub use dispatch::{router, AppState, SharedState};
pub use error::BrowseError;
pub use page::{Entry, Listing, PageTemplate};
pub use volumes::{FixedVolumes, SystemVolumes, VolumeError, VolumeSource};
