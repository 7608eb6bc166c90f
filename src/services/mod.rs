//! External collaborators
//!
//! - Media resolution (experiment id -> video URL)
//! - Background lookup runner
//! - Platform URL opener

pub mod lookup;
pub mod opener;
pub mod resolver;

pub use lookup::MediaLookup;
pub use opener::open_url;
pub use resolver::{resolver_from_config, MediaResolver, OfflineResolver, Resolution, StorageResolver};
