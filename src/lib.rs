//! Commutative Replicated Datatype (CRDT) document engine providing support
//! for simultaneous editing of the same document by multiple users, using
//! the algorithm described in
//! <https://hal.archives-ouvertes.fr/hal-00921633/document>.

pub mod allocator;
pub mod character;
pub mod config;
pub mod document;
pub mod error;
pub mod id;
pub mod patch;
pub mod position;

pub use character::Character;
pub use config::Config;
pub use document::Document;
pub use error::Error;
pub use id::SiteId;
pub use patch::Patch;
pub use position::Position;
