//! Domain layer shared by every boardhub crate.
//!
//! Holds the identifier and time types, the error taxonomy, and the pure
//! rules that the persistence and API layers both rely on: the admin
//! quorum predicate, the activity merge used to rebuild board metadata,
//! and the license capability interface.

pub mod error;
pub mod ids;
pub mod license;
pub mod provenance;
pub mod quorum;
pub mod roles;
pub mod types;
