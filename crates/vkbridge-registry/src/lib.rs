//! Registry document model and typed entity catalog for the vkbridge
//! generator.
//!
//! The registry document describes a large, versioned graphics API: its
//! types, commands, core feature blocks and extensions. This crate turns
//! that document into a typed, name-keyed arena of entities that the rest
//! of the generator traverses.
//!
//! ## Modules
//!
//! - [`raw`] — raw registry document records (serde/TOML boundary)
//! - [`scalar`] — C scalar types and their alignment behavior
//! - [`entity`] — the closed entity sum type and member shapes
//! - [`catalog`] — the two-pass arena construction and lookups
//! - [`config`] — generator policy tables and numbering constants

pub mod catalog;
pub mod config;
pub mod entity;
pub mod error;
pub mod raw;
pub mod scalar;

pub use catalog::{max_enum_name, Catalog, MAX_ENUM_SENTINEL};
pub use config::{FunctionOverride, GeneratorConfig, EXT_BASE, EXT_BLOCK_SIZE};
pub use entity::{
    Entity, EntityId, EntityKind, EnumValue, Member, StructType, TypeRef, CHAIN_MEMBER, TAG_MEMBER,
};
pub use error::RegistryError;
pub use raw::{RawExtension, RawExtensionKind, RawFeature, RawRegistry};
pub use scalar::ScalarType;
