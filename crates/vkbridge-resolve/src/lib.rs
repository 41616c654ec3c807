//! Feature and extension reachability resolution for the vkbridge
//! generator.
//!
//! Consumes the ordered core feature blocks and the extension blocks of a
//! registry document, applies the extension inclusion policy, computes the
//! transitive required-entity closure and applies extension enum
//! contributions.
//!
//! ## Modules
//!
//! - [`policy`] — extension inclusion predicate
//! - [`numbering`] — extension enumerator value computation
//! - [`reach`] — the required-closure walk and [`reach::Resolution`]

pub mod error;
pub mod numbering;
pub mod policy;
pub mod reach;

pub use error::ResolveError;
pub use numbering::{bit_value, extension_enum_value};
pub use policy::filter_extensions;
pub use reach::{resolve, ExtensionInfo, RequiredSet, Resolution};
