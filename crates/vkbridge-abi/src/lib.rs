//! ABI analysis and bridge-model assembly for the vkbridge generator.
//!
//! Takes the resolved catalog and required set, decides which structures
//! differ between the two ABI targets, orders declarations, synthesizes
//! the conversion/free function family and classifies every function into
//! its dispatch scope with inferred parameter directions.
//!
//! ## Modules
//!
//! - [`layout`] — memoized cross-ABI alignment/conversion predicates
//! - [`order`] — forward-reference-free structure ordering
//! - [`classify`] — function scope and parameter direction inference
//! - [`convert`] — conversion/free synthesis with identity dedup
//! - [`model`] — the assembled [`model::BridgeModel`]
//! - [`pipeline`] — orchestration of the above

pub mod classify;
pub mod convert;
pub mod error;
pub mod layout;
pub mod model;
pub mod order;
pub mod pipeline;

pub use classify::{
    classify_functions, param_direction, Classified, Direction, FunctionBinding, FunctionScope,
};
pub use convert::{
    conversion_copies_chain_only, member_copy_kind, param_needs_conversion, synthesize, Arrayness,
    ConversionDirection, ConversionFunction, CopyKind, FreeFunction, SynthesizedOp,
};
pub use error::AbiError;
pub use layout::LayoutAnalyzer;
pub use model::{BridgeModel, ModelSummary};
pub use order::dependency_order;
pub use pipeline::build_model;
