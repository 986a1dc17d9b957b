// SPDX-License-Identifier: GPL-3.0-only

//! Keyboard variant sets and the builders that produce them.
//!
//! A [`VariantSet`] maps every [`VariantId`] to a resolved [`Variant`] for one
//! [`ConfigurationKey`]. It is immutable once built and is replaced as a whole
//! when the key changes.
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use keyswitch::layout::{ConfigurationKey, JsonLayoutSetBuilder, LayoutSetBuilder, VariantId};
//!
//! let builder = JsonLayoutSetBuilder::bundled();
//! match builder.build(&key) {
//!     Ok(set) => {
//!         let alphabet = set.get(VariantId::Alphabet);
//!         println!("alphabet top padding: {}px", alphabet.top_padding);
//!     }
//!     Err(e) => eprintln!("Failed to build layout set: {}", e),
//! }
//! ```
//!
//! ## Rebuild Decisions
//!
//! Whether a load must rebuild is a pure comparison of keys:
//!
//! ```rust,ignore
//! if ConfigurationKey::needs_rebuild(current.map(VariantSet::key), &next) {
//!     // build a new set for `next`
//! }
//! ```

// Sub-modules
pub mod builder;
pub mod descriptor;
pub mod types;

// Re-export public API - Builders
pub use builder::{JsonLayoutSetBuilder, LayoutSetBuilder};
pub use descriptor::{LayoutSetDescriptor, VariantDescriptor};

// Re-export public API - Data structures
pub use types::{
    ConfigurationKey, EditorContext, IconSet, InputType, KeyboardMode, LayoutBuildError,
    ScriptId, Subtype, Variant, VariantId, VariantSet, VariantTemplate,
};
