//! Preprocessing steps that sit between loading model output and analysis.
//!
//! The step implemented here is variable derivation: computing variables a
//! model did not publish from the ones it did, and annotating registry
//! descriptors so downstream code knows which inputs to load.

pub mod derive;
pub mod error;

pub use derive::{
    annotate_derived, derivation_for, derive as derive_variable, get_required, DerivedVariable,
    RequiredVar,
};
pub use error::{DeriveError, DeriveResult};
