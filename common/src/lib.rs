//! Shared models for hostsieve.
//!
//! Everything the pipeline passes between stages lives here: the canonical
//! [`Domain`] and [`DomainSet`], probe results, the aliveness policy, the
//! source catalog record, the run configuration and the error type.

pub mod config;
pub mod domain;
pub mod error;
pub mod policy;
pub mod probe;
pub mod source;

pub use config::{Config, ProbeSettings};
pub use domain::{Domain, DomainSet};
pub use error::{ErrorCategory, IoResultExt, Result, SieveError};
pub use policy::{AlivenessPolicy, HttpThreshold, ProbeSelection, Requirement};
pub use probe::{LivenessVerdict, ProbeKind, ProbeResult};
pub use source::Source;
