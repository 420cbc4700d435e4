//! BFI-2 personality inventory scoring.
//!
//! The [`scoring`] module turns a response set into domain and facet scores
//! driven entirely by a [`ScoringConfig`]. Everything else here is boundary:
//! response files, the question catalogue, the survey-taking agent, report
//! rendering, persisted runs, settings and logging.

pub mod config;
pub mod error;
pub mod report;
pub mod scoring;
pub mod store;
pub mod survey;
pub mod telemetry;
pub mod types;

pub use error::{Bfi2Error, ConfigError, Result, ValidationError};
pub use scoring::{score, ScoringConfig};
pub use types::{DomainScore, FacetScore, ItemId, Likert, ResponseSet, ScoredProfile};
