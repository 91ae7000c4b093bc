//! Ticketgen work-item model
//!
//! Typed entities for everything the pipeline extracts:
//! - [`Epic`] / [`Task`] for feature development
//! - [`Bug`] reports with environment and technical context
//! - [`UserStory`] in the agile template form
//! - [`TicketStructure`]: the per-run container
//! - [`CritiqueResult`]: the review engine's structured output
//!
//! Invariants are enforced at construction. Model responses are a primary
//! source of malformed values, so every constructor rejects out-of-range
//! fields with a [`ValidationError`] instead of letting them propagate, and
//! enum-like fields are closed sets that fail deserialization on stray
//! literals.
//!
//! # Example
//!
//! ```rust
//! use tg_model::{Epic, IssueType, Task, TicketStructure};
//!
//! # fn example() -> Result<(), tg_model::ValidationError> {
//! let epic = Epic::new("User authentication", "Secure account access")?
//!     .with_task(Task::new("Implement login endpoint", "POST /api/auth/login")?);
//!
//! let structure = TicketStructure::new("PROJ", IssueType::Task)?.with_epics(vec![epic]);
//! assert_eq!(structure.total_items(), 2);
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod critique;
pub mod error;
pub mod structure;
pub mod types;

pub use critique::CritiqueResult;
pub use error::ValidationError;
pub use structure::TicketStructure;
pub use types::{
    Bug, EffortSize, Environment, Epic, IssueType, Priority, Severity, Task, TechnicalDetails,
    UserStory,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
