//! Ticketgen Engine - text-to-work-item generation
//!
//! The engine that:
//! - Extracts typed work items from free-form notes
//! - Reviews the result and raises clarifying questions
//! - Folds human answers back into a refined structure
//! - Drives the whole run through a strict state machine
//!
//! # Example
//!
//! ```rust,ignore
//! use tg_engine::Pipeline;
//! use tg_model::IssueType;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut pipeline = Pipeline::new(None);
//! pipeline
//!     .run_extraction("Build login.\n\nAdd password reset.", "PROJ", IssueType::Task)
//!     .await?;
//! pipeline.run_review().await?;
//! let structure = pipeline.finalize()?;
//!
//! println!("{} items generated", structure.total_items());
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Engine modules
pub mod contract;
pub mod error;
pub mod extraction;
pub mod handoff;
pub mod pipeline;
pub mod prompts;
pub mod render;
pub mod review;

// Re-exports for convenience
pub use contract::{parse_extraction, parse_review};
pub use error::{ContractError, EngineError};
pub use extraction::ExtractionEngine;
pub use handoff::{
    CreatedItem, HandoffError, StructureSerializer, UploadClient, UploadError, UploadFailure,
};
pub use pipeline::{allowed_transitions, Pipeline, PipelineState};
pub use render::flatten;
pub use review::ReviewEngine;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for driving a generation run
    pub use crate::{
        EngineError, ExtractionEngine, Pipeline, PipelineState, ReviewEngine,
    };
    pub use tg_model::{IssueType, TicketStructure};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
