//! HTTP clients for the GetUFit backend deployments.
//!
//! Two services, one call per endpoint, all returning [`ApiResult`]:
//!
//! - [`CoachClient`] — onboarding, plan generation, general coach chat, and
//!   chat-history PDF export.
//! - [`RetrievalClient`] — the personal ("own data") bot and the plan
//!   ingestion endpoint that feeds its corpus.
//!
//! Nothing here retries or backs off; every retry in this system is a
//! manual user action.

pub mod coach;
pub mod error;
pub mod retrieval;
pub mod types;

pub use coach::CoachClient;
pub use error::{ApiError, ApiResult};
pub use retrieval::RetrievalClient;
pub use types::{ChatReply, PdfResponse, PlanResponse};
