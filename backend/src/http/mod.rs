//! HTTP boundary service.
//!
//! ```text
//! POST /generate-params
//!   ├─ resolve UTC offset from lat/lon      (services::timezone)
//!   ├─ download seven upstream documents    (services::fetcher)
//!   └─ run the analysis over them           (services::orchestrator)
//! GET /health
//! ```

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::create_router;
pub use state::AppState;
