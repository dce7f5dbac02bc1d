//! Ports - Interfaces between the application and external services.
//!
//! Adapters implement these traits; handlers depend only on them.

mod completion_client;

pub use completion_client::{
    safety_details, CompletionClient, CompletionOutcome, ProviderInfo, SafetyRating,
};
