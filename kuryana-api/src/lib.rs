// Kuryana API Library
//
// HTTP route layer over the kuryana-core dispatch facade

pub mod http;

// Re-export commonly used types
pub use http::{create_router, AppState};
