pub mod rest;
pub mod router;
pub mod state;
pub mod sweeper;

// Re-export the router builder to make it easily accessible
// to the binary that starts the web server.
pub use router::build_router;
pub use sweeper::{spawn_document_sweeper, sweep_interval};
