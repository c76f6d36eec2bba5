// Shared components
pub mod config;

// Domain layer (business logic)
pub mod renderer;

// Application layer
pub mod api;
pub mod server;
