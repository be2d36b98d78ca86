// Library surface for headless/integration tests and reuse.
// The terminal front end in main.rs only wires these together.
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod metrics;
pub mod normalize;
pub mod results;
pub mod runtime;
pub mod scheduler;
pub mod session;
pub mod store;
pub mod ui;
pub mod word_generator;
