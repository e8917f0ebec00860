pub mod api;
pub mod config;
pub mod deadline;
pub mod format;
pub mod models;
pub mod surface;
pub mod workers;
