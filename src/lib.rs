pub mod analytics;
pub mod api;
pub mod config;
pub mod display;
pub mod error;
pub mod events;
pub mod model;
pub mod orchestrator;
pub mod web;
