//! IT helpdesk chat service.
//!
//! Knowledge-base answers (retrieval over a CSV corpus), a device-status
//! function-calling pass, five static quick actions, and an axum web UI.

pub mod bot;
pub mod config;
pub mod devices;
pub mod error;
pub mod knowledge;
pub mod llm;
pub mod logger;
pub mod orchestrator;
pub mod prompt;
pub mod quick_actions;
pub mod retrieval;
pub mod session;
pub mod web;
