//! # Journey Planner
//!
//! Mood-driven itinerary suggestions for the time between a departure and
//! an arrival, plus a small in-memory to-do list with keyword templates.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (times, moods, suggestions, tasks)
//! - **planner**: Request validation, the offline catalog, and AI/fallback orchestration
//! - **agents**: AI backends and the itinerary agent
//! - **api**: REST API endpoints
//! - **tasks**: To-do list state and keyword template matching
//! - **config**: Configuration loading and validation

pub mod agents;
pub mod api;
pub mod config;
pub mod models;
pub mod planner;
pub mod tasks;

pub use models::*;
