//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate upload parsing, directory storage, scheduling and calendar
//!   storage into use-case level APIs.
//! - Keep CLI callers decoupled from storage details.

pub mod cake_day_service;
