//! Domain model for people and their celebrations.
//!
//! # Responsibility
//! - Define the records shared by scheduling, persistence and upload code.
//! - Own validation rules that every persisted record must satisfy.

pub mod celebration;
pub mod person;
