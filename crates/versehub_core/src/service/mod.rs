//! Core use-case services.
//!
//! # Responsibility
//! - Normalize caller input and map repository errors to use-case errors.
//! - Keep presentation layers decoupled from storage details.

pub mod like_service;
pub mod poem_service;
pub mod tag_service;
