//! Domain layer containing business entities and logic.
//!
//! This module has no dependencies on infrastructure or presentation layers.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`click_event`] - Click counting event model
//! - [`click_worker`] - Asynchronous click processing worker
//!
//! # Click Processing Flow
//!
//! 1. HTTP handler resolves a short code and answers with a redirect
//! 2. [`click_event::ClickEvent`] is sent to a bounded channel without waiting
//! 3. [`click_worker::run_click_worker`] applies the increment through
//!    [`repositories::LinkRepository::increment_clicks`]

pub mod click_event;
pub mod click_worker;
pub mod entities;
pub mod repositories;
