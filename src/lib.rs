//! Izma - backend and documentation tooling for the Physical AI textbook
//!
//! The library provides the HTTP API (auth, chat, profiles), its SQL storage,
//! and the Gemini-driven Urdu translator used by the `translate-docs` and
//! `list-models` binaries.

pub mod api;
pub mod config;
pub mod db;
pub mod models;
pub mod services;
pub mod translation;
