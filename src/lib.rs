// ABOUTME: Library crate for the IGCSE ICT tutoring portal client exposing the public API for testing

#![allow(missing_docs)]

pub mod api;
pub mod app;
pub mod cli;
pub mod components;
pub mod config;
pub mod materials;
pub mod session;
