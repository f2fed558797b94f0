//! Host-facing building blocks for screening agent tool calls.
//!
//! `hook` is the contract a host exposes to plugins, `config` turns the raw
//! plugin mapping into validated [`config::Settings`].

pub mod api;
pub mod config;
pub mod error;
pub mod hook;
