//! Easel: an AI design assistant that turns chat responses into editable
//! canvas documents.
//!
//! The root crate is the plugin surface: it receives [`PluginMessage`]s
//! from the panel UI, drives the transcode pipeline in `easel-transcode`
//! against a host [`easel_canvas::Canvas`], and keeps failures contained
//! to a user notification so the host document is never left half-built.

pub mod message;
pub mod plugin;

pub use message::{PluginMessage, PluginReply};
pub use plugin::Plugin;
