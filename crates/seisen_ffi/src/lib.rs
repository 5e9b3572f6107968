//! Flutter bridge for the Seisen core.

pub mod api;
