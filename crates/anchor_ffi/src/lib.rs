//! Flutter-facing bindings for the Anchor check-in core.

pub mod api;
