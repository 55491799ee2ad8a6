//! FFI crate exposing the StudyMate reminder core to the host app.

pub mod api;
