//! Domain layer.
//!
//! Pure business logic with no infrastructure dependencies.

pub mod idss;
