//! Use cases composed from the preprocessing, recognition and
//! notification contexts.

pub mod engine_error;
pub mod greet_use_case;
pub mod identity_engine;
