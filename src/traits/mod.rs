//! Core traits for the service container.

mod dispose;

pub use dispose::Dispose;
