pub mod config;
pub mod data;
pub mod error;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod upstream;
