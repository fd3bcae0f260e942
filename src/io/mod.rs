//! Export of collected draws. Each format sits behind a cargo feature.

#[cfg(feature = "csv")]
pub mod csv;
