pub mod config;
pub mod error;
pub mod geometry;
pub mod session;
pub mod spiral;
pub mod visualization;
