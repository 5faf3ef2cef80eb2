//! Graph repair and normalization

pub mod normalizer;

pub use normalizer::normalize;
