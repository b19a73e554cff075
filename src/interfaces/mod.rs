//! Outer surfaces: file formats consumed and produced by the binary.

pub mod csv;
