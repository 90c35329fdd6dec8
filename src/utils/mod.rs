//! Utility functions for image processing
//!
//! This module provides the low-level building blocks the sheet pipeline
//! is assembled from:
//! - Grayscale conversion (RGB to luminance)
//! - Binarization (inverse mean-C adaptive threshold)
//! - Contrast equalization (CLAHE)
//! - Contour retrieval, polygon approximation, enclosing circles
//! - Straight segment extraction from edge maps

pub mod binarization;
pub mod contours;
pub mod contrast;
pub mod geometry;
pub mod grayscale;
pub mod lines;
