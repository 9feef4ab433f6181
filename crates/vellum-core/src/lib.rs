//! Vellum Core Types and Definitions
//!
//! This crate provides the foundational types for the Vellum rendering
//! engine. It includes:
//!
//! - **Colors**: CSS color parsing and serialization ([`color::Color`])
//! - **Geometry**: Basic geometric types ([`geometry`] module)
//! - **Gradients**: Gradient descriptors and the angle-to-axis geometry
//!   ([`gradient`] module)
//! - **Fonts**: The closed font catalog with empirical metric ratios
//!   ([`font`] module)

pub mod color;
pub mod font;
pub mod geometry;
pub mod gradient;
