//! Structogram Core Types
//!
//! This crate provides the foundational types shared by the Structogram
//! crates:
//!
//! - **Grammar**: the arena-backed derivation tree read from a parse tree
//!   export ([`grammar`] module)
//! - **Colors**: element colors in Structorizer's hex notation
//!   ([`color::Color`])

pub mod color;
pub mod grammar;
