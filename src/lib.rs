//! Sylva - syntax tree nodes with a shared base contract
//!
//! This is the root workspace crate that provides integration tests.
//! The implementation lives in the workspace member crates.

pub use sylva_ast as ast;
