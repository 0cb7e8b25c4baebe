//! Workspace helpers used by the builtin agents.
//!
//! Small file/text utilities: the agents that use them are mocks
//! producing a believable project scaffold, not a real code generator.

pub mod codegen;
pub mod docs;
pub mod repo;

pub use codegen::ScaffoldGen;
pub use docs::DocBuilder;
pub use repo::RepoOps;
