//! wasmbuild-lib: build planning and execution for WebAssembly targets.
//!
//! A build goes through a fixed sequence:
//! - resolve the project root from the build location and the SDK root from the environment
//! - collect sources from the target's source directories
//! - assemble the compiler command line
//! - run it through the shell from the project root

pub mod build;
pub mod command;
pub mod error;
pub mod execute;
pub mod paths;
pub mod sources;
pub mod target;

pub use build::{BuildPlan, plan, run};
pub use error::{BuildError, ErrorKind, Result};
pub use target::BuildTarget;
