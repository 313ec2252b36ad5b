//! Provisioning workflows
//!
//! Each workflow resolves its inputs first, then opens a scoped workspace on
//! the target through a `CommandOperator`, uploads what the install script
//! needs and runs it. The workspace is removed whether or not a step fails.

pub mod boundary;
pub mod workspace;

#[cfg(test)]
pub(crate) mod testing;

pub use workspace::Workspace;
