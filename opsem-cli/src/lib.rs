//! Library half of the `opsem` binary: the fixture catalog, the harness
//! that resolves branches and calls around a frame, and the commands.

pub mod catalog;
pub mod commands;
pub mod harness;
pub mod logger;
