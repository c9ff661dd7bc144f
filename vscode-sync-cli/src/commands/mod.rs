//! Command handlers.

pub mod common;
pub mod init;
pub mod pack;
pub mod preview;
pub mod unpack;
