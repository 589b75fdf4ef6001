//! CLI commands for tagrank

pub mod dispatch;
pub mod init;
pub mod rank;
pub mod tag;
