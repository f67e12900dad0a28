//! Command handlers, one module per command group.

pub mod borrowers;
pub mod init;
pub mod items;
pub mod loans;
pub mod maintenance;
pub mod policy;
pub mod reports;
