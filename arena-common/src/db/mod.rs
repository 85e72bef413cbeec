//! Database initialization shared by arena services

pub mod init;

pub use init::*;
