//! Implementations of the tasks

pub mod nft;
pub mod swap;
