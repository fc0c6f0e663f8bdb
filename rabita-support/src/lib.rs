//! # rabita support
//!
//! Shared text-rendering utilities for the rabita crates:
//! - dependency-chain and suggestion formatting for error messages
//! - count tables for the boot report summary

pub mod rendering;
