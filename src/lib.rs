//! Forks one child that exits immediately while the parent stays alive
//! without reaping it, so the child sits in the process table as a zombie
//! for the length of the parent's delay.
//!
//! The window is not synchronized: an ancestor or subreaper that collects
//! children on its own can still shorten it.

pub mod cli;
pub mod config;
pub mod error;
pub mod event;
pub mod forker;
pub mod observer;
pub mod output;
