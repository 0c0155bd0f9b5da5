//! poll-manage: scheduling poll option edits, vote-loss guard and CSV export with Hexagonal Architecture.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod shared;
pub mod usecases;
