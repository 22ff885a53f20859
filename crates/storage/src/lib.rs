#![forbid(unsafe_code)]

//! SQLite persistence for project schedules: the active-schedule rule, WBS task
//! repository, precedence graph and resource ledger, with the domain rules of
//! `wbs_core` checked inside every write transaction.

mod store;

pub use store::*;
