#![forbid(unsafe_code)]

mod rows;
mod schema;
mod task_tx;
mod time;

pub(super) use rows::*;
pub(super) use schema::install_schema;
pub(super) use task_tx::counters::*;
pub(super) use task_tx::delete::*;
pub(super) use task_tx::events::*;
pub(super) use time::{now_ms, today};
