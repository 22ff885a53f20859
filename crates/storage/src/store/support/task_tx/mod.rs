#![forbid(unsafe_code)]

pub(in crate::store) mod counters;
pub(in crate::store) mod delete;
pub(in crate::store) mod events;
