#![forbid(unsafe_code)]

mod core;
mod graph;
mod indexes;
mod resources;
mod schedules;
mod tasks;

pub(super) fn full_schema_sql() -> String {
    let mut sql = String::new();
    sql.push_str(core::SQL);
    sql.push_str(schedules::SQL);
    sql.push_str(tasks::SQL);
    sql.push_str(graph::SQL);
    sql.push_str(resources::SQL);
    sql.push_str(indexes::SQL);
    sql
}
