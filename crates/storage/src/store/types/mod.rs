#![forbid(unsafe_code)]

mod dependencies;
mod events;
mod resources;
mod schedules;
mod tasks;

pub use dependencies::*;
pub use events::*;
pub use resources::*;
pub use schedules::*;
pub use tasks::*;
