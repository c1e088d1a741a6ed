//! Database operations for the `restrooms` table.

mod read;
mod types;
mod write;

pub use read::{count_restrooms, list_eligible_restrooms};
pub use types::{NewRestroom, RestroomRow};
pub use write::{replace_all_restrooms, INSERT_BATCH_SIZE};
