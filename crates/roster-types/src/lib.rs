pub mod api;
pub mod models;

pub use models::{Event, Member, Registration, Season, Status};
