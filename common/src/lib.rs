pub mod api;
pub mod proposal;
pub mod shortid;
