pub mod job;
pub mod reply;
pub mod target;
