pub mod boards;
pub mod members;
