pub mod compose;
pub mod image;
pub mod supports;
