pub mod assignment;
pub mod transition;
