pub mod history;
pub mod orders;
