pub mod actor;
pub mod batch;
pub mod driver;
pub mod history;
pub mod order;
pub mod zone;
