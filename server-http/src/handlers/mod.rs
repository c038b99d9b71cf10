pub mod data_ops;
pub mod health;

pub use data_ops::{create_data, retrieve_data, update_data};
pub use health::health_check;
