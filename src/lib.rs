pub mod dashboard;
pub mod events;
pub mod health;
pub mod pipeline;
pub mod store;
pub mod utils;
