pub mod agent;
pub mod alert;
pub mod metrics;
pub mod shared;
pub mod user;
pub mod warehouse;
