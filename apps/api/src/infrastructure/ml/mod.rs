pub mod http_ml_engine;
pub mod traits;
