pub mod config;
pub mod export;
pub mod input;
pub mod runner;

pub use config::AppConfig;
pub use export::write_tables;
pub use input::read_parties;
pub use runner::{WorkerStats, partition, run_batch, run_worker};
