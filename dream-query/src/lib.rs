pub mod app_config;
pub mod cache;
pub mod memory;
pub mod queries;
pub mod remote;

pub use app_config::Config;
pub use cache::{QueryCache, QueryKey};
pub use memory::MemoryBackend;
pub use queries::Queries;
pub use remote::RemoteBackend;
