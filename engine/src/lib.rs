pub mod config;
pub mod logger;
pub mod puzzle;
mod session_rng;

pub use session_rng::SessionRng;
