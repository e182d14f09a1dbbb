pub mod file;
pub mod traits;

// Re-export
pub use file::FilePlayerRepository;
pub use traits::PlayerRepository;
