pub mod commands;
pub mod config;
pub mod display;
pub mod listening;
pub mod messages;
pub mod outcome;
pub mod retry;
pub mod subtitle;
pub mod text;
pub mod types;

// Keep the public surface small and intentional.
pub use commands::*;
pub use config::*;
pub use display::*;
pub use listening::*;
pub use outcome::*;
pub use retry::*;
pub use subtitle::*;
pub use text::*;
pub use types::*;
