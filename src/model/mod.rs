pub mod todo;
pub mod state;
pub mod config;

pub use todo::*;
pub use state::*;
pub use config::*;
