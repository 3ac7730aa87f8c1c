mod token_store;
mod user_directory;

pub use token_store::*;
pub use user_directory::*;
