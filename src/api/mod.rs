pub mod docs;
pub mod handlers;
pub mod types;

pub use handlers::*;
pub use types::*;
