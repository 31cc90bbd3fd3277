pub mod document_ops;
pub mod nav_ops;
pub mod search_ops;

pub use document_ops::*;
pub use nav_ops::*;
pub use search_ops::*;
