mod document;
mod note;

pub use document::*;
pub use note::*;
