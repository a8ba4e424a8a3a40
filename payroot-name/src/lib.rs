mod name;

pub use name::{Error, Name};
