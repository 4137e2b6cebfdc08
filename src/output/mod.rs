pub mod pretty;

pub use pretty::{format_value, Style};
