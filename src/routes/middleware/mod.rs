mod json_error;
mod panic;

pub use json_error::json_error_middleware;
pub use panic::{html_panic_layer, json_panic_layer};
