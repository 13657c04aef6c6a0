pub mod string;

pub use string::{beautify_for_display, clean_type_name, extract_last_segment};
