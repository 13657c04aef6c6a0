pub mod formatter;
pub mod test_case;

pub use formatter::OutputFormatter;
pub use test_case::{TestCase, EXECUTOR_URI};
