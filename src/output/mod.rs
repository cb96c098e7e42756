mod response;

pub use response::{print_message, report_error};
