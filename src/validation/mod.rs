pub mod expiry;
pub mod format;
pub mod mrz;

pub use expiry::ExpiryValidator;
pub use format::{DocumentClassifier, FormatValidator};
pub use mrz::{compute_check_digit, is_check_digit_valid, MrzValidator};
