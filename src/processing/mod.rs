pub mod extractors;
pub mod field_correction;
pub mod personal_info;
pub mod tokenizer;

pub use extractors::FieldExtractor;
pub use field_correction::FieldCorrection;
pub use personal_info::extract_personal_info;
pub use tokenizer::MrzTokenizer;
