pub mod access_key;
pub mod mrtd;

pub use access_key::AccessKey;
pub use mrtd::MRTDVerifier;
