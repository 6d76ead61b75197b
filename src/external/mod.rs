pub mod s3;
pub mod storage;

pub use s3::*;
pub use storage::*;
