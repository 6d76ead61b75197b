pub mod code_generator;
pub mod jwt;
pub mod object_key;
pub mod pagination;
pub mod phone;

pub use code_generator::{generate_random_id, normalize_coupon_code};
pub use jwt::*;
pub use object_key::*;
pub use phone::*;
pub use pagination::*;
