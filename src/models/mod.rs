pub mod admin;
pub mod common;
pub mod coupon;
pub mod course;
pub mod enrollment;
pub mod storage;
pub mod user;

pub use admin::*;
pub use common::*;
pub use coupon::*;
pub use course::*;
pub use enrollment::*;
pub use storage::*;
pub use user::*;
