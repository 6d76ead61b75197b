pub mod admin_service;
pub mod auth_service;
pub mod coupon_service;
pub mod course_service;
pub mod storage_service;
pub mod user_service;

pub use admin_service::*;
pub use auth_service::*;
pub use coupon_service::*;
pub use course_service::*;
pub use storage_service::*;
pub use user_service::*;
