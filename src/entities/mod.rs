pub mod accounts;
pub mod contents;
pub mod coupons;
pub mod course_plans;
pub mod courses;
pub mod enrollments;
pub mod internship_registrations;
pub mod modules;
pub mod payments;
pub mod progress;
pub mod sessions;
pub mod users;

pub use accounts as account_entity;
pub use contents as content_entity;
pub use coupons as coupon_entity;
pub use course_plans as course_plan_entity;
pub use courses as course_entity;
pub use enrollments as enrollment_entity;
pub use internship_registrations as internship_registration_entity;
pub use modules as module_entity;
pub use payments as payment_entity;
pub use progress as progress_entity;
pub use sessions as session_entity;
pub use users as user_entity;

pub use users::UserRole;
