use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckEnrollmentRequest {
    #[serde(default)]
    pub course_id: Option<i64>,
}

#[derive(Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CheckEnrollmentResponse {
    pub enrolled: bool,
}
