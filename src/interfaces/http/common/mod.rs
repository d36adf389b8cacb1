pub mod response;
pub mod validated_json;

pub use response::{ok, ApiError, ApiResponse, ApiResult};
pub use validated_json::ValidatedJson;
