//! Wire contract shared by every route: the success envelope and extractors
//! whose rejections use the error envelope.

pub mod extract;
pub mod response;

pub use extract::{AppJson, AppPath, AppQuery};
pub use response::{ApiResponse, ApiResult};
