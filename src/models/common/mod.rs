pub mod pagination;
pub mod response;
pub mod validation;

pub use pagination::{PaginationInfo, page_window};
pub use response::ApiResponse;
pub use validation::{FieldErrors, WriteMode};
