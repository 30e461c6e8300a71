pub mod error;
pub mod money;
pub mod nota;
pub mod response;

pub use error::{AppError, Result};
pub use response::{ApiResponse, Paginated};
