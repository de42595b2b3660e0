pub mod error_details;

pub use error_details::error_details_middleware;
