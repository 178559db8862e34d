//! Gateway types module
//!
//! ## Submodules
//! - [`dto`]: Request/response bodies
//! - [`response`]: Response envelope, errors and error codes

pub mod dto;
pub mod response;

// Re-export commonly used types at module root
pub use dto::{
    AccountData, AmountRequest, CreateAccountRequest, CreateTransferRequest, TransferData,
    parse_decimal,
};
pub use response::{ApiError, ApiResponse, ApiResult, created, error_codes, ok};
