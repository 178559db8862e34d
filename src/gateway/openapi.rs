//! OpenAPI / Swagger UI Documentation
//!
//! - Swagger UI: `http://localhost:8080/swagger`
//! - OpenAPI JSON: `http://localhost:8080/openapi`

use utoipa::OpenApi;

use crate::gateway::handlers::HealthResponse;
use crate::gateway::types::{
    AccountData, AmountRequest, CreateAccountRequest, CreateTransferRequest, TransferData,
};

/// Main API Documentation struct
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bank Backend API",
        version = "1.0.0",
        description = "Accounts and atomic money transfers. Amounts are decimal strings with at most two fractional digits.",
        license(
            name = "MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Development"),
    ),
    paths(
        crate::gateway::handlers::health::health_check,
        crate::gateway::handlers::account::list_accounts,
        crate::gateway::handlers::account::create_account,
        crate::gateway::handlers::account::get_account,
        crate::gateway::handlers::account::delete_account,
        crate::gateway::handlers::account::deposit,
        crate::gateway::handlers::account::withdraw,
        crate::gateway::handlers::account::list_account_transfers,
        crate::gateway::handlers::transfer::create_transfer,
    ),
    components(
        schemas(
            HealthResponse,
            AccountData,
            TransferData,
            CreateAccountRequest,
            AmountRequest,
            CreateTransferRequest,
        )
    ),
    tags(
        (name = "Account", description = "Account lifecycle and single-account balance changes"),
        (name = "Transfer", description = "Transfers between two accounts"),
        (name = "System", description = "Health checks")
    )
)]
pub struct ApiDoc;
