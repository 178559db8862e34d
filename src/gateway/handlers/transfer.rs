//! Transfer handlers

use std::sync::Arc;

use axum::{Json, extract::State};

use super::super::state::AppState;
use super::super::types::{ApiResult, CreateTransferRequest, TransferData, created, parse_decimal};

/// Create a transfer
///
/// POST /api/transfers
///
/// Debit, credit and the transfer record commit together or not at all.
/// A 503 means the accounts were busy and the request can be retried as is.
#[utoipa::path(
    post,
    path = "/api/transfers",
    request_body = CreateTransferRequest,
    responses(
        (status = 201, description = "Transfer committed", body = TransferData),
        (status = 400, description = "Invalid amount, same account, or insufficient funds"),
        (status = 404, description = "Account not found"),
        (status = 503, description = "Accounts busy, retry")
    ),
    tag = "Transfer"
)]
pub async fn create_transfer(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateTransferRequest>,
) -> ApiResult<TransferData> {
    let amount = parse_decimal(&req.amount)?;
    let transfer = state.transfers.transfer(req.from, req.to, amount).await?;
    created(transfer.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::handlers::list_account_transfers;
    use crate::gateway::test_support::state;
    use crate::gateway::types::error_codes;
    use axum::extract::Path;
    use axum::http::StatusCode;
    use rust_decimal_macros::dec;

    fn request(from: i64, to: i64, amount: &str) -> Json<CreateTransferRequest> {
        Json(CreateTransferRequest {
            from,
            to,
            amount: amount.to_string(),
        })
    }

    #[tokio::test]
    async fn test_transfer_created() {
        let state = state();
        let a = state.accounts.create(dec!(100)).await.unwrap();
        let b = state.accounts.create(dec!(0)).await.unwrap();

        let (status, Json(resp)) = create_transfer(State(state.clone()), request(a.id, b.id, "30"))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        let data = resp.data.unwrap();
        assert_eq!(data.amount.to_string(), "30.00");
        assert_eq!((data.from, data.to), (a.id, b.id));

        let (_, Json(resp)) = list_account_transfers(State(state), Path(b.id))
            .await
            .unwrap();
        assert_eq!(resp.data.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_transfer_errors_map_to_status() {
        let state = state();
        let a = state.accounts.create(dec!(10)).await.unwrap();
        let b = state.accounts.create(dec!(0)).await.unwrap();

        let err = create_transfer(State(state.clone()), request(a.id, a.id, "1"))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.code, error_codes::INVALID_TRANSFER);

        let err = create_transfer(State(state.clone()), request(a.id, b.id, "11"))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.code, error_codes::INSUFFICIENT_FUNDS);

        let err = create_transfer(State(state.clone()), request(a.id, 404, "1"))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);

        let err = create_transfer(State(state), request(a.id, b.id, "abc"))
            .await
            .unwrap_err();
        assert_eq!(err.code, error_codes::INVALID_AMOUNT);
    }
}
