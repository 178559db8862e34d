//! Account handlers

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
};
use rust_decimal::Decimal;

use super::super::state::AppState;
use super::super::types::{
    AccountData, AmountRequest, ApiResult, CreateAccountRequest, TransferData, created, ok,
    parse_decimal,
};
use crate::core_types::AccountId;

/// List all accounts
///
/// GET /api/accounts
#[utoipa::path(
    get,
    path = "/api/accounts",
    responses(
        (status = 200, description = "All accounts ordered by id", body = [AccountData]),
        (status = 500, description = "Store failure")
    ),
    tag = "Account"
)]
pub async fn list_accounts(State(state): State<Arc<AppState>>) -> ApiResult<Vec<AccountData>> {
    let accounts = state.accounts.find_all().await?;
    ok(accounts.into_iter().map(AccountData::from).collect())
}

/// Create an account
///
/// POST /api/accounts
#[utoipa::path(
    post,
    path = "/api/accounts",
    request_body = CreateAccountRequest,
    responses(
        (status = 201, description = "Account created", body = AccountData),
        (status = 400, description = "Negative or malformed balance")
    ),
    tag = "Account"
)]
pub async fn create_account(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateAccountRequest>,
) -> ApiResult<AccountData> {
    let balance = match req.balance.as_deref() {
        Some(s) => parse_decimal(s)?,
        None => Decimal::ZERO,
    };
    let account = state.accounts.create(balance).await?;
    created(account.into())
}

/// Get one account
///
/// GET /api/accounts/{id}
#[utoipa::path(
    get,
    path = "/api/accounts/{id}",
    params(("id" = i64, Path, description = "Account id")),
    responses(
        (status = 200, description = "Account", body = AccountData),
        (status = 404, description = "Account not found")
    ),
    tag = "Account"
)]
pub async fn get_account(
    State(state): State<Arc<AppState>>,
    Path(id): Path<AccountId>,
) -> ApiResult<AccountData> {
    ok(state.accounts.find_by_id(id).await?.into())
}

/// Delete an account; its transfer history is kept
///
/// DELETE /api/accounts/{id}
#[utoipa::path(
    delete,
    path = "/api/accounts/{id}",
    params(("id" = i64, Path, description = "Account id")),
    responses(
        (status = 200, description = "Account deleted"),
        (status = 404, description = "Account not found"),
        (status = 503, description = "Account busy, retry")
    ),
    tag = "Account"
)]
pub async fn delete_account(
    State(state): State<Arc<AppState>>,
    Path(id): Path<AccountId>,
) -> ApiResult<AccountId> {
    state.accounts.delete(id).await?;
    ok(id)
}

/// Transfers where the account is source or destination
///
/// GET /api/accounts/{id}/transfers
#[utoipa::path(
    get,
    path = "/api/accounts/{id}/transfers",
    params(("id" = i64, Path, description = "Account id (may be deleted)")),
    responses(
        (status = 200, description = "Transfers, oldest first", body = [TransferData])
    ),
    tag = "Transfer"
)]
pub async fn list_account_transfers(
    State(state): State<Arc<AppState>>,
    Path(id): Path<AccountId>,
) -> ApiResult<Vec<TransferData>> {
    let transfers = state.transfers.list_by_account(id).await?;
    ok(transfers.into_iter().map(TransferData::from).collect())
}

/// Credit an account
///
/// POST /api/accounts/{id}/deposit
#[utoipa::path(
    post,
    path = "/api/accounts/{id}/deposit",
    params(("id" = i64, Path, description = "Account id")),
    request_body = AmountRequest,
    responses(
        (status = 200, description = "Updated account", body = AccountData),
        (status = 400, description = "Invalid amount"),
        (status = 404, description = "Account not found"),
        (status = 503, description = "Account busy, retry")
    ),
    tag = "Account"
)]
pub async fn deposit(
    State(state): State<Arc<AppState>>,
    Path(id): Path<AccountId>,
    Json(req): Json<AmountRequest>,
) -> ApiResult<AccountData> {
    let amount = parse_decimal(&req.amount)?;
    ok(state.accounts.credit(id, amount).await?.into())
}

/// Debit an account
///
/// POST /api/accounts/{id}/withdraw
#[utoipa::path(
    post,
    path = "/api/accounts/{id}/withdraw",
    params(("id" = i64, Path, description = "Account id")),
    request_body = AmountRequest,
    responses(
        (status = 200, description = "Updated account", body = AccountData),
        (status = 400, description = "Invalid amount or insufficient funds"),
        (status = 404, description = "Account not found"),
        (status = 503, description = "Account busy, retry")
    ),
    tag = "Account"
)]
pub async fn withdraw(
    State(state): State<Arc<AppState>>,
    Path(id): Path<AccountId>,
    Json(req): Json<AmountRequest>,
) -> ApiResult<AccountData> {
    let amount = parse_decimal(&req.amount)?;
    ok(state.accounts.debit(id, amount).await?.into())
}
