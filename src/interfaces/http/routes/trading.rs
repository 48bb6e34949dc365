//! `/trading/api`: users, listed stocks, trades, portfolios and analysis.

use axum::Router;
use axum::extract::State;
use axum::routing::{get, post};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::application::bootstrap::AppServices;
use crate::application::trading::{ListedStockRequest, TradeRequest, UserRequest};
use crate::domain::trading::analysis::{
    DailyTransaction, PortfolioProfitLoss, PositionDetail, TotalAsset, TradeStatistics,
};
use crate::domain::trading::{ListedStock, TransactionView, User};
use crate::domain::validation::require_id;
use crate::interfaces::http::envelope::Envelope;
use crate::interfaces::http::error::ApiResult;
use crate::interfaces::http::extract::{ApiJson, ApiPath, ApiQuery};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

pub fn router() -> Router<AppServices> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/{id}", get(get_user).put(update_user).delete(delete_user))
        .route("/stocks", get(list_stocks).post(create_stock))
        .route("/stocks/code/{code}", get(get_stock_by_code))
        .route("/stocks/{id}", get(get_stock).put(update_stock).delete(delete_stock))
        .route("/transactions/trade", post(execute_trade))
        .route("/transactions/user/{user_id}", get(user_transactions))
        .route(
            "/transactions/user/{user_id}/stock/{stock_id}",
            get(user_stock_transactions),
        )
        .route("/transactions/{id}", get(get_transaction))
        .route("/portfolios/user/{user_id}", get(user_portfolio))
        .route("/analysis/portfolio/profit-loss/{user_id}", get(profit_loss))
        .route("/analysis/transactions/detailed/{user_id}", get(detailed_transactions))
        .route("/analysis/portfolio/{user_id}/stock/{stock_id}", get(stock_position))
        .route("/analysis/asset/total/{user_id}", get(total_asset))
        .route("/analysis/return-rate/{user_id}", get(return_rate))
        .route("/analysis/statistics/{user_id}", get(statistics))
        .route("/analysis/daily-transactions/{user_id}", get(daily_transactions))
}

// Users

async fn list_users(State(app): State<AppServices>) -> ApiResult<Envelope<Vec<User>>> {
    Ok(Envelope::ok(app.users.list_users().await?))
}

async fn get_user(
    State(app): State<AppServices>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Envelope<User>> {
    let id = require_id("id", id)?;
    Ok(Envelope::ok(app.users.get_user(id).await?))
}

async fn create_user(
    State(app): State<AppServices>,
    ApiJson(request): ApiJson<UserRequest>,
) -> ApiResult<Envelope<User>> {
    Ok(Envelope::ok(app.users.create_user(request).await?))
}

async fn update_user(
    State(app): State<AppServices>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(request): ApiJson<UserRequest>,
) -> ApiResult<Envelope<User>> {
    let id = require_id("id", id)?;
    Ok(Envelope::ok(app.users.update_user(id, request).await?))
}

async fn delete_user(
    State(app): State<AppServices>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Envelope<()>> {
    let id = require_id("id", id)?;
    app.users.delete_user(id).await?;
    Ok(Envelope::done("User deleted"))
}

// Stocks

async fn list_stocks(State(app): State<AppServices>) -> ApiResult<Envelope<Vec<ListedStock>>> {
    Ok(Envelope::ok(app.listed_stocks.list_stocks().await?))
}

async fn get_stock(
    State(app): State<AppServices>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Envelope<ListedStock>> {
    let id = require_id("id", id)?;
    Ok(Envelope::ok(app.listed_stocks.get_stock(id).await?))
}

async fn get_stock_by_code(
    State(app): State<AppServices>,
    ApiPath(code): ApiPath<String>,
) -> ApiResult<Envelope<ListedStock>> {
    Ok(Envelope::ok(app.listed_stocks.get_stock_by_code(&code).await?))
}

async fn create_stock(
    State(app): State<AppServices>,
    ApiJson(request): ApiJson<ListedStockRequest>,
) -> ApiResult<Envelope<ListedStock>> {
    Ok(Envelope::ok(app.listed_stocks.create_stock(request).await?))
}

async fn update_stock(
    State(app): State<AppServices>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(request): ApiJson<ListedStockRequest>,
) -> ApiResult<Envelope<ListedStock>> {
    let id = require_id("id", id)?;
    Ok(Envelope::ok(app.listed_stocks.update_stock(id, request).await?))
}

async fn delete_stock(
    State(app): State<AppServices>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Envelope<()>> {
    let id = require_id("id", id)?;
    app.listed_stocks.delete_stock(id).await?;
    Ok(Envelope::done("Stock deleted"))
}

// Transactions

async fn execute_trade(
    State(app): State<AppServices>,
    ApiJson(request): ApiJson<TradeRequest>,
) -> ApiResult<Envelope<TransactionView>> {
    Ok(Envelope::ok(app.transactions.execute_trade(request).await?))
}

async fn user_transactions(
    State(app): State<AppServices>,
    ApiPath(user_id): ApiPath<i64>,
) -> ApiResult<Envelope<Vec<TransactionView>>> {
    let user_id = require_id("userId", user_id)?;
    Ok(Envelope::ok(app.transactions.user_transactions(user_id).await?))
}

async fn user_stock_transactions(
    State(app): State<AppServices>,
    ApiPath((user_id, stock_id)): ApiPath<(i64, i64)>,
) -> ApiResult<Envelope<Vec<TransactionView>>> {
    let user_id = require_id("userId", user_id)?;
    let stock_id = require_id("stockId", stock_id)?;
    let list = app
        .transactions
        .user_stock_transactions(user_id, stock_id)
        .await?;
    Ok(Envelope::ok(list))
}

async fn get_transaction(
    State(app): State<AppServices>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Envelope<TransactionView>> {
    let id = require_id("id", id)?;
    Ok(Envelope::ok(app.transactions.get_transaction(id).await?))
}

// Portfolio and analysis

async fn user_portfolio(
    State(app): State<AppServices>,
    ApiPath(user_id): ApiPath<i64>,
) -> ApiResult<Envelope<Vec<PositionDetail>>> {
    let user_id = require_id("userId", user_id)?;
    Ok(Envelope::ok(app.analysis.user_portfolio(user_id).await?))
}

async fn profit_loss(
    State(app): State<AppServices>,
    ApiPath(user_id): ApiPath<i64>,
) -> ApiResult<Envelope<Vec<PortfolioProfitLoss>>> {
    let user_id = require_id("userId", user_id)?;
    Ok(Envelope::ok(app.analysis.portfolio_profit_loss(user_id).await?))
}

async fn detailed_transactions(
    State(app): State<AppServices>,
    ApiPath(user_id): ApiPath<i64>,
) -> ApiResult<Envelope<Vec<TransactionView>>> {
    let user_id = require_id("userId", user_id)?;
    Ok(Envelope::ok(app.analysis.detailed_transactions(user_id).await?))
}

async fn stock_position(
    State(app): State<AppServices>,
    ApiPath((user_id, stock_id)): ApiPath<(i64, i64)>,
) -> ApiResult<Envelope<PositionDetail>> {
    let user_id = require_id("userId", user_id)?;
    let stock_id = require_id("stockId", stock_id)?;
    Ok(Envelope::ok(app.analysis.stock_position(user_id, stock_id).await?))
}

async fn total_asset(
    State(app): State<AppServices>,
    ApiPath(user_id): ApiPath<i64>,
) -> ApiResult<Envelope<TotalAsset>> {
    let user_id = require_id("userId", user_id)?;
    Ok(Envelope::ok(app.analysis.total_asset(user_id).await?))
}

async fn return_rate(
    State(app): State<AppServices>,
    ApiPath(user_id): ApiPath<i64>,
) -> ApiResult<Envelope<f64>> {
    let user_id = require_id("userId", user_id)?;
    Ok(Envelope::ok(app.analysis.total_return_rate(user_id).await?))
}

async fn statistics(
    State(app): State<AppServices>,
    ApiPath(user_id): ApiPath<i64>,
) -> ApiResult<Envelope<TradeStatistics>> {
    let user_id = require_id("userId", user_id)?;
    Ok(Envelope::ok(app.analysis.trade_statistics(user_id).await?))
}

async fn daily_transactions(
    State(app): State<AppServices>,
    ApiPath(user_id): ApiPath<i64>,
    ApiQuery(range): ApiQuery<DateRange>,
) -> ApiResult<Envelope<Vec<DailyTransaction>>> {
    let user_id = require_id("userId", user_id)?;
    let days = app
        .analysis
        .daily_transactions(user_id, range.start_date, range.end_date)
        .await?;
    Ok(Envelope::ok(days))
}
