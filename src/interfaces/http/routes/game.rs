//! `/game/api`: players, stocks and orders.

use axum::Router;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::routing::{get, post};
use serde::Deserialize;

use crate::application::bootstrap::AppServices;
use crate::application::game::{
    CreateStockRequest, DeletePlayerRequest, DeleteStockRequest, PlayerCredentials, PlayerLogin,
    StockOrder, UpdatePlayerRequest, UpdateStockRequest,
};
use crate::domain::errors::ServiceError;
use crate::domain::game::{GameStock, Player, PlayerStockList};
use crate::domain::pagination::PagedList;
use crate::domain::validation::require_id;
use crate::interfaces::http::envelope::Envelope;
use crate::interfaces::http::error::ApiResult;
use crate::interfaces::http::extract::{ApiJson, ApiPath, ApiQuery, bearer_token};

const DEFAULT_PAGE_COUNT: i64 = 10;

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub offset: Option<i64>,
    pub count: Option<i64>,
}

pub fn router() -> Router<AppServices> {
    Router::new()
        .route("/players/list", get(list_players))
        .route("/players/login", post(login))
        .route("/players/logout", post(logout))
        .route("/players/buy", post(buy))
        .route("/players/sell", post(sell))
        .route(
            "/players",
            post(create_player).put(update_player).delete(delete_player),
        )
        .route("/players/{player_id}", get(get_player))
        .route("/stocks/list", get(list_stocks))
        .route(
            "/stocks",
            post(create_stock).put(update_stock).delete(delete_stock),
        )
        .route("/stocks/{id}", get(get_stock))
}

async fn list_players(
    State(app): State<AppServices>,
    ApiQuery(page): ApiQuery<PageQuery>,
) -> ApiResult<Envelope<PagedList<Player>>> {
    let list = app
        .players
        .list_players(page.offset.unwrap_or(0), page.count.unwrap_or(DEFAULT_PAGE_COUNT))
        .await?;
    Ok(Envelope::ok(list))
}

async fn get_player(
    State(app): State<AppServices>,
    ApiPath(player_id): ApiPath<String>,
) -> ApiResult<Envelope<PlayerStockList>> {
    Ok(Envelope::ok(app.players.get_player(&player_id).await?))
}

async fn create_player(
    State(app): State<AppServices>,
    ApiJson(request): ApiJson<PlayerCredentials>,
) -> ApiResult<Envelope<Player>> {
    Ok(Envelope::ok(app.players.create_player(request).await?))
}

async fn login(
    State(app): State<AppServices>,
    ApiJson(request): ApiJson<PlayerCredentials>,
) -> ApiResult<Envelope<PlayerLogin>> {
    Ok(Envelope::ok(app.players.login(request).await?))
}

async fn logout(State(app): State<AppServices>, headers: HeaderMap) -> ApiResult<Envelope<()>> {
    let token = bearer_token(&headers)
        .ok_or_else(|| ServiceError::NotAuthenticated("Login required".to_string()))?;
    app.players.logout(token).await?;
    Ok(Envelope::done("Logged out"))
}

async fn update_player(
    State(app): State<AppServices>,
    ApiJson(request): ApiJson<UpdatePlayerRequest>,
) -> ApiResult<Envelope<Player>> {
    Ok(Envelope::ok(app.players.update_player(request).await?))
}

async fn delete_player(
    State(app): State<AppServices>,
    ApiJson(request): ApiJson<DeletePlayerRequest>,
) -> ApiResult<Envelope<()>> {
    app.players.delete_player(request).await?;
    Ok(Envelope::done("Player deleted"))
}

async fn buy(
    State(app): State<AppServices>,
    headers: HeaderMap,
    ApiJson(order): ApiJson<StockOrder>,
) -> ApiResult<Envelope<()>> {
    let player_id = app.players.authenticate(bearer_token(&headers)).await?;
    app.players.buy(&player_id, order).await?;
    Ok(Envelope::done("Stock purchased"))
}

async fn sell(
    State(app): State<AppServices>,
    headers: HeaderMap,
    ApiJson(order): ApiJson<StockOrder>,
) -> ApiResult<Envelope<()>> {
    let player_id = app.players.authenticate(bearer_token(&headers)).await?;
    app.players.sell(&player_id, order).await?;
    Ok(Envelope::done("Stock sold"))
}

async fn list_stocks(
    State(app): State<AppServices>,
    ApiQuery(page): ApiQuery<PageQuery>,
) -> ApiResult<Envelope<PagedList<GameStock>>> {
    let list = app
        .game_stocks
        .list_stocks(page.offset.unwrap_or(0), page.count.unwrap_or(DEFAULT_PAGE_COUNT))
        .await?;
    Ok(Envelope::ok(list))
}

async fn get_stock(
    State(app): State<AppServices>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Envelope<GameStock>> {
    let id = require_id("id", id)?;
    Ok(Envelope::ok(app.game_stocks.get_stock(id).await?))
}

async fn create_stock(
    State(app): State<AppServices>,
    ApiJson(request): ApiJson<CreateStockRequest>,
) -> ApiResult<Envelope<GameStock>> {
    Ok(Envelope::ok(app.game_stocks.create_stock(request).await?))
}

async fn update_stock(
    State(app): State<AppServices>,
    ApiJson(request): ApiJson<UpdateStockRequest>,
) -> ApiResult<Envelope<GameStock>> {
    Ok(Envelope::ok(app.game_stocks.update_stock(request).await?))
}

async fn delete_stock(
    State(app): State<AppServices>,
    ApiJson(request): ApiJson<DeleteStockRequest>,
) -> ApiResult<Envelope<()>> {
    app.game_stocks.delete_stock(request).await?;
    Ok(Envelope::done("Stock deleted"))
}
