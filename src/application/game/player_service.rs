use crate::domain::errors::{ServiceError, ServiceResult};
use crate::domain::game::{Player, PlayerStock, PlayerStockList};
use crate::domain::pagination::{PageRequest, PagedList};
use crate::domain::ports::SessionStore;
use crate::domain::validation::FieldErrors;
use crate::infrastructure::persistence::repositories::{game_stocks, player_stocks, players};
use crate::infrastructure::persistence::begin_write;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::{info, warn};

/// Body of both `POST /players` and `POST /players/login`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerCredentials {
    pub player_id: Option<String>,
    pub player_password: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePlayerRequest {
    pub player_id: Option<String>,
    pub player_money: Option<Decimal>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletePlayerRequest {
    pub player_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockOrder {
    pub stock_id: Option<i64>,
    pub quantity: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerLogin {
    pub player_id: String,
    pub player_money: Decimal,
    pub access_token: String,
}

pub struct PlayerService {
    pool: SqlitePool,
    sessions: Arc<dyn SessionStore>,
    initial_money: Decimal,
    page_max_count: i64,
}

impl PlayerService {
    pub fn new(
        pool: SqlitePool,
        sessions: Arc<dyn SessionStore>,
        initial_money: Decimal,
        page_max_count: i64,
    ) -> Self {
        Self {
            pool,
            sessions,
            initial_money,
            page_max_count,
        }
    }

    pub async fn list_players(&self, offset: i64, count: i64) -> ServiceResult<PagedList<Player>> {
        let page = PageRequest::new(offset, count, self.page_max_count)?;
        let mut conn = self.pool.acquire().await?;
        let total = players::count(&mut *conn).await?;
        let list = players::find_page(&mut *conn, page).await?;
        Ok(PagedList::new(page, total, list))
    }

    /// Player with every held stock valued at the current price.
    pub async fn get_player(&self, player_id: &str) -> ServiceResult<PlayerStockList> {
        let mut conn = self.pool.acquire().await?;
        let player = players::find_by_id(&mut *conn, player_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Player not found"))?;
        let stocks = player_stocks::find_views_by_player(&mut *conn, player_id).await?;

        Ok(PlayerStockList {
            player_id: player.player_id,
            player_money: player.player_money,
            stocks,
        })
    }

    pub async fn create_player(&self, request: PlayerCredentials) -> ServiceResult<Player> {
        let mut errors = FieldErrors::new();
        errors
            .not_blank("playerId", request.player_id.as_deref(), "player id is required")
            .not_blank("playerPassword", request.player_password.as_deref(), "password is required")
            .length("playerId", request.player_id.as_deref(), 3, 20, "player id must be 3 to 20 characters")
            .length(
                "playerPassword",
                request.player_password.as_deref(),
                4,
                20,
                "password must be 4 to 20 characters",
            );
        errors.finish()?;
        let (player_id, password) = credentials(request)?;

        let mut tx = begin_write(&self.pool).await?;
        if players::exists(&mut *tx, &player_id).await? {
            warn!("PlayerService: duplicate player id {}", player_id);
            return Err(ServiceError::Duplicated(format!("PlayerId: {}", player_id)));
        }

        let player = Player::new(player_id, &password, self.initial_money)?;
        players::insert(&mut *tx, &player).await?;
        tx.commit().await?;

        info!("PlayerService: created player {}", player.player_id);
        Ok(player)
    }

    pub async fn login(&self, request: PlayerCredentials) -> ServiceResult<PlayerLogin> {
        let mut errors = FieldErrors::new();
        errors
            .not_blank("playerId", request.player_id.as_deref(), "player id is required")
            .not_blank("playerPassword", request.player_password.as_deref(), "password is required");
        errors.finish()?;
        let (player_id, password) = credentials(request)?;

        let player = {
            let mut conn = self.pool.acquire().await?;
            players::find_by_id(&mut *conn, &player_id)
                .await?
                .ok_or_else(|| ServiceError::not_found("Player not found"))?
        };

        if !player.password.verify(&password) {
            warn!("PlayerService: rejected login for {}", player_id);
            return Err(ServiceError::NotAuthenticated("Invalid password".to_string()));
        }

        let session = self.sessions.issue(&player.player_id).await;
        info!("PlayerService: {} logged in", player.player_id);

        Ok(PlayerLogin {
            player_id: player.player_id,
            player_money: player.player_money,
            access_token: session.token,
        })
    }

    pub async fn logout(&self, token: &str) -> ServiceResult<()> {
        if !self.sessions.revoke(token).await {
            return Err(ServiceError::NotAuthenticated("Session not found".to_string()));
        }
        Ok(())
    }

    /// Player owning a live access token.
    pub async fn authenticate(&self, token: Option<&str>) -> ServiceResult<String> {
        let token = token.ok_or_else(|| ServiceError::NotAuthenticated("Login required".to_string()))?;
        self.sessions
            .resolve(token)
            .await
            .ok_or_else(|| ServiceError::NotAuthenticated("Session expired or invalid".to_string()))
    }

    pub async fn update_player(&self, request: UpdatePlayerRequest) -> ServiceResult<Player> {
        let mut errors = FieldErrors::new();
        errors
            .not_blank("playerId", request.player_id.as_deref(), "player id is required")
            .required("playerMoney", request.player_money.as_ref(), "amount is required")
            .non_negative_decimal("playerMoney", request.player_money, "amount must be 0 or greater");
        errors.finish()?;
        let player_id = request.player_id.unwrap_or_default();
        let money = request.player_money.unwrap_or_default();

        let mut tx = begin_write(&self.pool).await?;
        let mut player = players::find_by_id(&mut *tx, &player_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Player not found"))?;
        player.update_money(money)?;
        players::update(&mut *tx, &player).await?;
        tx.commit().await?;

        info!("PlayerService: set money of {} to {}", player.player_id, player.player_money);
        Ok(player)
    }

    pub async fn delete_player(&self, request: DeletePlayerRequest) -> ServiceResult<()> {
        let mut errors = FieldErrors::new();
        errors.not_blank("playerId", request.player_id.as_deref(), "player id is required");
        errors.finish()?;
        let player_id = request.player_id.unwrap_or_default();

        let mut tx = begin_write(&self.pool).await?;
        if !players::delete(&mut *tx, &player_id).await? {
            return Err(ServiceError::not_found("Player not found"));
        }
        tx.commit().await?;

        let revoked = self.sessions.revoke_player(&player_id).await;
        info!("PlayerService: deleted player {} ({} sessions revoked)", player_id, revoked);
        Ok(())
    }

    /// Debit the player and add the shares to their holding.
    pub async fn buy(&self, player_id: &str, order: StockOrder) -> ServiceResult<()> {
        let (stock_id, quantity) = validate_order(&order)?;

        let mut tx = begin_write(&self.pool).await?;
        let mut player = players::find_by_id(&mut *tx, player_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Player not found"))?;
        let stock = game_stocks::find_by_id(&mut *tx, stock_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Stock not found"))?;

        let total = stock.total_price(quantity)?;
        if let Err(e) = player.subtract_money(total) {
            warn!("PlayerService: {} cannot buy {} x {}: {}", player_id, quantity, stock.stock_name, e);
            return Err(e);
        }
        players::update(&mut *tx, &player).await?;

        match player_stocks::find(&mut *tx, player_id, stock_id).await? {
            Some(mut holding) => {
                holding.add_quantity(quantity)?;
                player_stocks::update_quantity(&mut *tx, &holding).await?;
            }
            None => {
                let holding = PlayerStock::new(player_id.to_string(), stock_id, quantity)?;
                player_stocks::insert(&mut *tx, &holding).await?;
            }
        }
        tx.commit().await?;

        info!(
            "PlayerService: {} bought {} x {} for {}",
            player_id, quantity, stock.stock_name, total
        );
        Ok(())
    }

    /// Credit the player and reduce the holding, removing it when it reaches zero.
    pub async fn sell(&self, player_id: &str, order: StockOrder) -> ServiceResult<()> {
        let (stock_id, quantity) = validate_order(&order)?;

        let mut tx = begin_write(&self.pool).await?;
        let mut player = players::find_by_id(&mut *tx, player_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Player not found"))?;
        let stock = game_stocks::find_by_id(&mut *tx, stock_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Stock not found"))?;
        let mut holding = player_stocks::find(&mut *tx, player_id, stock_id)
            .await?
            .ok_or_else(|| ServiceError::InsufficientQuantity("Stock not owned".to_string()))?;

        holding.subtract_quantity(quantity)?;
        let total = stock.total_price(quantity)?;
        player.add_money(total)?;
        players::update(&mut *tx, &player).await?;

        if holding.is_closed() {
            player_stocks::delete(&mut *tx, holding.id).await?;
        } else {
            player_stocks::update_quantity(&mut *tx, &holding).await?;
        }
        tx.commit().await?;

        info!(
            "PlayerService: {} sold {} x {} for {}",
            player_id, quantity, stock.stock_name, total
        );
        Ok(())
    }
}

fn credentials(request: PlayerCredentials) -> ServiceResult<(String, String)> {
    match (request.player_id, request.player_password) {
        (Some(id), Some(password)) => Ok((id, password)),
        _ => Err(ServiceError::invalid("playerId", "player id and password are required")),
    }
}

fn validate_order(order: &StockOrder) -> ServiceResult<(i64, i64)> {
    let mut errors = FieldErrors::new();
    errors
        .required("stockId", order.stock_id.as_ref(), "stock id is required")
        .required("quantity", order.quantity.as_ref(), "quantity is required")
        .min_i64("quantity", order.quantity, 1, "quantity must be greater than 0");
    errors.finish()?;
    Ok((order.stock_id.unwrap_or_default(), order.quantity.unwrap_or_default()))
}
