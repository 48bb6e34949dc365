use crate::domain::errors::{ServiceError, ServiceResult};
use crate::domain::game::GameStock;
use crate::domain::pagination::{PageRequest, PagedList};
use crate::domain::validation::FieldErrors;
use crate::infrastructure::persistence::repositories::game_stocks;
use crate::infrastructure::persistence::begin_write;
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::{info, warn};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStockRequest {
    pub stock_name: Option<String>,
    pub stock_price: Option<Decimal>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStockRequest {
    pub id: Option<i64>,
    pub stock_name: Option<String>,
    pub stock_price: Option<Decimal>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeleteStockRequest {
    pub id: Option<i64>,
}

pub struct StockService {
    pool: SqlitePool,
    page_max_count: i64,
}

impl StockService {
    pub fn new(pool: SqlitePool, page_max_count: i64) -> Self {
        Self { pool, page_max_count }
    }

    pub async fn list_stocks(&self, offset: i64, count: i64) -> ServiceResult<PagedList<GameStock>> {
        let page = PageRequest::new(offset, count, self.page_max_count)?;
        let mut conn = self.pool.acquire().await?;
        let total = game_stocks::count(&mut *conn).await?;
        let list = game_stocks::find_page(&mut *conn, page).await?;
        Ok(PagedList::new(page, total, list))
    }

    pub async fn get_stock(&self, id: i64) -> ServiceResult<GameStock> {
        let mut conn = self.pool.acquire().await?;
        game_stocks::find_by_id(&mut *conn, id)
            .await?
            .ok_or_else(|| ServiceError::not_found(format!("Stock ID: {}", id)))
    }

    pub async fn create_stock(&self, request: CreateStockRequest) -> ServiceResult<GameStock> {
        let (name, price) = validate(request.stock_name.as_deref(), request.stock_price)?;

        let mut tx = begin_write(&self.pool).await?;
        if game_stocks::name_taken(&mut *tx, &name, None).await? {
            warn!("StockService: duplicate stock name {}", name);
            return Err(ServiceError::Duplicated(format!("Stock Name: {}", name)));
        }
        let stock = game_stocks::insert(&mut *tx, &GameStock::new(&name, price)?).await?;
        tx.commit().await?;

        info!("StockService: created stock {} ({}) at {}", stock.stock_name, stock.id, stock.stock_price);
        Ok(stock)
    }

    pub async fn update_stock(&self, request: UpdateStockRequest) -> ServiceResult<GameStock> {
        let id = request
            .id
            .ok_or_else(|| ServiceError::invalid("id", "stock id is required"))?;
        let (name, price) = validate(request.stock_name.as_deref(), request.stock_price)?;

        let mut tx = begin_write(&self.pool).await?;
        let mut stock = game_stocks::find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| ServiceError::not_found(format!("Stock ID: {}", id)))?;
        if game_stocks::name_taken(&mut *tx, &name, Some(id)).await? {
            return Err(ServiceError::Duplicated(format!("Stock Name: {}", name)));
        }

        stock.update_stock_name(&name)?;
        stock.update_stock_price(price)?;
        game_stocks::update(&mut *tx, &stock).await?;
        tx.commit().await?;

        info!("StockService: updated stock {}", stock.id);
        Ok(stock)
    }

    /// Held positions in the stock are removed with it.
    pub async fn delete_stock(&self, request: DeleteStockRequest) -> ServiceResult<()> {
        let id = request
            .id
            .ok_or_else(|| ServiceError::invalid("id", "stock id is required"))?;

        let mut tx = begin_write(&self.pool).await?;
        if !game_stocks::delete(&mut *tx, id).await? {
            return Err(ServiceError::not_found(format!("Stock ID: {}", id)));
        }
        tx.commit().await?;

        info!("StockService: deleted stock {}", id);
        Ok(())
    }
}

fn validate(name: Option<&str>, price: Option<Decimal>) -> ServiceResult<(String, Decimal)> {
    let mut errors = FieldErrors::new();
    errors
        .not_blank("stockName", name, "stock name is required")
        .required("stockPrice", price.as_ref(), "stock price is required")
        .positive_decimal("stockPrice", price, "stock price must be greater than 0");
    errors.finish()?;
    Ok((name.unwrap_or_default().to_string(), price.unwrap_or_default()))
}
