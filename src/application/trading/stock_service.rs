use crate::domain::clock;
use crate::domain::errors::{ServiceError, ServiceResult};
use crate::domain::trading::ListedStock;
use crate::domain::validation::FieldErrors;
use crate::infrastructure::persistence::repositories::stocks;
use crate::infrastructure::persistence::begin_write;
use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::{info, warn};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListedStockRequest {
    pub code: Option<String>,
    pub name: Option<String>,
    pub current_price: Option<i64>,
    pub previous_price: Option<i64>,
}

struct ValidStock {
    code: String,
    name: String,
    current_price: i64,
    previous_price: i64,
}

impl ListedStockRequest {
    fn validate(&self) -> ServiceResult<ValidStock> {
        let mut errors = FieldErrors::new();
        errors
            .not_blank("code", self.code.as_deref(), "stock code is required")
            .not_blank("name", self.name.as_deref(), "stock name is required")
            .required("currentPrice", self.current_price.as_ref(), "current price is required")
            .min_i64("currentPrice", self.current_price, 1, "current price must be greater than 0")
            .min_i64("previousPrice", self.previous_price, 0, "previous price must be 0 or greater");
        errors.finish()?;
        Ok(ValidStock {
            code: self.code.clone().unwrap_or_default(),
            name: self.name.clone().unwrap_or_default(),
            current_price: self.current_price.unwrap_or_default(),
            previous_price: self.previous_price.unwrap_or(0),
        })
    }
}

pub struct ListedStockService {
    pool: SqlitePool,
}

impl ListedStockService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list_stocks(&self) -> ServiceResult<Vec<ListedStock>> {
        let mut conn = self.pool.acquire().await?;
        stocks::find_all(&mut *conn).await
    }

    pub async fn get_stock(&self, id: i64) -> ServiceResult<ListedStock> {
        let mut conn = self.pool.acquire().await?;
        stocks::find_by_id(&mut *conn, id)
            .await?
            .ok_or_else(|| ServiceError::not_found(format!("Stock not found: {}", id)))
    }

    pub async fn get_stock_by_code(&self, code: &str) -> ServiceResult<ListedStock> {
        let mut conn = self.pool.acquire().await?;
        stocks::find_by_code(&mut *conn, code)
            .await?
            .ok_or_else(|| ServiceError::not_found(format!("Stock not found for code: {}", code)))
    }

    pub async fn create_stock(&self, request: ListedStockRequest) -> ServiceResult<ListedStock> {
        let valid = request.validate()?;

        let mut tx = begin_write(&self.pool).await?;
        if stocks::code_exists(&mut *tx, &valid.code).await? {
            warn!("ListedStockService: duplicate code {}", valid.code);
            return Err(ServiceError::Duplicated(format!("Stock code already exists: {}", valid.code)));
        }

        let now = clock::now();
        let stock = ListedStock {
            id: 0,
            code: valid.code,
            name: valid.name,
            current_price: valid.current_price,
            previous_price: valid.previous_price,
            created_at: now,
            updated_at: now,
        };
        let stock = stocks::insert(&mut *tx, &stock).await?;
        tx.commit().await?;

        info!("ListedStockService: listed {} ({})", stock.code, stock.id);
        Ok(stock)
    }

    pub async fn update_stock(&self, id: i64, request: ListedStockRequest) -> ServiceResult<ListedStock> {
        let valid = request.validate()?;

        let mut tx = begin_write(&self.pool).await?;
        let mut stock = stocks::find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| ServiceError::not_found(format!("Stock not found: {}", id)))?;

        if stock.code != valid.code && stocks::code_exists(&mut *tx, &valid.code).await? {
            return Err(ServiceError::Duplicated(format!("Stock code already exists: {}", valid.code)));
        }

        stock.code = valid.code;
        stock.name = valid.name;
        stock.current_price = valid.current_price;
        stock.previous_price = valid.previous_price;
        stock.updated_at = clock::now();
        stocks::update(&mut *tx, &stock).await?;
        tx.commit().await?;

        info!("ListedStockService: updated {} ({})", stock.code, stock.id);
        Ok(stock)
    }

    /// Refuses while any position or transaction references the stock.
    pub async fn delete_stock(&self, id: i64) -> ServiceResult<()> {
        let mut tx = begin_write(&self.pool).await?;
        if stocks::find_by_id(&mut *tx, id).await?.is_none() {
            return Err(ServiceError::not_found(format!("Stock not found: {}", id)));
        }
        if stocks::is_referenced(&mut *tx, id).await? {
            warn!("ListedStockService: stock {} is still referenced", id);
            return Err(ServiceError::InUse(format!("Stock is in use: {}", id)));
        }
        stocks::delete(&mut *tx, id).await?;
        tx.commit().await?;

        info!("ListedStockService: deleted stock {}", id);
        Ok(())
    }
}
