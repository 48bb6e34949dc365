use crate::domain::clock;
use crate::domain::errors::{ServiceError, ServiceResult};
use crate::domain::shop::Product;
use crate::domain::validation::FieldErrors;
use crate::infrastructure::persistence::repositories::products;
use crate::infrastructure::persistence::begin_write;
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::{info, warn};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<i64>,
}

impl ProductRequest {
    fn validate(&self) -> ServiceResult<()> {
        let mut errors = FieldErrors::new();
        errors
            .not_blank("name", self.name.as_deref(), "product name is required")
            .required("price", self.price.as_ref(), "price is required")
            .positive_decimal("price", self.price, "price must be greater than 0")
            .required("stock", self.stock.as_ref(), "stock is required")
            .min_i64("stock", self.stock, 0, "stock must be 0 or greater");
        errors.finish()
    }
}

pub struct ProductService {
    pool: SqlitePool,
}

impl ProductService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list_products(&self) -> ServiceResult<Vec<Product>> {
        let mut conn = self.pool.acquire().await?;
        products::find_all(&mut *conn).await
    }

    pub async fn get_product(&self, id: i64) -> ServiceResult<Product> {
        let mut conn = self.pool.acquire().await?;
        products::find_by_id(&mut *conn, id)
            .await?
            .ok_or_else(|| ServiceError::not_found(format!("Product not found: {}", id)))
    }

    pub async fn create_product(&self, request: ProductRequest) -> ServiceResult<Product> {
        request.validate()?;

        let now = clock::now();
        let product = Product {
            id: 0,
            name: request.name.unwrap_or_default(),
            description: request.description,
            price: request.price.unwrap_or_default(),
            stock: request.stock.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };

        let mut tx = begin_write(&self.pool).await?;
        let product = products::insert(&mut *tx, &product).await?;
        tx.commit().await?;

        info!("ProductService: created product {} ({})", product.name, product.id);
        Ok(product)
    }

    pub async fn update_product(&self, id: i64, request: ProductRequest) -> ServiceResult<Product> {
        request.validate()?;

        let mut tx = begin_write(&self.pool).await?;
        let mut product = products::find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| ServiceError::not_found(format!("Product not found: {}", id)))?;

        product.name = request.name.unwrap_or_default();
        product.description = request.description;
        product.price = request.price.unwrap_or_default();
        product.stock = request.stock.unwrap_or_default();
        product.updated_at = clock::now();
        products::update(&mut *tx, &product).await?;
        tx.commit().await?;

        info!("ProductService: updated product {}", product.id);
        Ok(product)
    }

    /// Products that were ever purchased cannot be removed.
    pub async fn delete_product(&self, id: i64) -> ServiceResult<()> {
        let mut tx = begin_write(&self.pool).await?;
        if products::find_by_id(&mut *tx, id).await?.is_none() {
            return Err(ServiceError::not_found(format!("Product not found: {}", id)));
        }
        if products::has_purchases(&mut *tx, id).await? {
            warn!("ProductService: product {} has purchases", id);
            return Err(ServiceError::InUse(format!("Product has purchase history: {}", id)));
        }
        products::delete(&mut *tx, id).await?;
        tx.commit().await?;

        info!("ProductService: deleted product {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::ErrorCode;
    use crate::infrastructure::persistence::Database;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_product_crud() {
        let db = Database::in_memory().await.unwrap();
        let service = ProductService::new(db.pool);

        let created = service
            .create_product(ProductRequest {
                name: Some("Keyboard".into()),
                description: Some("Mechanical".into()),
                price: Some(dec!(89.90)),
                stock: Some(3),
            })
            .await
            .unwrap();
        assert_eq!(service.get_product(created.id).await.unwrap(), created);

        let updated = service
            .update_product(
                created.id,
                ProductRequest {
                    name: Some("Keyboard".into()),
                    description: None,
                    price: Some(dec!(79.90)),
                    stock: Some(0),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.price, dec!(79.90));
        assert_eq!(updated.description, None);

        service.delete_product(created.id).await.unwrap();
        assert!(service.list_products().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_product_validation() {
        let db = Database::in_memory().await.unwrap();
        let service = ProductService::new(db.pool);
        let err = service
            .create_product(ProductRequest {
                name: None,
                description: None,
                price: Some(dec!(0)),
                stock: Some(-1),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidParameter);
        assert_eq!(
            err.to_string(),
            "name: product name is required, price: price must be greater than 0, stock: stock must be 0 or greater"
        );
    }
}
