use crate::domain::clock;
use crate::domain::errors::{ServiceError, ServiceResult};
use crate::domain::shop::{NewPurchase, PurchaseResponse};
use crate::domain::validation::FieldErrors;
use crate::infrastructure::persistence::repositories::{members, products, purchases};
use crate::infrastructure::persistence::begin_write;
use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::{info, warn};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRequest {
    pub member_id: Option<i64>,
    pub product_id: Option<i64>,
    pub quantity: Option<i64>,
}

pub struct PurchaseService {
    pool: SqlitePool,
}

impl PurchaseService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list_purchases(&self) -> ServiceResult<Vec<PurchaseResponse>> {
        let mut conn = self.pool.acquire().await?;
        purchases::find_all(&mut *conn).await
    }

    pub async fn get_purchase(&self, id: i64) -> ServiceResult<PurchaseResponse> {
        let mut conn = self.pool.acquire().await?;
        purchases::find_by_id(&mut *conn, id)
            .await?
            .ok_or_else(|| ServiceError::not_found(format!("Purchase not found: {}", id)))
    }

    pub async fn member_purchases(&self, member_id: i64) -> ServiceResult<Vec<PurchaseResponse>> {
        let mut conn = self.pool.acquire().await?;
        purchases::find_by_member(&mut *conn, member_id).await
    }

    pub async fn product_purchases(&self, product_id: i64) -> ServiceResult<Vec<PurchaseResponse>> {
        let mut conn = self.pool.acquire().await?;
        purchases::find_by_product(&mut *conn, product_id).await
    }

    /// Records the purchase and takes the quantity out of stock atomically.
    pub async fn create_purchase(&self, request: PurchaseRequest) -> ServiceResult<PurchaseResponse> {
        let mut errors = FieldErrors::new();
        errors
            .required("memberId", request.member_id.as_ref(), "member id is required")
            .min_i64("memberId", request.member_id, 1, "member id must be 1 or greater")
            .required("productId", request.product_id.as_ref(), "product id is required")
            .min_i64("productId", request.product_id, 1, "product id must be 1 or greater")
            .required("quantity", request.quantity.as_ref(), "quantity is required")
            .min_i64("quantity", request.quantity, 1, "quantity must be 1 or greater");
        errors.finish()?;
        let member_id = request.member_id.unwrap_or_default();
        let product_id = request.product_id.unwrap_or_default();
        let quantity = request.quantity.unwrap_or_default();

        let mut tx = begin_write(&self.pool).await?;
        if members::find_by_id(&mut *tx, member_id).await?.is_none() {
            return Err(ServiceError::not_found(format!("Member not found: {}", member_id)));
        }
        let mut product = products::find_by_id(&mut *tx, product_id)
            .await?
            .ok_or_else(|| ServiceError::not_found(format!("Product not found: {}", product_id)))?;

        let total_price = match product.take_stock(quantity) {
            Ok(total) => total,
            Err(e) => {
                warn!("PurchaseService: product {} out of stock: {}", product_id, e);
                return Err(e);
            }
        };

        let now = clock::now();
        let id = purchases::insert(
            &mut *tx,
            &NewPurchase {
                member_id,
                product_id,
                quantity,
                total_price,
                purchased_at: now,
            },
        )
        .await?;
        product.updated_at = now;
        products::update(&mut *tx, &product).await?;

        let purchase = purchases::find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| ServiceError::Corrupt(format!("purchase {} vanished", id)))?;
        tx.commit().await?;

        info!(
            "PurchaseService: member {} bought {} x product {} for {}",
            member_id, quantity, product_id, purchase.total_price
        );
        Ok(purchase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::shop::{
        MemberRequest, MemberService, ProductRequest, ProductService,
    };
    use crate::domain::errors::ErrorCode;
    use crate::infrastructure::persistence::Database;
    use rust_decimal_macros::dec;

    struct Fixture {
        purchases: PurchaseService,
        products: ProductService,
        members: MemberService,
        member_id: i64,
        product_id: i64,
    }

    async fn fixture(stock: i64) -> Fixture {
        let db = Database::in_memory().await.unwrap();
        let members = MemberService::new(db.pool.clone());
        let products = ProductService::new(db.pool.clone());
        let member = members
            .create_member(MemberRequest {
                email: Some("hong@example.com".into()),
                name: Some("Hong".into()),
                password: Some("secret".into()),
                phone: None,
                address: None,
            })
            .await
            .unwrap();
        let product = products
            .create_product(ProductRequest {
                name: Some("Mouse".into()),
                description: Some("Wireless".into()),
                price: Some(dec!(25.50)),
                stock: Some(stock),
            })
            .await
            .unwrap();
        Fixture {
            purchases: PurchaseService::new(db.pool),
            products,
            members,
            member_id: member.id,
            product_id: product.id,
        }
    }

    fn order(f: &Fixture, quantity: i64) -> PurchaseRequest {
        PurchaseRequest {
            member_id: Some(f.member_id),
            product_id: Some(f.product_id),
            quantity: Some(quantity),
        }
    }

    #[tokio::test]
    async fn test_purchase_decrements_stock() {
        let f = fixture(5).await;
        let purchase = f.purchases.create_purchase(order(&f, 2)).await.unwrap();
        assert_eq!(purchase.total_price, dec!(51.00));
        assert_eq!(purchase.member_name, "Hong");
        assert_eq!(purchase.product_name, "Mouse");
        assert_eq!(f.products.get_product(f.product_id).await.unwrap().stock, 3);

        assert_eq!(f.purchases.member_purchases(f.member_id).await.unwrap().len(), 1);
        assert_eq!(f.purchases.product_purchases(f.product_id).await.unwrap().len(), 1);
        assert_eq!(f.purchases.get_purchase(purchase.id).await.unwrap().quantity, 2);

        let with_products = f.members.member_with_purchases(f.member_id).await.unwrap();
        assert_eq!(with_products.purchased_products.len(), 1);
        assert_eq!(with_products.purchased_products[0].description.as_deref(), Some("Wireless"));
    }

    #[tokio::test]
    async fn test_insufficient_stock_leaves_no_trace() {
        let f = fixture(1).await;
        let err = f.purchases.create_purchase(order(&f, 2)).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::InsufficientStock);
        assert_eq!(f.products.get_product(f.product_id).await.unwrap().stock, 1);
        assert!(f.purchases.list_purchases().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_member_or_product() {
        let f = fixture(1).await;
        let mut bad = order(&f, 1);
        bad.member_id = Some(999);
        let err = f.purchases.create_purchase(bad).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::DataNotFound);

        let mut bad = order(&f, 1);
        bad.product_id = Some(999);
        let err = f.purchases.create_purchase(bad).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::DataNotFound);
    }

    #[tokio::test]
    async fn test_purchase_history_blocks_deletes() {
        let f = fixture(3).await;
        f.purchases.create_purchase(order(&f, 1)).await.unwrap();

        let err = f.members.delete_member(f.member_id).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::DataInUse);
        let err = f.products.delete_product(f.product_id).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::DataInUse);
    }
}
