use super::decimal_column;
use crate::domain::errors::ServiceResult;
use crate::domain::shop::{NewPurchase, PurchaseResponse, PurchasedProduct};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};

const VIEW_SELECT: &str = r#"
    SELECT pu.id, pu.member_id, m.name AS member_name, pu.product_id, pr.name AS product_name,
           pu.quantity, pu.total_price, pu.purchased_at
    FROM purchases pu
    JOIN members m ON m.id = pu.member_id
    JOIN products pr ON pr.id = pu.product_id
"#;

fn map_view(row: &SqliteRow) -> ServiceResult<PurchaseResponse> {
    Ok(PurchaseResponse {
        id: row.try_get("id")?,
        member_id: row.try_get("member_id")?,
        member_name: row.try_get("member_name")?,
        product_id: row.try_get("product_id")?,
        product_name: row.try_get("product_name")?,
        quantity: row.try_get("quantity")?,
        total_price: decimal_column(row, "total_price")?,
        purchased_at: row.try_get("purchased_at")?,
    })
}

pub async fn insert(conn: &mut SqliteConnection, purchase: &NewPurchase) -> ServiceResult<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO purchases (member_id, product_id, quantity, total_price, purchased_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(purchase.member_id)
    .bind(purchase.product_id)
    .bind(purchase.quantity)
    .bind(purchase.total_price.to_string())
    .bind(purchase.purchased_at)
    .execute(&mut *conn)
    .await?;
    Ok(result.last_insert_rowid())
}

pub async fn find_all(conn: &mut SqliteConnection) -> ServiceResult<Vec<PurchaseResponse>> {
    let sql = format!("{} ORDER BY pu.id", VIEW_SELECT);
    let rows = sqlx::query(&sql).fetch_all(&mut *conn).await?;
    rows.iter().map(map_view).collect()
}

pub async fn find_by_id(conn: &mut SqliteConnection, id: i64) -> ServiceResult<Option<PurchaseResponse>> {
    let sql = format!("{} WHERE pu.id = ?", VIEW_SELECT);
    let row = sqlx::query(&sql).bind(id).fetch_optional(&mut *conn).await?;
    row.as_ref().map(map_view).transpose()
}

pub async fn find_by_member(conn: &mut SqliteConnection, member_id: i64) -> ServiceResult<Vec<PurchaseResponse>> {
    let sql = format!("{} WHERE pu.member_id = ? ORDER BY pu.id", VIEW_SELECT);
    let rows = sqlx::query(&sql).bind(member_id).fetch_all(&mut *conn).await?;
    rows.iter().map(map_view).collect()
}

pub async fn find_by_product(
    conn: &mut SqliteConnection,
    product_id: i64,
) -> ServiceResult<Vec<PurchaseResponse>> {
    let sql = format!("{} WHERE pu.product_id = ? ORDER BY pu.id", VIEW_SELECT);
    let rows = sqlx::query(&sql).bind(product_id).fetch_all(&mut *conn).await?;
    rows.iter().map(map_view).collect()
}

/// Products a member bought, oldest purchase first.
pub async fn purchased_products(
    conn: &mut SqliteConnection,
    member_id: i64,
) -> ServiceResult<Vec<PurchasedProduct>> {
    let rows = sqlx::query(
        r#"
        SELECT pu.product_id, pr.name AS product_name, pu.quantity, pr.description,
               pu.total_price, pu.purchased_at
        FROM purchases pu
        JOIN products pr ON pr.id = pu.product_id
        WHERE pu.member_id = ?
        ORDER BY pu.purchased_at, pu.id
        "#,
    )
    .bind(member_id)
    .fetch_all(&mut *conn)
    .await?;

    let mut products = Vec::with_capacity(rows.len());
    for row in &rows {
        products.push(PurchasedProduct {
            product_id: row.try_get("product_id")?,
            product_name: row.try_get("product_name")?,
            quantity: row.try_get("quantity")?,
            description: row.try_get("description")?,
            total_price: decimal_column(row, "total_price")?,
            purchased_at: row.try_get("purchased_at")?,
        });
    }
    Ok(products)
}
