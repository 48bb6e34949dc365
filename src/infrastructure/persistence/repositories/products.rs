use super::decimal_column;
use crate::domain::errors::ServiceResult;
use crate::domain::shop::Product;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};

const COLUMNS: &str = "id, name, description, price, stock, created_at, updated_at";

fn map_row(row: &SqliteRow) -> ServiceResult<Product> {
    Ok(Product {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        price: decimal_column(row, "price")?,
        stock: row.try_get("stock")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

pub async fn find_all(conn: &mut SqliteConnection) -> ServiceResult<Vec<Product>> {
    let rows = sqlx::query(&format!("SELECT {} FROM products ORDER BY id", COLUMNS))
        .fetch_all(&mut *conn)
        .await?;
    rows.iter().map(map_row).collect()
}

pub async fn find_by_id(conn: &mut SqliteConnection, id: i64) -> ServiceResult<Option<Product>> {
    let row = sqlx::query(&format!("SELECT {} FROM products WHERE id = ?", COLUMNS))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    row.as_ref().map(map_row).transpose()
}

pub async fn has_purchases(conn: &mut SqliteConnection, id: i64) -> ServiceResult<bool> {
    let row = sqlx::query("SELECT 1 FROM purchases WHERE product_id = ? LIMIT 1")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(row.is_some())
}

pub async fn insert(conn: &mut SqliteConnection, product: &Product) -> ServiceResult<Product> {
    let result = sqlx::query(
        r#"
        INSERT INTO products (name, description, price, stock, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&product.name)
    .bind(&product.description)
    .bind(product.price.to_string())
    .bind(product.stock)
    .bind(product.created_at)
    .bind(product.updated_at)
    .execute(&mut *conn)
    .await?;

    Ok(Product {
        id: result.last_insert_rowid(),
        ..product.clone()
    })
}

/// Writes every mutable column, stock included.
pub async fn update(conn: &mut SqliteConnection, product: &Product) -> ServiceResult<()> {
    sqlx::query(
        r#"
        UPDATE products
        SET name = ?, description = ?, price = ?, stock = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&product.name)
    .bind(&product.description)
    .bind(product.price.to_string())
    .bind(product.stock)
    .bind(product.updated_at)
    .bind(product.id)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub async fn delete(conn: &mut SqliteConnection, id: i64) -> ServiceResult<bool> {
    let result = sqlx::query("DELETE FROM products WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected() > 0)
}
