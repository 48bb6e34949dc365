use super::map_unique;
use crate::domain::errors::ServiceResult;
use crate::domain::password::PasswordHash;
use crate::domain::shop::Member;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};

const COLUMNS: &str = "id, email, name, password_hash, phone, address, created_at, updated_at";

fn map_row(row: &SqliteRow) -> ServiceResult<Member> {
    Ok(Member {
        id: row.try_get("id")?,
        email: row.try_get("email")?,
        name: row.try_get("name")?,
        password: PasswordHash::from_stored(row.try_get("password_hash")?),
        phone: row.try_get("phone")?,
        address: row.try_get("address")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

pub async fn find_all(conn: &mut SqliteConnection) -> ServiceResult<Vec<Member>> {
    let rows = sqlx::query(&format!("SELECT {} FROM members ORDER BY id", COLUMNS))
        .fetch_all(&mut *conn)
        .await?;
    rows.iter().map(map_row).collect()
}

pub async fn find_by_id(conn: &mut SqliteConnection, id: i64) -> ServiceResult<Option<Member>> {
    let row = sqlx::query(&format!("SELECT {} FROM members WHERE id = ?", COLUMNS))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    row.as_ref().map(map_row).transpose()
}

pub async fn find_by_email(conn: &mut SqliteConnection, email: &str) -> ServiceResult<Option<Member>> {
    let row = sqlx::query(&format!("SELECT {} FROM members WHERE email = ?", COLUMNS))
        .bind(email)
        .fetch_optional(&mut *conn)
        .await?;
    row.as_ref().map(map_row).transpose()
}

pub async fn email_taken(
    conn: &mut SqliteConnection,
    email: &str,
    except_id: Option<i64>,
) -> ServiceResult<bool> {
    let row = sqlx::query("SELECT 1 FROM members WHERE email = ? AND id != ?")
        .bind(email)
        .bind(except_id.unwrap_or(0))
        .fetch_optional(&mut *conn)
        .await?;
    Ok(row.is_some())
}

pub async fn has_purchases(conn: &mut SqliteConnection, id: i64) -> ServiceResult<bool> {
    let row = sqlx::query("SELECT 1 FROM purchases WHERE member_id = ? LIMIT 1")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(row.is_some())
}

pub async fn insert(conn: &mut SqliteConnection, member: &Member) -> ServiceResult<Member> {
    let result = sqlx::query(
        r#"
        INSERT INTO members (email, name, password_hash, phone, address, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&member.email)
    .bind(&member.name)
    .bind(member.password.as_str())
    .bind(&member.phone)
    .bind(&member.address)
    .bind(member.created_at)
    .bind(member.updated_at)
    .execute(&mut *conn)
    .await
    .map_err(|e| map_unique(e, "Email already registered"))?;

    Ok(Member {
        id: result.last_insert_rowid(),
        ..member.clone()
    })
}

pub async fn update(conn: &mut SqliteConnection, member: &Member) -> ServiceResult<()> {
    sqlx::query(
        r#"
        UPDATE members
        SET email = ?, name = ?, password_hash = ?, phone = ?, address = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&member.email)
    .bind(&member.name)
    .bind(member.password.as_str())
    .bind(&member.phone)
    .bind(&member.address)
    .bind(member.updated_at)
    .bind(member.id)
    .execute(&mut *conn)
    .await
    .map_err(|e| map_unique(e, "Email already registered"))?;
    Ok(())
}

pub async fn delete(conn: &mut SqliteConnection, id: i64) -> ServiceResult<bool> {
    let result = sqlx::query("DELETE FROM members WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected() > 0)
}
