use super::{decimal_column, map_unique};
use crate::domain::errors::ServiceResult;
use crate::domain::game::Player;
use crate::domain::pagination::PageRequest;
use crate::domain::password::PasswordHash;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};

fn map_row(row: &SqliteRow) -> ServiceResult<Player> {
    Ok(Player {
        player_id: row.try_get("player_id")?,
        password: PasswordHash::from_stored(row.try_get("password_hash")?),
        player_money: decimal_column(row, "player_money")?,
    })
}

pub async fn find_by_id(conn: &mut SqliteConnection, player_id: &str) -> ServiceResult<Option<Player>> {
    let row = sqlx::query("SELECT player_id, password_hash, player_money FROM players WHERE player_id = ?")
        .bind(player_id)
        .fetch_optional(&mut *conn)
        .await?;

    row.as_ref().map(map_row).transpose()
}

pub async fn exists(conn: &mut SqliteConnection, player_id: &str) -> ServiceResult<bool> {
    let row = sqlx::query("SELECT 1 FROM players WHERE player_id = ?")
        .bind(player_id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(row.is_some())
}

pub async fn count(conn: &mut SqliteConnection) -> ServiceResult<i64> {
    let row = sqlx::query("SELECT COUNT(*) AS total FROM players")
        .fetch_one(&mut *conn)
        .await?;
    Ok(row.try_get("total")?)
}

/// One page of players ordered by id.
pub async fn find_page(conn: &mut SqliteConnection, page: PageRequest) -> ServiceResult<Vec<Player>> {
    let rows = sqlx::query(
        "SELECT player_id, password_hash, player_money FROM players ORDER BY player_id LIMIT ? OFFSET ?",
    )
    .bind(page.count)
    .bind(page.skip())
    .fetch_all(&mut *conn)
    .await?;

    rows.iter().map(map_row).collect()
}

pub async fn insert(conn: &mut SqliteConnection, player: &Player) -> ServiceResult<()> {
    sqlx::query("INSERT INTO players (player_id, password_hash, player_money) VALUES (?, ?, ?)")
        .bind(&player.player_id)
        .bind(player.password.as_str())
        .bind(player.player_money.to_string())
        .execute(&mut *conn)
        .await
        .map_err(|e| map_unique(e, "Player id already exists"))?;
    Ok(())
}

pub async fn update(conn: &mut SqliteConnection, player: &Player) -> ServiceResult<()> {
    sqlx::query("UPDATE players SET password_hash = ?, player_money = ? WHERE player_id = ?")
        .bind(player.password.as_str())
        .bind(player.player_money.to_string())
        .bind(&player.player_id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

/// Holdings go with the player through the foreign key cascade.
pub async fn delete(conn: &mut SqliteConnection, player_id: &str) -> ServiceResult<bool> {
    let result = sqlx::query("DELETE FROM players WHERE player_id = ?")
        .bind(player_id)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected() > 0)
}
