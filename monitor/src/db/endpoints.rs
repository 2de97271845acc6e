//! インターフェースエンドポイントデータベース操作

use app_monitor_common::types::{Direction, InterfaceEndpoint};
use chrono::Utc;
use sqlx::SqlitePool;

/// interface_endpoints行のマッピング
#[derive(sqlx::FromRow)]
struct EndpointRow {
    id: i64,
    interface_id: i64,
    direction: String,
    connectivity_url: String,
    transaction_count_url: String,
    error_count_url: String,
    is_active: bool,
    created_at: String,
}

impl From<EndpointRow> for InterfaceEndpoint {
    fn from(row: EndpointRow) -> Self {
        Self {
            id: row.id,
            interface_id: row.interface_id,
            // CHECK制約で方向は保証されるが、念のため既定はINBOUND
            direction: row.direction.parse().unwrap_or(Direction::Inbound),
            connectivity_url: row.connectivity_url,
            transaction_count_url: row.transaction_count_url,
            error_count_url: row.error_count_url,
            is_active: row.is_active,
            created_at: super::parse_timestamp(&row.created_at),
        }
    }
}

/// エンドポイントを登録または更新（方向ごとに1件）
pub async fn upsert_endpoint(
    pool: &SqlitePool,
    interface_id: i64,
    direction: Direction,
    connectivity_url: &str,
    transaction_count_url: &str,
    error_count_url: &str,
) -> Result<InterfaceEndpoint, sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO interface_endpoints (
            interface_id, direction, connectivity_url,
            transaction_count_url, error_count_url, is_active, created_at
        ) VALUES (?, ?, ?, ?, ?, 1, ?)
        ON CONFLICT (interface_id, direction) DO UPDATE SET
            connectivity_url = excluded.connectivity_url,
            transaction_count_url = excluded.transaction_count_url,
            error_count_url = excluded.error_count_url,
            is_active = 1
        "#,
    )
    .bind(interface_id)
    .bind(direction.as_str())
    .bind(connectivity_url)
    .bind(transaction_count_url)
    .bind(error_count_url)
    .bind(Utc::now().to_rfc3339())
    .execute(pool)
    .await?;

    let row = sqlx::query_as::<_, EndpointRow>(
        r#"
        SELECT id, interface_id, direction, connectivity_url,
               transaction_count_url, error_count_url, is_active, created_at
        FROM interface_endpoints
        WHERE interface_id = ? AND direction = ?
        "#,
    )
    .bind(interface_id)
    .bind(direction.as_str())
    .fetch_one(pool)
    .await?;

    Ok(row.into())
}

/// インターフェース配下のエンドポイント一覧を取得（非アクティブ含む）
pub async fn list_endpoints(
    pool: &SqlitePool,
    interface_id: i64,
) -> Result<Vec<InterfaceEndpoint>, sqlx::Error> {
    let rows = sqlx::query_as::<_, EndpointRow>(
        r#"
        SELECT id, interface_id, direction, connectivity_url,
               transaction_count_url, error_count_url, is_active, created_at
        FROM interface_endpoints
        WHERE interface_id = ?
        ORDER BY direction
        "#,
    )
    .bind(interface_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(|r| r.into()).collect())
}

/// インターフェース配下のアクティブなエンドポイント一覧を取得
///
/// 方向ごとに最大1件なので結果は0〜2件。
pub async fn list_active_endpoints(
    pool: &SqlitePool,
    interface_id: i64,
) -> Result<Vec<InterfaceEndpoint>, sqlx::Error> {
    let rows = sqlx::query_as::<_, EndpointRow>(
        r#"
        SELECT id, interface_id, direction, connectivity_url,
               transaction_count_url, error_count_url, is_active, created_at
        FROM interface_endpoints
        WHERE interface_id = ? AND is_active = 1
        ORDER BY direction
        "#,
    )
    .bind(interface_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(|r| r.into()).collect())
}

/// エンドポイントの監視対象フラグを更新
pub async fn set_endpoint_active(
    pool: &SqlitePool,
    id: i64,
    active: bool,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE interface_endpoints SET is_active = ? WHERE id = ?")
        .bind(active)
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
