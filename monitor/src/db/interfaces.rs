//! インターフェースデータベース操作

use app_monitor_common::types::Interface;
use chrono::Utc;
use sqlx::SqlitePool;

/// interfaces行のマッピング
#[derive(sqlx::FromRow)]
struct InterfaceRow {
    id: i64,
    source_app_id: i64,
    target_system_name: String,
    is_active: bool,
    created_at: String,
}

impl From<InterfaceRow> for Interface {
    fn from(row: InterfaceRow) -> Self {
        Self {
            id: row.id,
            source_app_id: row.source_app_id,
            target_system_name: row.target_system_name,
            is_active: row.is_active,
            created_at: super::parse_timestamp(&row.created_at),
        }
    }
}

/// インターフェースを登録
pub async fn create_interface(
    pool: &SqlitePool,
    source_app_id: i64,
    target_system_name: &str,
) -> Result<Interface, sqlx::Error> {
    let created_at = Utc::now();

    let result = sqlx::query(
        r#"
        INSERT INTO interfaces (source_app_id, target_system_name, is_active, created_at)
        VALUES (?, ?, 1, ?)
        "#,
    )
    .bind(source_app_id)
    .bind(target_system_name)
    .bind(created_at.to_rfc3339())
    .execute(pool)
    .await?;

    Ok(Interface {
        id: result.last_insert_rowid(),
        source_app_id,
        target_system_name: target_system_name.to_string(),
        is_active: true,
        created_at,
    })
}

/// アクティブなインターフェース一覧を取得（全アプリケーション横断）
pub async fn list_active_interfaces(pool: &SqlitePool) -> Result<Vec<Interface>, sqlx::Error> {
    let rows = sqlx::query_as::<_, InterfaceRow>(
        r#"
        SELECT id, source_app_id, target_system_name, is_active, created_at
        FROM interfaces
        WHERE is_active = 1
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(|r| r.into()).collect())
}

/// アプリケーション配下のインターフェース一覧を取得（非アクティブ含む）
pub async fn list_interfaces_for_app(
    pool: &SqlitePool,
    source_app_id: i64,
) -> Result<Vec<Interface>, sqlx::Error> {
    let rows = sqlx::query_as::<_, InterfaceRow>(
        r#"
        SELECT id, source_app_id, target_system_name, is_active, created_at
        FROM interfaces
        WHERE source_app_id = ?
        ORDER BY created_at DESC
        "#,
    )
    .bind(source_app_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(|r| r.into()).collect())
}

/// IDでインターフェースを取得
pub async fn get_interface(pool: &SqlitePool, id: i64) -> Result<Option<Interface>, sqlx::Error> {
    let row = sqlx::query_as::<_, InterfaceRow>(
        r#"
        SELECT id, source_app_id, target_system_name, is_active, created_at
        FROM interfaces
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| r.into()))
}

/// インターフェースの監視対象フラグを更新
pub async fn set_interface_active(
    pool: &SqlitePool,
    id: i64,
    active: bool,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE interfaces SET is_active = ? WHERE id = ?")
        .bind(active)
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
