//! アプリケーションデータベース操作

use app_monitor_common::types::Application;
use chrono::Utc;
use sqlx::SqlitePool;

/// applications行のマッピング
#[derive(sqlx::FromRow)]
struct ApplicationRow {
    id: i64,
    name: String,
    environment: String,
    app_health_url: String,
    active_users_url: String,
    is_active: bool,
    created_at: String,
}

impl From<ApplicationRow> for Application {
    fn from(row: ApplicationRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            environment: row.environment,
            app_health_url: row.app_health_url,
            active_users_url: row.active_users_url,
            is_active: row.is_active,
            created_at: super::parse_timestamp(&row.created_at),
        }
    }
}

/// アプリケーションを登録
pub async fn create_application(
    pool: &SqlitePool,
    name: &str,
    environment: &str,
    app_health_url: &str,
    active_users_url: &str,
) -> Result<Application, sqlx::Error> {
    let created_at = Utc::now();

    let result = sqlx::query(
        r#"
        INSERT INTO applications (
            name, environment, app_health_url, active_users_url,
            is_active, created_at
        ) VALUES (?, ?, ?, ?, 1, ?)
        "#,
    )
    .bind(name)
    .bind(environment)
    .bind(app_health_url)
    .bind(active_users_url)
    .bind(created_at.to_rfc3339())
    .execute(pool)
    .await?;

    Ok(Application {
        id: result.last_insert_rowid(),
        name: name.to_string(),
        environment: environment.to_string(),
        app_health_url: app_health_url.to_string(),
        active_users_url: active_users_url.to_string(),
        is_active: true,
        created_at,
    })
}

/// アプリケーション一覧を取得（非アクティブ含む）
pub async fn list_applications(pool: &SqlitePool) -> Result<Vec<Application>, sqlx::Error> {
    let rows = sqlx::query_as::<_, ApplicationRow>(
        r#"
        SELECT id, name, environment, app_health_url, active_users_url,
               is_active, created_at
        FROM applications
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(|r| r.into()).collect())
}

/// アクティブなアプリケーション一覧を取得
pub async fn list_active_applications(pool: &SqlitePool) -> Result<Vec<Application>, sqlx::Error> {
    let rows = sqlx::query_as::<_, ApplicationRow>(
        r#"
        SELECT id, name, environment, app_health_url, active_users_url,
               is_active, created_at
        FROM applications
        WHERE is_active = 1
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(|r| r.into()).collect())
}

/// IDでアプリケーションを取得
pub async fn get_application(
    pool: &SqlitePool,
    id: i64,
) -> Result<Option<Application>, sqlx::Error> {
    let row = sqlx::query_as::<_, ApplicationRow>(
        r#"
        SELECT id, name, environment, app_health_url, active_users_url,
               is_active, created_at
        FROM applications
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| r.into()))
}

/// アプリケーションを更新
pub async fn update_application(
    pool: &SqlitePool,
    id: i64,
    name: &str,
    environment: &str,
    app_health_url: &str,
    active_users_url: &str,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE applications SET
            name = ?, environment = ?, app_health_url = ?, active_users_url = ?
        WHERE id = ?
        "#,
    )
    .bind(name)
    .bind(environment)
    .bind(app_health_url)
    .bind(active_users_url)
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// アプリケーションの監視対象フラグを更新
pub async fn set_application_active(
    pool: &SqlitePool,
    id: i64,
    active: bool,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE applications SET is_active = ? WHERE id = ?")
        .bind(active)
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn setup_test_db() -> SqlitePool {
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            // インメモリDBは接続ごとに独立するため、単一接続に固定する
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to create test database");
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run migrations");
        pool
    }

    #[tokio::test]
    async fn test_create_and_get_application() {
        let pool = setup_test_db().await;

        let app = create_application(
            &pool,
            "ERP",
            "production",
            "http://erp.local/health",
            "http://erp.local/users",
        )
        .await
        .unwrap();

        let fetched = get_application(&pool, app.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "ERP");
        assert!(fetched.is_active);
    }

    #[tokio::test]
    async fn test_list_active_excludes_deactivated() {
        let pool = setup_test_db().await;

        let app = create_application(&pool, "A", "dev", "http://a/h", "http://a/u")
            .await
            .unwrap();
        create_application(&pool, "B", "dev", "http://b/h", "http://b/u")
            .await
            .unwrap();

        assert!(set_application_active(&pool, app.id, false).await.unwrap());

        let active = list_active_applications(&pool).await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].name, "B");

        let all = list_applications(&pool).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_set_active_unknown_id_returns_false() {
        let pool = setup_test_db().await;
        assert!(!set_application_active(&pool, 999, false).await.unwrap());
    }
}
