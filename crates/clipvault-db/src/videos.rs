use async_trait::async_trait;
use clipvault_core::models::{VideoFormat, VideoFormatLinks, VideoRecord, VideoStatus};
use clipvault_core::AppError;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::store::VideoStore;

/// Postgres-backed video record repository.
///
/// One long-lived handle over the connection pool; cloned freely into the
/// services that need it.
#[derive(Clone)]
pub struct VideoRepository {
    pool: PgPool,
}

impl VideoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Decode one variants payload, surfacing malformed data instead of
/// dropping it.
fn parse_formats(file_id: Uuid, value: serde_json::Value) -> Result<Vec<VideoFormat>, AppError> {
    serde_json::from_value(value).map_err(|e| {
        AppError::Internal(format!(
            "Malformed formats payload for video {}: {}",
            file_id, e
        ))
    })
}

#[derive(sqlx::FromRow)]
struct FormatLinkRow {
    file_id: Uuid,
    display_name: String,
    video_format_id: Uuid,
    formats: serde_json::Value,
}

#[async_trait]
impl VideoStore for VideoRepository {
    #[tracing::instrument(
        skip(self),
        fields(db.table = "videos", db.operation = "insert", owner_id = %owner_id)
    )]
    async fn create_record(
        &self,
        owner_id: Uuid,
        display_name: &str,
        storage_path: &str,
        is_stream: bool,
    ) -> Result<VideoRecord, AppError> {
        let id = Uuid::new_v4();

        let record: VideoRecord = sqlx::query_as::<Postgres, VideoRecord>(
            r#"
            INSERT INTO videos (
                id, owner_id, display_name, storage_path, is_stream, status,
                uploaded_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, 'loading', now(), now())
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .bind(display_name)
        .bind(storage_path)
        .bind(is_stream)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => AppError::Conflict(format!(
                "storage path already in use for '{}'",
                display_name
            )),
            _ => AppError::from(e),
        })?;

        Ok(record)
    }

    #[tracing::instrument(
        skip(self),
        fields(db.table = "videos", db.operation = "update", video_id = %id)
    )]
    async fn confirm_stored(&self, id: Uuid) -> Result<(), AppError> {
        // Guarded on `loading` so the post-write update lands exactly once
        // and never clobbers a later transition.
        let result = sqlx::query(
            r#"
            UPDATE videos
            SET status = CASE WHEN is_stream THEN 'conv'::video_status
                              ELSE 'no_conv'::video_status END,
                updated_at = now()
            WHERE id = $1 AND status = 'loading'
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            tracing::warn!(video_id = %id, "Write confirmation found no loading record");
        }

        Ok(())
    }

    #[tracing::instrument(
        skip(self),
        fields(db.table = "videos", db.operation = "update", video_id = %id)
    )]
    async fn mark_load_failed(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE videos
            SET status = 'loading_error', updated_at = now()
            WHERE id = $1 AND status = 'loading'
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get(&self, owner_id: Uuid, id: Uuid) -> Result<Option<VideoRecord>, AppError> {
        let record = sqlx::query_as::<Postgres, VideoRecord>(
            r#"
            SELECT * FROM videos
            WHERE id = $1 AND owner_id = $2
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn list(
        &self,
        owner_id: Uuid,
        status: Option<VideoStatus>,
        id: Option<Uuid>,
    ) -> Result<Vec<VideoRecord>, AppError> {
        let mut query: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT * FROM videos WHERE owner_id = ");
        query.push_bind(owner_id);

        if let Some(status) = status {
            query.push(" AND status = ");
            query.push_bind(status);
        }
        if let Some(id) = id {
            query.push(" AND id = ");
            query.push_bind(id);
        }
        query.push(" ORDER BY uploaded_at");

        let records = query
            .build_query_as::<VideoRecord>()
            .fetch_all(&self.pool)
            .await?;

        Ok(records)
    }

    #[tracing::instrument(
        skip(self, display_name),
        fields(db.table = "videos", db.operation = "update", video_id = %id, owner_id = %owner_id)
    )]
    async fn mark_deleted(
        &self,
        owner_id: Uuid,
        id: Uuid,
        display_name: &str,
    ) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE videos
            SET status = 'deleted', display_name = $3, updated_at = now()
            WHERE id = $1 AND owner_id = $2 AND status <> 'deleted'
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .bind(display_name)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("video {} not found", id)));
        }

        Ok(())
    }

    #[tracing::instrument(
        skip(self),
        fields(db.table = "videos", db.operation = "update", owner_id = %owner_id)
    )]
    async fn reset_errors_to_conv(&self, owner_id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE videos
            SET status = 'conv', updated_at = now()
            WHERE status = 'error' AND is_stream AND owner_id = $1
            "#,
        )
        .bind(owner_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn done_with_formats(&self, owner_id: Uuid) -> Result<Vec<VideoFormatLinks>, AppError> {
        let rows = sqlx::query_as::<Postgres, FormatLinkRow>(
            r#"
            SELECT
                v.id AS file_id,
                v.display_name,
                vf.id AS video_format_id,
                vf.formats
            FROM videos v
            INNER JOIN videos_video_formats jvf ON v.id = jvf.video_id
            INNER JOIN video_formats vf ON jvf.video_format_id = vf.id
            WHERE v.status = 'done' AND v.owner_id = $1
            ORDER BY v.uploaded_at
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        let mut results = Vec::with_capacity(rows.len());
        for row in rows {
            let formats = parse_formats(row.file_id, row.formats)?;
            results.push(VideoFormatLinks {
                video_format_id: row.video_format_id,
                file_id: row.file_id,
                filename: row.display_name,
                formats,
            });
        }

        Ok(results)
    }
}
