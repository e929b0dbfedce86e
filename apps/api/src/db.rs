use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

/// Creates and returns a PostgreSQL connection pool.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}

/// Initializes the resumes table and its indexes at startup.
///
/// Sub-documents live in JSONB columns; the expression indexes cover the
/// list projection (`personal_details->>'name'`, `->>'email'`) so listing
/// never loads full documents.
pub async fn init_schema(pool: &PgPool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS resumes (
            id BIGSERIAL PRIMARY KEY,
            file_name TEXT NOT NULL,
            personal_details JSONB NOT NULL,
            resume_content JSONB NOT NULL,
            skills JSONB NOT NULL,
            ai_feedback JSONB NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
    )
    .execute(pool)
    .await?;

    for index in [
        "CREATE INDEX IF NOT EXISTS idx_resumes_created_at ON resumes(created_at)",
        "CREATE INDEX IF NOT EXISTS idx_resumes_name ON resumes((personal_details->>'name'))",
        "CREATE INDEX IF NOT EXISTS idx_resumes_email ON resumes((personal_details->>'email'))",
    ] {
        sqlx::query(index).execute(pool).await?;
    }

    info!("Database schema initialized");
    Ok(())
}
