use hygiene_score::ScoredReview;
use sqlx::{types::chrono, Executor, Postgres};

/// Review entity left by a visitor for a stall
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct Review {
    pub id: i32,
    pub stall_id: i32,
    pub reviewer_name: Option<String>,
    pub comment: Option<String>,
    pub hygiene_score: Option<i32>,
    pub hygiene_tags: Option<Vec<String>>,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Input for creating a new review
#[derive(Debug, Clone)]
pub struct NewReview {
    pub stall_id: i32,
    pub reviewer_name: Option<String>,
    pub comment: Option<String>,
    pub hygiene_score: i32,
    pub hygiene_tags: Vec<String>,
}

impl ScoredReview for Review {
    fn hygiene_score(&self) -> Option<i32> {
        self.hygiene_score
    }

    fn hygiene_tags(&self) -> Option<&[String]> {
        self.hygiene_tags.as_deref()
    }
}

impl Review {
    /// Create a new review record
    pub async fn create<'c, E>(review: &NewReview, connection: E) -> Result<Review, sqlx::Error>
    where
        E: Executor<'c, Database = Postgres>,
    {
        let query = r#"
            INSERT INTO reviews (stall_id, reviewer_name, comment, hygiene_score, hygiene_tags, created_at)
            VALUES ($1, $2, $3, $4, $5, NOW())
            RETURNING *
        "#;

        sqlx::query_as::<_, Review>(query)
            .bind(review.stall_id)
            .bind(&review.reviewer_name)
            .bind(&review.comment)
            .bind(review.hygiene_score)
            .bind(&review.hygiene_tags)
            .fetch_one(connection)
            .await
    }

    /// Get reviews for a stall, newest first
    pub async fn find_by_stall<'c, E>(
        stall_id: i32,
        limit: i32,
        connection: E,
    ) -> Result<Vec<Review>, sqlx::Error>
    where
        E: Executor<'c, Database = Postgres>,
    {
        sqlx::query_as::<_, Review>(
            "SELECT * FROM reviews WHERE stall_id = $1 ORDER BY created_at DESC LIMIT $2",
        )
        .bind(stall_id)
        .bind(limit)
        .fetch_all(connection)
        .await
    }

    /// Get every review for a stall (for hygiene scoring)
    pub async fn find_all_by_stall<'c, E>(
        stall_id: i32,
        connection: E,
    ) -> Result<Vec<Review>, sqlx::Error>
    where
        E: Executor<'c, Database = Postgres>,
    {
        sqlx::query_as::<_, Review>("SELECT * FROM reviews WHERE stall_id = $1 ORDER BY id ASC")
            .bind(stall_id)
            .fetch_all(connection)
            .await
    }

    /// Get every review for a set of stalls (for scoring search results)
    pub async fn find_by_stalls<'c, E>(
        stall_ids: &[i32],
        connection: E,
    ) -> Result<Vec<Review>, sqlx::Error>
    where
        E: Executor<'c, Database = Postgres>,
    {
        sqlx::query_as::<_, Review>(
            "SELECT * FROM reviews WHERE stall_id = ANY($1) ORDER BY stall_id ASC, id ASC",
        )
        .bind(stall_ids)
        .fetch_all(connection)
        .await
    }
}
