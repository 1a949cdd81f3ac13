use sqlx::{types::chrono, Executor, Postgres};

/// Stall entity representing a street food stall listed on the map
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct Stall {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub is_open: Option<bool>,
    pub owner_id: Option<i32>,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Stall returned by a nearby search, with its distance from the search point
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct NearbyStall {
    #[sqlx(flatten)]
    pub stall: Stall,
    pub distance_km: f64,
}

impl Stall {
    /// Find stall by id
    pub async fn find_by_id<'c, E>(id: i32, connection: E) -> Result<Option<Stall>, sqlx::Error>
    where
        E: Executor<'c, Database = Postgres>,
    {
        sqlx::query_as::<_, Stall>("SELECT * FROM stalls WHERE id = $1")
            .bind(id)
            .fetch_optional(connection)
            .await
    }

    /// Find stalls within `radius_km` of a point, nearest first
    ///
    /// Distance is the great-circle (Haversine) distance computed in SQL,
    /// using a mean Earth radius of 6371 km.
    pub async fn find_nearby<'c, E>(
        latitude: f64,
        longitude: f64,
        radius_km: f64,
        limit: i32,
        connection: E,
    ) -> Result<Vec<NearbyStall>, sqlx::Error>
    where
        E: Executor<'c, Database = Postgres>,
    {
        sqlx::query_as::<_, NearbyStall>(
            r#"
            SELECT * FROM (
                SELECT s.*,
                    6371.0 * 2 * ASIN(SQRT(
                        POWER(SIN(RADIANS(s.latitude - $1) / 2), 2)
                        + COS(RADIANS($1)) * COS(RADIANS(s.latitude))
                        * POWER(SIN(RADIANS(s.longitude - $2) / 2), 2)
                    )) AS distance_km
                FROM stalls s
            ) nearby
            WHERE distance_km <= $3
            ORDER BY distance_km ASC
            LIMIT $4
            "#,
        )
        .bind(latitude)
        .bind(longitude)
        .bind(radius_km)
        .bind(limit)
        .fetch_all(connection)
        .await
    }

    /// Set whether the stall is currently open
    pub async fn update_status<'c, E>(
        id: i32,
        is_open: bool,
        connection: E,
    ) -> Result<Option<Stall>, sqlx::Error>
    where
        E: Executor<'c, Database = Postgres>,
    {
        sqlx::query_as::<_, Stall>(
            r#"
            UPDATE stalls SET
                is_open = $2,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(is_open)
        .fetch_optional(connection)
        .await
    }
}
