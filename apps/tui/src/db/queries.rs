use sqlx::{query_as, SqlitePool};

use crate::db::models::{InsightRow, RedditRecord, ReviewRecord};
use crate::domain::DataKind;

fn insights_sql(kind: DataKind) -> String {
    let table = kind.table_name();
    let category = kind
        .category_column()
        .map_or_else(|| "NULL".to_string(), |column| format!("i.{column}"));
    let order = kind
        .category_column()
        .map_or_else(
            || "i.extracted_at DESC".to_string(),
            |column| format!("i.{column}, i.extracted_at DESC"),
        );

    format!(
        "SELECT
            i.id,
            {category} AS category,
            i.quote,
            CAST(i.source_id AS TEXT) AS source_id,
            i.source_table,
            CAST(i.extracted_at AS TEXT) AS extracted_at,
            rc.content_type AS reddit_content_type,
            rc.title AS reddit_title,
            rc.body AS reddit_body,
            rc.community_name AS reddit_community,
            rc.url AS reddit_url,
            CAST(rc.created_at AS TEXT) AS reddit_date,
            CAST(rc.up_votes AS INTEGER) AS reddit_upvotes,
            r.source AS review_source,
            r.user_name AS review_user,
            CAST(r.rating AS INTEGER) AS review_rating,
            CAST(r.date AS TEXT) AS review_date,
            r.review_text AS review_text
        FROM {table} i
        LEFT JOIN reddit_content rc ON i.source_table = 'reddit_content' AND i.source_id = rc.id
        LEFT JOIN reviews r ON i.source_table = 'reviews' AND i.source_id = r.review_id
        ORDER BY {order}"
    )
}

/// Every extracted row of one kind with its source joined in.
pub async fn fetch_insights(
    pool: &SqlitePool,
    kind: DataKind,
) -> Result<Vec<InsightRow>, sqlx::Error> {
    query_as::<_, InsightRow>(&insights_sql(kind))
        .fetch_all(pool)
        .await
}

pub async fn fetch_reddit_sources(pool: &SqlitePool) -> Result<Vec<RedditRecord>, sqlx::Error> {
    query_as::<_, RedditRecord>(
        "SELECT
            CAST(id AS TEXT) AS id,
            content_type,
            title,
            body,
            username,
            community_name,
            CAST(up_votes AS INTEGER) AS up_votes,
            url,
            CAST(created_at AS TEXT) AS created_at
        FROM reddit_content
        WHERE body IS NOT NULL AND body != ''
        ORDER BY created_at DESC",
    )
    .fetch_all(pool)
    .await
}

pub async fn fetch_review_sources(pool: &SqlitePool) -> Result<Vec<ReviewRecord>, sqlx::Error> {
    query_as::<_, ReviewRecord>(
        "SELECT
            CAST(review_id AS TEXT) AS review_id,
            source,
            user_name,
            CAST(rating AS INTEGER) AS rating,
            CAST(date AS TEXT) AS date,
            review_text
        FROM reviews
        WHERE review_text IS NOT NULL AND review_text != ''
        ORDER BY date DESC",
    )
    .fetch_all(pool)
    .await
}
