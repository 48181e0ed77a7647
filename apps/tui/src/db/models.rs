use sqlx::FromRow;

/// One extracted insight joined with its Reddit or review source.
///
/// Dates and ids are cast to text in the query; the extraction pipeline
/// stores them with mixed column affinities.
#[derive(Debug, Clone, Default, FromRow)]
pub struct InsightRow {
    pub id: i64,
    pub category: Option<String>,
    pub quote: Option<String>,
    pub source_id: Option<String>,
    pub source_table: Option<String>,
    pub extracted_at: Option<String>,
    pub reddit_content_type: Option<String>,
    pub reddit_title: Option<String>,
    pub reddit_body: Option<String>,
    pub reddit_community: Option<String>,
    pub reddit_url: Option<String>,
    pub reddit_date: Option<String>,
    pub reddit_upvotes: Option<i64>,
    pub review_source: Option<String>,
    pub review_user: Option<String>,
    pub review_rating: Option<i64>,
    pub review_date: Option<String>,
    pub review_text: Option<String>,
}

/// A Reddit post or comment for the search corpus.
#[derive(Debug, Clone, Default, FromRow)]
pub struct RedditRecord {
    pub id: String,
    pub content_type: Option<String>,
    pub title: Option<String>,
    pub body: Option<String>,
    pub username: Option<String>,
    pub community_name: Option<String>,
    pub up_votes: Option<i64>,
    pub url: Option<String>,
    pub created_at: Option<String>,
}

/// An app store or review site entry for the search corpus.
#[derive(Debug, Clone, Default, FromRow)]
pub struct ReviewRecord {
    pub review_id: String,
    pub source: Option<String>,
    pub user_name: Option<String>,
    pub rating: Option<i64>,
    pub date: Option<String>,
    pub review_text: Option<String>,
}
