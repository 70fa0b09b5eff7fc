use async_trait::async_trait;
use meadowlark_core::notification::{NewsletterSignup, Subscription};
use meadowlark_core::repository::{NewsletterRepository, RepoResult, SubscriptionRepository};
use sqlx::PgPool;

/// In-season listeners, one row per email.
pub struct PgSubscriptionRepository {
    pool: PgPool,
}

impl PgSubscriptionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct SubscriptionRow {
    email: String,
    skus: Vec<String>,
}

#[async_trait]
impl SubscriptionRepository for PgSubscriptionRepository {
    async fn push_sku(&self, email: &str, sku: &str, dedupe: bool) -> RepoResult<Subscription> {
        let row: SubscriptionRow = sqlx::query_as(
            r#"
            INSERT INTO vacation_in_season_listeners (email, skus)
            VALUES ($1, ARRAY[$2::text])
            ON CONFLICT (email) DO UPDATE
            SET skus = CASE
                WHEN $3::bool AND $2::text = ANY(vacation_in_season_listeners.skus)
                    THEN vacation_in_season_listeners.skus
                ELSE array_append(vacation_in_season_listeners.skus, $2::text)
            END
            RETURNING email, skus
            "#,
        )
        .bind(email)
        .bind(sku)
        .bind(dedupe)
        .fetch_one(&self.pool)
        .await?;

        Ok(Subscription { email: row.email, skus: row.skus })
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<Subscription>> {
        let row: Option<SubscriptionRow> =
            sqlx::query_as("SELECT email, skus FROM vacation_in_season_listeners WHERE email = $1")
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(|r| Subscription { email: r.email, skus: r.skus }))
    }
}

pub struct PgNewsletterRepository {
    pool: PgPool,
}

impl PgNewsletterRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NewsletterRepository for PgNewsletterRepository {
    async fn record(&self, signup: &NewsletterSignup) -> RepoResult<()> {
        sqlx::query(
            "INSERT INTO newsletter_signups (id, name, email, signed_up_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(signup.id)
        .bind(&signup.name)
        .bind(&signup.email)
        .bind(signup.signed_up_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
