use async_trait::async_trait;
use meadowlark_catalog::{CatalogFilter, Vacation};
use meadowlark_core::repository::{RepoResult, VacationRepository};
use sqlx::PgPool;
use uuid::Uuid;

const VACATION_COLUMNS: &str = "id, name, slug, category, sku, description, price_in_cents, tags, \
    in_season, available, requires_waiver, maximum_guests, notes, packages_sold";

/// Catalog backed by the `vacations` table.
pub struct PgVacationRepository {
    pool: PgPool,
}

impl PgVacationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct VacationRow {
    id: Uuid,
    name: String,
    slug: String,
    category: String,
    sku: String,
    description: String,
    price_in_cents: i64,
    tags: Vec<String>,
    in_season: bool,
    available: bool,
    requires_waiver: bool,
    maximum_guests: i32,
    notes: Option<String>,
    packages_sold: i64,
}

impl From<VacationRow> for Vacation {
    fn from(row: VacationRow) -> Self {
        Vacation {
            id: row.id,
            name: row.name,
            slug: row.slug,
            category: row.category,
            sku: row.sku,
            description: row.description,
            price_in_cents: row.price_in_cents,
            tags: row.tags,
            in_season: row.in_season,
            available: row.available,
            requires_waiver: row.requires_waiver,
            maximum_guests: u32::try_from(row.maximum_guests).unwrap_or(0),
            notes: row.notes,
            packages_sold: u64::try_from(row.packages_sold).unwrap_or(0),
        }
    }
}

fn select_matching(suffix: &str) -> String {
    format!(
        "SELECT {} FROM vacations \
         WHERE ($1::text IS NULL OR category = $1) \
           AND ($2::text IS NULL OR slug = $2) \
           AND ($3::text IS NULL OR sku = $3) \
           AND ($4::bool IS NULL OR available = $4) \
         ORDER BY name {}",
        VACATION_COLUMNS, suffix
    )
}

#[async_trait]
impl VacationRepository for PgVacationRepository {
    async fn find(&self, filter: &CatalogFilter) -> RepoResult<Vec<Vacation>> {
        let sql = select_matching("");
        let rows: Vec<VacationRow> = sqlx::query_as(&sql)
            .bind(filter.category.as_deref())
            .bind(filter.slug.as_deref())
            .bind(filter.sku.as_deref())
            .bind(filter.available)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Vacation::from).collect())
    }

    async fn find_one(&self, filter: &CatalogFilter) -> RepoResult<Option<Vacation>> {
        let sql = select_matching("LIMIT 1");
        let row: Option<VacationRow> = sqlx::query_as(&sql)
            .bind(filter.category.as_deref())
            .bind(filter.slug.as_deref())
            .bind(filter.sku.as_deref())
            .bind(filter.available)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Vacation::from))
    }

    async fn count(&self) -> RepoResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM vacations")
            .fetch_one(&self.pool)
            .await?;
        Ok(u64::try_from(count)?)
    }

    async fn insert(&self, vacation: &Vacation) -> RepoResult<()> {
        vacation.validate()?;

        sqlx::query(
            r#"
            INSERT INTO vacations (id, name, slug, category, sku, description, price_in_cents, tags,
                                   in_season, available, requires_waiver, maximum_guests, notes, packages_sold)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(vacation.id)
        .bind(&vacation.name)
        .bind(&vacation.slug)
        .bind(&vacation.category)
        .bind(&vacation.sku)
        .bind(&vacation.description)
        .bind(vacation.price_in_cents)
        .bind(&vacation.tags)
        .bind(vacation.in_season)
        .bind(vacation.available)
        .bind(vacation.requires_waiver)
        .bind(i32::try_from(vacation.maximum_guests)?)
        .bind(vacation.notes.as_deref())
        .bind(i64::try_from(vacation.packages_sold)?)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn increment_packages_sold(&self, sku: &str) -> RepoResult<Option<Vacation>> {
        // Single statement, so concurrent bookings of one SKU cannot lose an increment.
        let sql = format!(
            "UPDATE vacations SET packages_sold = packages_sold + 1 WHERE sku = $1 RETURNING {}",
            VACATION_COLUMNS
        );
        let row: Option<VacationRow> = sqlx::query_as(&sql)
            .bind(sku)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Vacation::from))
    }
}
