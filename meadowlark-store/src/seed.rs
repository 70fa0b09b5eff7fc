use meadowlark_catalog::seed_vacations;
use meadowlark_core::repository::{RepoResult, VacationRepository};
use tracing::info;

/// Loads the starter packages when the catalog is empty. Returns how many
/// records were inserted.
pub async fn seed_if_empty(vacations: &dyn VacationRepository) -> RepoResult<usize> {
    if vacations.count().await? > 0 {
        return Ok(0);
    }

    let seeds = seed_vacations();
    for vacation in &seeds {
        vacations.insert(vacation).await?;
    }
    info!("Seeded catalog with {} vacations", seeds.len());
    Ok(seeds.len())
}
