//! Demo reference data
//!
//! Loaded by `vitrina seed`. Cities whose slug already exists are left untouched,
//! so seeding twice is harmless.

use sqlx::SqlitePool;

use super::SqliteError;
use super::repositories::{create_city, list_cities, replace_districts};

struct SeedCity {
    name: &'static str,
    slug: &'static str,
    districts: &'static [&'static str],
}

const DEMO_CITIES: &[SeedCity] = &[
    SeedCity {
        name: "Москва",
        slug: "moscow",
        districts: &[
            "Центр",
            "Арбат",
            "Тверской",
            "Замоскворечье",
            "Хамовники",
            "Пресненский",
            "Басманный",
        ],
    },
    SeedCity {
        name: "Санкт-Петербург",
        slug: "spb",
        districts: &[
            "Центральный",
            "Адмиралтейский",
            "Василеостровский",
            "Петроградский",
            "Московский",
        ],
    },
    SeedCity {
        name: "Казань",
        slug: "kazan",
        districts: &["Вахитовский", "Приволжский", "Советский"],
    },
];

/// Insert demo cities and their districts. Returns the number of cities created.
pub async fn seed_demo_cities(pool: &SqlitePool) -> Result<usize, SqliteError> {
    let existing: Vec<String> = list_cities(pool, None)
        .await?
        .into_iter()
        .map(|c| c.slug)
        .collect();

    let mut created = 0;
    for seed in DEMO_CITIES {
        if existing.iter().any(|slug| slug == seed.slug) {
            tracing::debug!(slug = seed.slug, "City exists, skipping");
            continue;
        }
        let city = create_city(pool, None, seed.name, seed.slug).await?;
        let districts: Vec<String> = seed.districts.iter().map(|d| d.to_string()).collect();
        replace_districts(pool, None, city.id, &districts).await?;
        created += 1;
    }

    tracing::info!(created, "Demo cities seeded");
    Ok(created)
}
