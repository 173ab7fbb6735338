//! Development seed script: creates the sightings table and fills it
//! with sample data.
//!
//! Usage: `cargo run --bin seed [-- <count>]`
//!
//! Requires `DATABASE_URL` (reads .env). Uses `SIGHTINGS_TABLE` when set.

use sqlx::PgPool;

use pokedash::config::validate_table_name;

/// Sample species: (name, primary type, secondary type or the "n/a" marker).
const SPECIES: &[(&str, &str, &str)] = &[
    ("bulbasaur", "grass", "poison"),
    ("charmander", "fire", "n/a"),
    ("charizard", "fire", "flying"),
    ("squirtle", "water", "n/a"),
    ("pikachu", "electric", "n/a"),
    ("jigglypuff", "normal", "fairy"),
    ("zubat", "poison", "flying"),
    ("geodude", "rock", "ground"),
    ("gastly", "ghost", "poison"),
    ("eevee", "normal", "n/a"),
    ("snorlax", "normal", "n/a"),
    ("dratini", "dragon", "n/a"),
    ("magnemite", "electric", "steel"),
    ("psyduck", "water", "N/A"),
];

/// A few fixed spawn points so the geo chart shows stacked sightings.
const SPAWN_POINTS: &[(f64, f64)] = &[
    (40.7128, -74.0060),
    (34.0522, -118.2437),
    (51.5074, -0.1278),
    (35.6762, 139.6503),
    (-33.8688, 151.2093),
    (48.8566, 2.3522),
];

const DEFAULT_COUNT: usize = 200;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let db_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let table = std::env::var("SIGHTINGS_TABLE").unwrap_or_else(|_| "pokemon".to_string());
    validate_table_name(&table)?;
    let count = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(DEFAULT_COUNT);

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(2)
        .connect(&db_url)
        .await?;

    println!("=== PokéDash Seed Script ===");

    create_table(&pool, &table).await?;
    seed_sightings(&pool, &table, count).await?;

    let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(&pool)
        .await?;

    println!("\n=== Seed complete! ===");
    println!("{table} now holds {total} sightings");

    pool.close().await;
    Ok(())
}

async fn create_table(pool: &PgPool, table: &str) -> anyhow::Result<()> {
    sqlx::query(&format!(
        "CREATE TABLE IF NOT EXISTS {table} (
            id             BIGSERIAL PRIMARY KEY,
            name           TEXT NOT NULL,
            primary_type   TEXT NOT NULL,
            secondary_type TEXT,
            lat            DOUBLE PRECISION NOT NULL,
            long           DOUBLE PRECISION NOT NULL
        )"
    ))
    .execute(pool)
    .await?;

    println!("[done] Ensured table {table} exists");
    Ok(())
}

async fn seed_sightings(pool: &PgPool, table: &str, count: usize) -> anyhow::Result<()> {
    let insert = format!(
        "INSERT INTO {table} (name, primary_type, secondary_type, lat, long)
         VALUES ($1, $2, $3, $4, $5)"
    );

    let mut tx = pool.begin().await?;
    for i in 0..count {
        // Skewed selection so the name chart has a clear ranking.
        let species_index = (i * i + i / 3) % SPECIES.len();
        let (name, primary, secondary) = SPECIES[species_index];
        let (lat, long) = SPAWN_POINTS[(i * 7 + species_index) % SPAWN_POINTS.len()];

        sqlx::query(&insert)
            .bind(name)
            .bind(primary)
            .bind(secondary)
            .bind(lat)
            .bind(long)
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;

    println!("[done] Inserted {count} sightings");
    Ok(())
}
