//! Dashboard view assembly: one snapshot in, every chart out.

use chrono::Utc;

use crate::db::SightingSource;
use crate::errors::AppError;
use crate::models::chart::{
    BarChart, DashboardCharts, DashboardView, GeoScatter, LOCATIONS_CHART_ID, NAME_CHART_ID,
    PRIMARY_TYPE_CHART_ID, SECONDARY_TYPE_CHART_ID,
};
use crate::models::sighting::Snapshot;
use crate::services::aggregation;

const COUNT_AXIS: &str = "Number of Instances";

/// Derive every chart and the headline from a single snapshot.
pub fn build_view(snapshot: &Snapshot, top_n: usize) -> DashboardView {
    let most_frequent_pokemon = BarChart {
        id: NAME_CHART_ID.to_string(),
        title: format!("Top {top_n} Most Common Pokémon"),
        x_label: "Pokémon".to_string(),
        y_label: COUNT_AXIS.to_string(),
        bars: aggregation::top_names(snapshot, top_n),
    };

    let primary_types = BarChart {
        id: PRIMARY_TYPE_CHART_ID.to_string(),
        title: "Most Common Primary Types of Pokemon".to_string(),
        x_label: "Primary Type".to_string(),
        y_label: COUNT_AXIS.to_string(),
        bars: aggregation::primary_types(snapshot),
    };

    let secondary_types = BarChart {
        id: SECONDARY_TYPE_CHART_ID.to_string(),
        title: "Most Common Secondary Types of Pokemon".to_string(),
        x_label: "Secondary Type".to_string(),
        y_label: COUNT_AXIS.to_string(),
        bars: aggregation::secondary_types(snapshot),
    };

    let locations = GeoScatter {
        id: LOCATIONS_CHART_ID.to_string(),
        title: "Locations of Pokemon".to_string(),
        points: aggregation::geo_distribution(snapshot),
    };

    DashboardView {
        headline: aggregation::total_count_sentence(snapshot),
        total: aggregation::total_count(snapshot),
        charts: DashboardCharts {
            most_frequent_pokemon,
            primary_types,
            secondary_types,
            locations,
        },
        refreshed_at: snapshot.fetched_at,
    }
}

/// Fetch a fresh snapshot, validate it and build the view.
pub async fn load_view(source: &dyn SightingSource, top_n: usize) -> Result<DashboardView, AppError> {
    let started = Utc::now();
    let snapshot = source.fetch_all().await?;
    snapshot.validate()?;
    let view = build_view(&snapshot, top_n);

    tracing::debug!(
        rows = snapshot.len(),
        missing_secondary = aggregation::missing_count(&snapshot, aggregation::GroupKey::SecondaryType),
        locations = view.charts.locations.points.len(),
        elapsed_ms = (Utc::now() - started).num_milliseconds(),
        "Built dashboard view"
    );
    Ok(view)
}
