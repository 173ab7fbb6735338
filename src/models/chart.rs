//! Chart descriptions handed to the page's charting library.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Page element ids of the four chart panels.
pub const NAME_CHART_ID: &str = "MostFreqPokemon";
pub const PRIMARY_TYPE_CHART_ID: &str = "MostFreqPrimaryType";
pub const SECONDARY_TYPE_CHART_ID: &str = "MostFreqSecondaryType";
pub const LOCATIONS_CHART_ID: &str = "PokemonLocations";

/// One bar: a display label and how many sightings carry it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelCount {
    pub label: String,
    pub count: u64,
}

/// Number of sightings at one exact coordinate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChart {
    pub id: String,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub bars: Vec<LabelCount>,
}

/// Point-sized geographic scatter; marker size follows `count`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoScatter {
    pub id: String,
    pub title: String,
    pub points: Vec<GeoPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Chart {
    Bar(BarChart),
    GeoScatter(GeoScatter),
}

impl Chart {
    pub fn id(&self) -> &str {
        match self {
            Chart::Bar(c) => &c.id,
            Chart::GeoScatter(c) => &c.id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardCharts {
    pub most_frequent_pokemon: BarChart,
    pub primary_types: BarChart,
    pub secondary_types: BarChart,
    pub locations: GeoScatter,
}

/// Everything one refresh tick derives from a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub headline: String,
    pub total: u64,
    pub charts: DashboardCharts,
    pub refreshed_at: DateTime<Utc>,
}

impl DashboardView {
    /// Look up a single chart by its page element id.
    pub fn chart(&self, id: &str) -> Option<Chart> {
        let charts = &self.charts;
        match id {
            NAME_CHART_ID => Some(Chart::Bar(charts.most_frequent_pokemon.clone())),
            PRIMARY_TYPE_CHART_ID => Some(Chart::Bar(charts.primary_types.clone())),
            SECONDARY_TYPE_CHART_ID => Some(Chart::Bar(charts.secondary_types.clone())),
            LOCATIONS_CHART_ID => Some(Chart::GeoScatter(charts.locations.clone())),
            _ => None,
        }
    }
}
