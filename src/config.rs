//! Application-level configuration constants.

// Data source
pub const PLAYERS_ENDPOINT: &str = "/api/data";

// Player record fields
pub const TOTAL_POINTS_FIELD: &str = "Total Points";
pub const NAME_FIELD: &str = "Player";
pub const TEAM_FIELD: &str = "Team";
pub const POSITION_FIELD: &str = "Position";
pub const PHOTO_FIELD: &str = "PlayerPhoto";

// Metric selection bounds (a polygon needs 3 vertices, more than 6 is unreadable)
pub const MIN_METRICS: usize = 3;
pub const MAX_METRICS: usize = 6;

/// Numeric columns served by the players endpoint, in checkbox order.
pub const METRIC_CATALOGUE: &[&str] = &[
    "Total Points",
    "Median",
    "Avg",
    "xG Points",
    "Appearances",
    "Goals",
    "Assists",
    "Goals per App",
    "Assists per App",
    "Y Cards",
    "R Cards",
    "Discip Index",
    "Last Week Price (GBP m)",
];

// Results
pub const MAX_SUGGESTIONS: usize = 10;
pub const NO_MATCHES_MESSAGE: &str = "No players match your current polygon filter.";

// Chart
pub const CHART_CANVAS_ID: &str = "radarChart";
pub const CHART_TITLE: &str = "Interactive Radar: drag the points to filter players";
pub const SCALE_MIN: f64 = 0.0;
pub const HIT_RADIUS_PX: f64 = 10.0;

// Player photos
pub const PHOTO_URL_PREFIX: &str =
    "https://resources.premierleague.com/premierleague/photos/players/250x250/p";
pub const PHOTO_URL_SUFFIX: &str = ".png";
pub const DEFAULT_PHOTO_ID: &str = "99999";
pub const FALLBACK_PHOTO_URL: &str = "https://cdn-icons-png.flaticon.com/512/149/149071.png";
