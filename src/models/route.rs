//! Route summary returned by the route tool

use serde::{Deserialize, Serialize};

/// Driving route between two places
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct RouteSummary {
    /// "<distance> in approximately <duration>"
    pub route_summary: String,
    /// Shareable directions link
    pub map_link: String,
    /// Embeddable directions widget markup
    pub map_embed: String,
}
