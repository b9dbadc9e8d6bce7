//! Row → public view
//!
//! Circle centers and radii live in two independently nullable columns. They
//! are re-paired positionally, and only when both are present with equal length.

use shared::models::{Circle, Geofence, MultiPoint};

use super::geofences::GeofenceRow;

/// How the stored circle columns related to each other
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CirclePairing {
    /// Neither centers nor radii stored
    Absent,
    /// Both stored with this many entries each
    Paired(usize),
    /// Exactly one of the two columns stored
    Incomplete,
    /// Both stored with different lengths; circles omitted
    CountMismatch { centers: usize, radii: usize },
}

impl CirclePairing {
    /// Stored circle data that could not be paired
    pub fn is_integrity_fault(&self) -> bool {
        matches!(
            self,
            CirclePairing::Incomplete | CirclePairing::CountMismatch { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MappedGeofence {
    pub geofence: Geofence,
    pub circles: CirclePairing,
}

pub fn map_row(row: GeofenceRow) -> MappedGeofence {
    let (circles, pairing) = pair_circles(
        row.circle_centers.map(|json| json.0),
        row.circle_radii,
    );

    let geofence = Geofence {
        id: row.id,
        name: row.name,
        alert_type: row.alert_type,
        categories: row.categories,
        fill_color: row.fill_color,
        stroke_color: row.stroke_color,
        fill_opacity: row.fill_opacity,
        stroke_width: row.stroke_width,
        created_at: row.created_at,
        updated_at: row.updated_at,
        geometry: row.geometry.map(|json| json.0),
        circles,
    };

    MappedGeofence {
        geofence,
        circles: pairing,
    }
}

fn pair_circles(
    centers: Option<MultiPoint>,
    radii: Option<Vec<f64>>,
) -> (Option<Vec<Circle>>, CirclePairing) {
    match (centers, radii) {
        (None, None) => (None, CirclePairing::Absent),
        (Some(centers), Some(radii)) if centers.coordinates.len() == radii.len() => {
            let count = radii.len();
            let circles = centers
                .coordinates
                .into_iter()
                .zip(radii)
                .map(|(center, radius)| Circle { center, radius })
                .collect();
            (Some(circles), CirclePairing::Paired(count))
        }
        (Some(centers), Some(radii)) => (
            None,
            CirclePairing::CountMismatch {
                centers: centers.coordinates.len(),
                radii: radii.len(),
            },
        ),
        _ => (None, CirclePairing::Incomplete),
    }
}
