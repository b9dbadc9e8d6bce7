//! Storage representation of validated shapes

use shared::models::{Circle, MultiPoint, MultiPolygon};

use super::validate::{FeatureCollection, ValidatedShapes};

/// Shapes ready to be written to the geometry columns
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedShapes {
    pub polygon_shape: Option<MultiPolygon>,
    pub centers: Option<MultiPoint>,
    /// Parallel to `centers.coordinates`
    pub radii: Option<Vec<f64>>,
}

/// One `MultiPolygon` holding every feature's rings, in feature order.
pub fn to_multi_polygon(collection: &FeatureCollection) -> MultiPolygon {
    MultiPolygon {
        coordinates: collection
            .features
            .iter()
            .map(|feature| feature.rings.clone())
            .collect(),
    }
}

/// Split circles into a `MultiPoint` of centers and a radius list of equal length.
pub fn to_centers_and_radii(circles: &[Circle]) -> (MultiPoint, Vec<f64>) {
    let (coordinates, radii) = circles.iter().map(|c| (c.center, c.radius)).unzip();
    (MultiPoint { coordinates }, radii)
}

/// An empty circle list normalizes to no centers and no radii.
pub fn normalize_shapes(shapes: &ValidatedShapes) -> NormalizedShapes {
    let polygon_shape = shapes.polygons.as_ref().map(to_multi_polygon);

    let (centers, radii) = match shapes.circles.as_deref() {
        Some(circles) if !circles.is_empty() => {
            let (centers, radii) = to_centers_and_radii(circles);
            (Some(centers), Some(radii))
        }
        _ => (None, None),
    };

    NormalizedShapes {
        polygon_shape,
        centers,
        radii,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::validate::PolygonFeature;

    fn square(offset: f64) -> Vec<Vec<[f64; 2]>> {
        vec![vec![
            [offset, offset],
            [offset, offset + 1.0],
            [offset + 1.0, offset + 1.0],
            [offset + 1.0, offset],
            [offset, offset],
        ]]
    }

    #[test]
    fn test_features_become_polygons_in_order() {
        let collection = FeatureCollection {
            features: vec![
                PolygonFeature { rings: square(0.0) },
                PolygonFeature { rings: square(5.0) },
            ],
        };
        let shape = to_multi_polygon(&collection);
        assert_eq!(shape.coordinates.len(), 2);
        assert_eq!(shape.coordinates[0], square(0.0));
        assert_eq!(shape.coordinates[1], square(5.0));
    }

    #[test]
    fn test_circles_split_pairwise() {
        let circles = vec![
            Circle {
                center: [10.0, 20.0],
                radius: 5.0,
            },
            Circle {
                center: [-1.5, 3.0],
                radius: 250.0,
            },
        ];
        let (centers, radii) = to_centers_and_radii(&circles);
        assert_eq!(centers.coordinates, vec![[10.0, 20.0], [-1.5, 3.0]]);
        assert_eq!(radii, vec![5.0, 250.0]);
    }

    #[test]
    fn test_normalize_both_shapes() {
        let shapes = ValidatedShapes {
            polygons: Some(FeatureCollection {
                features: vec![PolygonFeature { rings: square(0.0) }],
            }),
            circles: Some(vec![Circle {
                center: [10.0, 20.0],
                radius: 5.0,
            }]),
        };
        let normalized = normalize_shapes(&shapes);
        assert_eq!(normalized.polygon_shape.unwrap().coordinates.len(), 1);
        assert_eq!(normalized.centers.unwrap().coordinates, vec![[10.0, 20.0]]);
        assert_eq!(normalized.radii, Some(vec![5.0]));
    }

    #[test]
    fn test_empty_circle_list_normalizes_to_nothing() {
        let shapes = ValidatedShapes {
            polygons: None,
            circles: Some(Vec::new()),
        };
        assert_eq!(normalize_shapes(&shapes), NormalizedShapes::default());
    }
}
