//! Insert statement → simulated store read → row mapper
//!
//! The store is stood in for by interpreting the rendered INSERT: each column
//! expression is resolved against the bound parameters the way PostGIS would
//! (GeoJSON text in, GeoJSON out), then fed through `map_row`.

use std::collections::HashMap;
use std::sync::LazyLock;

use chrono::Utc;
use geofence_cloud::db::{GeofenceFields, GeofenceRow, SqlValue, Statement, build_insert, map_row};
use geofence_cloud::geo::{normalize_shapes, validate_shapes};
use regex::Regex;
use serde_json::{Value, json};
use shared::models::{AlertType, Circle, MultiPoint, MultiPolygon, Style};
use sqlx::types::Json;
use uuid::Uuid;

static EXPR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"ST_SetSRID\(ST_GeomFromGeoJSON\(\$(\d+)\), 4326\)|ARRAY\[([^\]]*)\]::float8\[\]|NOW\(\)|\$(\d+)",
    )
    .unwrap()
});

#[derive(Debug, Clone)]
enum Stored {
    Value(SqlValue),
    Geometry(String),
    Floats(Vec<f64>),
    Now,
}

fn param(stmt: &Statement, placeholder: &str) -> SqlValue {
    let index: usize = placeholder.trim().trim_start_matches('$').parse().unwrap();
    stmt.params[index - 1].clone()
}

/// Interpret an INSERT as the column values the store would hold
fn store(stmt: &Statement) -> HashMap<String, Stored> {
    let (head, values) = stmt.sql.split_once(") VALUES (").unwrap();
    let columns: Vec<&str> = head
        .split_once('(')
        .unwrap()
        .1
        .split(", ")
        .collect();
    let values = values.strip_suffix(')').unwrap();

    let exprs: Vec<Stored> = EXPR_RE
        .captures_iter(values)
        .map(|caps| {
            if let Some(geo) = caps.get(1) {
                match param(stmt, &format!("${}", geo.as_str())) {
                    SqlValue::Text(text) => Stored::Geometry(text),
                    other => panic!("geometry bound as {other:?}"),
                }
            } else if let Some(slots) = caps.get(2) {
                Stored::Floats(
                    slots
                        .as_str()
                        .split(',')
                        .map(|slot| match param(stmt, slot) {
                            SqlValue::Float(f) => f,
                            other => panic!("radius bound as {other:?}"),
                        })
                        .collect(),
                )
            } else if let Some(p) = caps.get(3) {
                Stored::Value(param(stmt, &format!("${}", p.as_str())))
            } else {
                Stored::Now
            }
        })
        .collect();

    assert_eq!(columns.len(), exprs.len(), "{}", stmt.sql);
    columns
        .into_iter()
        .map(str::to_string)
        .zip(exprs)
        .collect()
}

fn text(stored: &HashMap<String, Stored>, column: &str) -> String {
    match &stored[column] {
        Stored::Value(SqlValue::Text(s)) => s.clone(),
        other => panic!("{column}: {other:?}"),
    }
}

fn float(stored: &HashMap<String, Stored>, column: &str) -> f64 {
    match &stored[column] {
        Stored::Value(SqlValue::Float(f)) => *f,
        other => panic!("{column}: {other:?}"),
    }
}

/// Read the stored geometry back as GeoJSON, like `ST_AsGeoJSON(col)::json`
fn geojson<T: serde::de::DeserializeOwned>(
    stored: &HashMap<String, Stored>,
    column: &str,
) -> Option<Json<T>> {
    match stored.get(column) {
        None => None,
        Some(Stored::Geometry(text)) => Some(Json(serde_json::from_str(text).unwrap())),
        Some(other) => panic!("{column}: {other:?}"),
    }
}

fn read_back(stmt: &Statement) -> GeofenceRow {
    let stored = store(stmt);
    assert!(matches!(stored["updated_at"], Stored::Now));

    let now = Utc::now();
    GeofenceRow {
        id: match &stored["id"] {
            Stored::Value(SqlValue::Uuid(id)) => *id,
            other => panic!("id: {other:?}"),
        },
        name: text(&stored, "name"),
        alert_type: text(&stored, "alert_type").parse().unwrap(),
        categories: match &stored["categories"] {
            Stored::Value(SqlValue::TextArray(v)) => v.clone(),
            other => panic!("categories: {other:?}"),
        },
        fill_color: text(&stored, "fill_color"),
        stroke_color: text(&stored, "stroke_color"),
        fill_opacity: float(&stored, "fill_opacity"),
        stroke_width: float(&stored, "stroke_width"),
        geometry: geojson::<MultiPolygon>(&stored, "geometry"),
        circle_centers: geojson::<MultiPoint>(&stored, "circle_centers"),
        circle_radii: match stored.get("circle_radii") {
            None => None,
            Some(Stored::Floats(v)) => Some(v.clone()),
            Some(other) => panic!("circle_radii: {other:?}"),
        },
        created_at: now,
        updated_at: now,
    }
}

fn fields() -> GeofenceFields {
    GeofenceFields {
        name: "ORG-geofence-nyc".to_string(),
        alert_type: AlertType::Both,
        categories: vec!["vehicles".to_string(), "couriers".to_string()],
        style: Style {
            fill_color: "#FF9900".to_string(),
            stroke_color: "#333".to_string(),
            fill_opacity: 0.35,
            stroke_width: 2.5,
        },
    }
}

fn polygons() -> Value {
    json!({
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "label": "midtown" },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [
                        [
                            [-73.99, 40.75],
                            [-73.97, 40.75],
                            [-73.97, 40.77],
                            [-73.99, 40.77],
                            [-73.99, 40.75]
                        ],
                        [[-73.985, 40.755], [-73.98, 40.755], [-73.98, 40.76], [-73.985, 40.755]]
                    ]
                }
            },
            {
                "type": "Feature",
                "properties": {},
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[0, 0], [0, 1], [1, 1], [1, 0], [0, 0]]]
                }
            }
        ]
    })
}

fn circles() -> Value {
    json!([
        { "center": [10, 20], "radius": 5 },
        { "center": [-122.4194, 37.7749], "radius": 1500.25 },
        { "center": [179.999999, -89.5], "radius": 0.5 }
    ])
}

#[test]
fn test_polygons_and_circles_survive_round_trip() {
    let polygons = polygons();
    let circles = circles();
    let shapes = validate_shapes(Some(&polygons), Some(&circles)).unwrap();
    let normalized = normalize_shapes(&shapes);

    let id = Uuid::new_v4();
    let stmt = build_insert(id, &fields(), &normalized).unwrap();
    let view = map_row(read_back(&stmt)).geofence;

    assert_eq!(view.id, id);
    assert_eq!(view.name, "ORG-geofence-nyc");
    assert_eq!(view.alert_type, AlertType::Both);
    assert_eq!(view.categories, vec!["vehicles", "couriers"]);
    assert_eq!(view.fill_opacity, 0.35);

    let shape = view.geometry.unwrap();
    assert_eq!(Some(&shape), normalized.polygon_shape.as_ref());
    assert_eq!(shape.coordinates.len(), 2);
    assert_eq!(shape.coordinates[0].len(), 2);
    assert_eq!(shape.coordinates[0][1][2], [-73.98, 40.76]);

    assert_eq!(
        view.circles.unwrap(),
        vec![
            Circle { center: [10.0, 20.0], radius: 5.0 },
            Circle { center: [-122.4194, 37.7749], radius: 1500.25 },
            Circle { center: [179.999999, -89.5], radius: 0.5 },
        ]
    );
}

#[test]
fn test_circle_only_zone_has_no_geometry() {
    let circles = circles();
    let shapes = validate_shapes(None, Some(&circles)).unwrap();
    let stmt = build_insert(Uuid::new_v4(), &fields(), &normalize_shapes(&shapes)).unwrap();

    assert!(!stmt.sql.contains("geometry,"));
    let view = map_row(read_back(&stmt)).geofence;
    assert!(view.geometry.is_none());
    assert_eq!(view.circles.map(|c| c.len()), Some(3));
}

#[test]
fn test_single_square_normalizes_to_one_polygon() {
    let polygons = json!({
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[0, 0], [0, 1], [1, 1], [1, 0], [0, 0]]]
            }
        }]
    });
    let shapes = validate_shapes(Some(&polygons), None).unwrap();
    let stmt = build_insert(Uuid::new_v4(), &fields(), &normalize_shapes(&shapes)).unwrap();

    let mapped = map_row(read_back(&stmt));
    let shape = mapped.geofence.geometry.unwrap();
    assert_eq!(shape.coordinates.len(), 1);
    assert_eq!(shape.coordinates[0].len(), 1);
    assert_eq!(shape.coordinates[0][0].len(), 5);
    assert!(mapped.geofence.circles.is_none());
}
