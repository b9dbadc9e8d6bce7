//! Parameterized write statements for the `geofences` table
//!
//! [`StatementBuilder`] collects `(column, expression)` assignments and the
//! values they bind, and renders SQL text only in [`StatementBuilder::into_insert`]
//! / [`StatementBuilder::into_update`]. Placeholders are numbered from the
//! parameter list itself, so a radius array taking several slots cannot shift
//! the numbering of later columns. Values never appear in the SQL text.

use serde::Serialize;
use shared::models::{AlertType, MultiPoint, MultiPolygon, Style};
use shared::patch::Patch;
use sqlx::Postgres;
use sqlx::postgres::PgArguments;
use sqlx::query::Query;
use uuid::Uuid;

use crate::geo::NormalizedShapes;

/// Spatial reference of every stored geometry (WGS 84)
pub const SRID: i32 = 4326;

pub const TABLE: &str = "geofences";
const ID_COLUMN: &str = "id";

/// A bindable statement parameter
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Text(String),
    TextArray(Vec<String>),
    Float(f64),
    Uuid(Uuid),
}

/// Right-hand side of one column assignment
#[derive(Debug, Clone, Copy, PartialEq)]
enum Expr {
    /// `$i`
    Param(usize),
    /// GeoJSON text in `$i` converted to native geometry
    Geometry(usize),
    /// `ARRAY[$first, ..]::float8[]`
    FloatArray { first: usize, len: usize },
    Null,
    Now,
}

impl Expr {
    fn render(self) -> String {
        match self {
            Expr::Param(i) => format!("${i}"),
            Expr::Geometry(i) => format!("ST_SetSRID(ST_GeomFromGeoJSON(${i}), {SRID})"),
            Expr::FloatArray { first, len } => {
                let slots: Vec<String> = (first..first + len).map(|i| format!("${i}")).collect();
                format!("ARRAY[{}]::float8[]", slots.join(", "))
            }
            Expr::Null => "NULL".to_string(),
            Expr::Now => "NOW()".to_string(),
        }
    }
}

/// Rendered SQL plus its parameters in placeholder order
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<SqlValue>,
}

impl Statement {
    /// Bind every parameter, in order, onto a sqlx query
    pub fn bind(&self) -> Query<'_, Postgres, PgArguments> {
        let mut query = sqlx::query(&self.sql);
        for param in &self.params {
            query = match param {
                SqlValue::Text(s) => query.bind(s),
                SqlValue::TextArray(v) => query.bind(v),
                SqlValue::Float(f) => query.bind(*f),
                SqlValue::Uuid(id) => query.bind(*id),
            };
        }
        query
    }
}

#[derive(Debug, Default)]
pub struct StatementBuilder {
    assignments: Vec<(&'static str, Expr)>,
    params: Vec<SqlValue>,
}

impl StatementBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index the next pushed parameter will receive
    fn next_index(&self) -> usize {
        self.params.len() + 1
    }

    fn push_param(&mut self, value: SqlValue) -> usize {
        let index = self.next_index();
        self.params.push(value);
        index
    }

    /// `column = $i`
    pub fn value(&mut self, column: &'static str, value: SqlValue) -> &mut Self {
        let index = self.push_param(value);
        self.assignments.push((column, Expr::Param(index)));
        self
    }

    /// `column = ST_SetSRID(ST_GeomFromGeoJSON($i), 4326)`
    pub fn geometry<T: Serialize>(
        &mut self,
        column: &'static str,
        shape: &T,
    ) -> Result<&mut Self, serde_json::Error> {
        let text = serde_json::to_string(shape)?;
        let index = self.push_param(SqlValue::Text(text));
        self.assignments.push((column, Expr::Geometry(index)));
        Ok(self)
    }

    /// `column = ARRAY[$i, $i+1, ..]::float8[]`, one parameter per element
    pub fn float_array(&mut self, column: &'static str, values: &[f64]) -> &mut Self {
        let first = self.next_index();
        for value in values {
            self.push_param(SqlValue::Float(*value));
        }
        self.assignments.push((
            column,
            Expr::FloatArray {
                first,
                len: values.len(),
            },
        ));
        self
    }

    pub fn null(&mut self, column: &'static str) -> &mut Self {
        self.assignments.push((column, Expr::Null));
        self
    }

    pub fn now(&mut self, column: &'static str) -> &mut Self {
        self.assignments.push((column, Expr::Now));
        self
    }

    /// Geometry column under tri-state semantics
    pub fn geometry_patch<T: Serialize>(
        &mut self,
        column: &'static str,
        patch: &Patch<T>,
    ) -> Result<&mut Self, serde_json::Error> {
        match patch {
            Patch::Unset => Ok(self),
            Patch::Clear => Ok(self.null(column)),
            Patch::Set(shape) => self.geometry(column, shape),
        }
    }

    /// Float-array column under tri-state semantics
    pub fn float_array_patch(
        &mut self,
        column: &'static str,
        patch: &Patch<Vec<f64>>,
    ) -> &mut Self {
        match patch {
            Patch::Unset => self,
            Patch::Clear => self.null(column),
            Patch::Set(values) => self.float_array(column, values),
        }
    }

    /// `INSERT INTO table (cols.., id) VALUES (exprs.., $last)`
    pub fn into_insert(mut self, table: &str, id: Uuid) -> Statement {
        let id_index = self.push_param(SqlValue::Uuid(id));
        let (mut columns, mut values): (Vec<&str>, Vec<String>) = self
            .assignments
            .iter()
            .map(|(column, expr)| (*column, expr.render()))
            .unzip();
        columns.push(ID_COLUMN);
        values.push(Expr::Param(id_index).render());

        Statement {
            sql: format!(
                "INSERT INTO {table} ({}) VALUES ({})",
                columns.join(", "),
                values.join(", ")
            ),
            params: self.params,
        }
    }

    /// `UPDATE table SET col = expr, .. WHERE id = $last`
    pub fn into_update(mut self, table: &str, id: Uuid) -> Statement {
        let id_index = self.push_param(SqlValue::Uuid(id));
        let set: Vec<String> = self
            .assignments
            .iter()
            .map(|(column, expr)| format!("{column} = {}", expr.render()))
            .collect();

        Statement {
            sql: format!(
                "UPDATE {table} SET {} WHERE {ID_COLUMN} = {}",
                set.join(", "),
                Expr::Param(id_index).render()
            ),
            params: self.params,
        }
    }
}

// ============================================================================
// Geofence statements
// ============================================================================

/// Scalar columns of a new geofence, already validated
#[derive(Debug, Clone, PartialEq)]
pub struct GeofenceFields {
    pub name: String,
    pub alert_type: AlertType,
    pub categories: Vec<String>,
    pub style: Style,
}

/// Column changes of an update
///
/// Scalars are absent-or-set. Shape columns are tri-state; keeping centers
/// and radii consistent is the caller's job.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeofencePatch {
    pub name: Option<String>,
    pub alert_type: Option<AlertType>,
    pub categories: Option<Vec<String>>,
    pub fill_color: Option<String>,
    pub stroke_color: Option<String>,
    pub fill_opacity: Option<f64>,
    pub stroke_width: Option<f64>,
    pub geometry: Patch<MultiPolygon>,
    pub circle_centers: Patch<MultiPoint>,
    pub circle_radii: Patch<Vec<f64>>,
}

pub fn build_insert(
    id: Uuid,
    fields: &GeofenceFields,
    shapes: &NormalizedShapes,
) -> Result<Statement, serde_json::Error> {
    let mut b = StatementBuilder::new();
    b.value("name", SqlValue::Text(fields.name.clone()))
        .value("alert_type", SqlValue::Text(fields.alert_type.to_string()))
        .value("categories", SqlValue::TextArray(fields.categories.clone()))
        .value("fill_color", SqlValue::Text(fields.style.fill_color.clone()))
        .value("stroke_color", SqlValue::Text(fields.style.stroke_color.clone()))
        .value("fill_opacity", SqlValue::Float(fields.style.fill_opacity))
        .value("stroke_width", SqlValue::Float(fields.style.stroke_width));

    // Absent shapes leave their columns out entirely
    if let Some(shape) = &shapes.polygon_shape {
        b.geometry("geometry", shape)?;
    }
    if let Some(centers) = &shapes.centers {
        b.geometry("circle_centers", centers)?;
    }
    if let Some(radii) = &shapes.radii {
        b.float_array("circle_radii", radii);
    }
    b.now("updated_at");

    Ok(b.into_insert(TABLE, id))
}

pub fn build_update(id: Uuid, patch: &GeofencePatch) -> Result<Statement, serde_json::Error> {
    let mut b = StatementBuilder::new();
    if let Some(name) = &patch.name {
        b.value("name", SqlValue::Text(name.clone()));
    }
    if let Some(alert_type) = patch.alert_type {
        b.value("alert_type", SqlValue::Text(alert_type.to_string()));
    }
    if let Some(categories) = &patch.categories {
        b.value("categories", SqlValue::TextArray(categories.clone()));
    }
    if let Some(color) = &patch.fill_color {
        b.value("fill_color", SqlValue::Text(color.clone()));
    }
    if let Some(color) = &patch.stroke_color {
        b.value("stroke_color", SqlValue::Text(color.clone()));
    }
    if let Some(opacity) = patch.fill_opacity {
        b.value("fill_opacity", SqlValue::Float(opacity));
    }
    if let Some(width) = patch.stroke_width {
        b.value("stroke_width", SqlValue::Float(width));
    }

    b.geometry_patch("geometry", &patch.geometry)?
        .geometry_patch("circle_centers", &patch.circle_centers)?
        .float_array_patch("circle_radii", &patch.circle_radii)
        .now("updated_at");

    Ok(b.into_update(TABLE, id))
}
