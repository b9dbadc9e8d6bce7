//! Input validation helpers
//!
//! Scalar field rules for geofence payloads. Shape payloads are checked by
//! [`crate::geo`].

use std::sync::LazyLock;

use regex::Regex;
use shared::error::AppError;
use shared::models::{GeofenceCreate, GeofenceUpdate, Style, StyleUpdate};

/// Geofence names and category labels
pub const MAX_NAME_LEN: usize = 200;

static NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^ORG-[A-Za-z0-9]+-[A-Za-z0-9]+$").expect("static regex")
});

static HEX_COLOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#([A-Fa-f0-9]{6}|[A-Fa-f0-9]{3})$").expect("static regex")
});

fn invalid(field: &str, message: String) -> AppError {
    AppError::validation(message).with_detail("field", field)
}

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(invalid(field, format!("{field} must not be empty")));
    }
    let len = value.chars().count();
    if len > max_len {
        return Err(invalid(
            field,
            format!("{field} is too long ({len} chars, max {max_len})"),
        ));
    }
    Ok(())
}

/// `ORG-<org>-<label>`, alphanumeric segments
pub fn validate_name(name: &str) -> Result<(), AppError> {
    validate_required_text(name, "name", MAX_NAME_LEN)?;
    if !NAME_RE.is_match(name) {
        return Err(invalid(
            "name",
            "name must match the pattern ORG-<organization>-<label> (alphanumeric segments)"
                .to_string(),
        ));
    }
    Ok(())
}

pub fn validate_categories(categories: &[String]) -> Result<(), AppError> {
    if categories.is_empty() {
        return Err(invalid(
            "categories",
            "categories must contain at least one entry".to_string(),
        ));
    }
    for (index, category) in categories.iter().enumerate() {
        validate_required_text(category, &format!("categories[{index}]"), MAX_NAME_LEN)?;
    }
    Ok(())
}

pub fn validate_color(value: &str, field: &str) -> Result<(), AppError> {
    if !HEX_COLOR_RE.is_match(value) {
        return Err(invalid(
            field,
            format!("{field} must be a hex color (#RGB or #RRGGBB)"),
        ));
    }
    Ok(())
}

pub fn validate_opacity(value: f64) -> Result<(), AppError> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(invalid(
            "fillOpacity",
            "fillOpacity must be between 0 and 1".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_stroke_width(value: f64) -> Result<(), AppError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(invalid(
            "strokeWidth",
            "strokeWidth must be greater than 0".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_style(style: &Style) -> Result<(), AppError> {
    validate_color(&style.fill_color, "fillColor")?;
    validate_color(&style.stroke_color, "strokeColor")?;
    validate_opacity(style.fill_opacity)?;
    validate_stroke_width(style.stroke_width)
}

pub fn validate_style_update(style: &StyleUpdate) -> Result<(), AppError> {
    if let Some(color) = &style.fill_color {
        validate_color(color, "fillColor")?;
    }
    if let Some(color) = &style.stroke_color {
        validate_color(color, "strokeColor")?;
    }
    if let Some(opacity) = style.fill_opacity {
        validate_opacity(opacity)?;
    }
    if let Some(width) = style.stroke_width {
        validate_stroke_width(width)?;
    }
    Ok(())
}

/// Scalar fields of a create payload
pub fn validate_create(payload: &GeofenceCreate) -> Result<(), AppError> {
    validate_name(&payload.name)?;
    validate_categories(&payload.categories)?;
    validate_style(&payload.style)
}

/// Scalar fields of an update payload; absent fields are skipped
pub fn validate_update(payload: &GeofenceUpdate) -> Result<(), AppError> {
    if let Some(name) = &payload.name {
        validate_name(name)?;
    }
    if let Some(categories) = &payload.categories {
        validate_categories(categories)?;
    }
    if let Some(style) = &payload.style {
        validate_style_update(style)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::error::ErrorCode;
    use shared::models::AlertType;

    fn style() -> Style {
        Style {
            fill_color: "#FF9900".to_string(),
            stroke_color: "#000".to_string(),
            fill_opacity: 0.4,
            stroke_width: 2.0,
        }
    }

    #[test]
    fn test_name_pattern() {
        assert!(validate_name("ORG-acme-depot1").is_ok());
        assert!(validate_name("ORG-A1-B2").is_ok());

        for bad in ["", "org-acme-depot", "ORG-acme", "ORG-acme-depot-2", "ORG-ac me-x", "ORG--x"] {
            let err = validate_name(bad).unwrap_err();
            assert_eq!(err.code, ErrorCode::ValidationFailed, "{bad}");
        }
    }

    #[test]
    fn test_name_length_limit() {
        let long = format!("ORG-acme-{}", "a".repeat(MAX_NAME_LEN));
        let err = validate_name(&long).unwrap_err();
        assert!(err.message.contains("too long"));
    }

    #[test]
    fn test_text_length_counts_chars() {
        // 150 chars, 300 bytes
        let accented = "é".repeat(150);
        assert!(validate_required_text(&accented, "categories[0]", MAX_NAME_LEN).is_ok());

        let err = validate_required_text(&"é".repeat(201), "categories[0]", MAX_NAME_LEN)
            .unwrap_err();
        assert_eq!(err.message, "categories[0] is too long (201 chars, max 200)");
    }

    #[test]
    fn test_categories() {
        assert!(validate_categories(&["vehicles".to_string()]).is_ok());
        assert!(validate_categories(&[]).is_err());

        let err = validate_categories(&["ok".to_string(), "  ".to_string()]).unwrap_err();
        assert_eq!(err.message, "categories[1] must not be empty");
    }

    #[test]
    fn test_colors() {
        for good in ["#fff", "#FFF", "#a1B2c3"] {
            assert!(validate_color(good, "fillColor").is_ok(), "{good}");
        }
        for bad in ["fff", "#ffff", "#gggggg", "#12345", "red"] {
            assert!(validate_color(bad, "fillColor").is_err(), "{bad}");
        }
    }

    #[test]
    fn test_opacity_and_stroke_bounds() {
        assert!(validate_opacity(0.0).is_ok());
        assert!(validate_opacity(1.0).is_ok());
        assert!(validate_opacity(1.01).is_err());
        assert!(validate_opacity(-0.1).is_err());
        assert!(validate_opacity(f64::NAN).is_err());

        assert!(validate_stroke_width(0.5).is_ok());
        assert!(validate_stroke_width(0.0).is_err());
        assert!(validate_stroke_width(f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_create() {
        let mut payload = GeofenceCreate {
            name: "ORG-acme-yard".to_string(),
            alert_type: AlertType::Enter,
            categories: vec!["trucks".to_string()],
            style: style(),
            geojson: None,
            circles: None,
        };
        assert!(validate_create(&payload).is_ok());

        payload.style.fill_opacity = 2.0;
        let err = validate_create(&payload).unwrap_err();
        assert_eq!(
            err.details.unwrap().get("field").and_then(|v| v.as_str()),
            Some("fillOpacity")
        );
    }

    #[test]
    fn test_validate_update_checks_present_fields_only() {
        assert!(validate_update(&GeofenceUpdate::default()).is_ok());

        let update = GeofenceUpdate {
            style: Some(StyleUpdate {
                stroke_color: Some("black".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(validate_update(&update).is_err());

        let update = GeofenceUpdate {
            name: Some("ORG-acme-west".to_string()),
            categories: Some(vec!["vans".to_string()]),
            ..Default::default()
        };
        assert!(validate_update(&update).is_ok());
    }
}
