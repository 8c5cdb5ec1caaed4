use serde_json::{Map, Value};

use crate::error::{CompassError, Result};

pub const REQUIRED_SECTIONS: &[&str] = &[
    "executive_summary",
    "key_insights",
    "actionable_recommendations",
    "performance_metrics",
];

/// Check that the dashboard has every required section and that each
/// performance metric is a number in `[0.0, 1.0]`.
pub fn validate_dashboard(dashboard: &Map<String, Value>) -> Result<()> {
    for section in REQUIRED_SECTIONS {
        if !dashboard.contains_key(*section) {
            return Err(CompassError::Schema(format!(
                "Missing dashboard section: {section}"
            )));
        }
    }

    let metrics = dashboard
        .get("performance_metrics")
        .and_then(Value::as_object)
        .ok_or_else(|| CompassError::Schema("performance_metrics is not an object".into()))?;

    for (name, value) in metrics {
        let score = value.as_f64().ok_or_else(|| {
            CompassError::Schema(format!("Performance metric {name} is not numeric: {value}"))
        })?;
        if !(0.0..=1.0).contains(&score) {
            return Err(CompassError::Schema(format!(
                "Performance metric {name} out of range: {score}"
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dashboard(metrics: Value) -> Map<String, Value> {
        match json!({
            "executive_summary": {},
            "key_insights": {},
            "actionable_recommendations": {},
            "performance_metrics": metrics,
        }) {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn boundary_values_accepted() {
        assert!(validate_dashboard(&dashboard(json!({"a": 1.0, "b": 0.0, "c": 0.5}))).is_ok());
        assert!(validate_dashboard(&dashboard(json!({"a": 1, "b": 0}))).is_ok());
        assert!(validate_dashboard(&dashboard(json!({}))).is_ok());
    }

    #[test]
    fn out_of_range_rejected() {
        let err = validate_dashboard(&dashboard(json!({"talent_retention_risk": 1.5}))).unwrap_err();
        assert!(matches!(err, CompassError::Schema(_)));
        assert!(err.to_string().contains("talent_retention_risk"));
        assert!(validate_dashboard(&dashboard(json!({"x": -0.01}))).is_err());
    }

    #[test]
    fn non_numeric_rejected() {
        assert!(matches!(
            validate_dashboard(&dashboard(json!({"x": "high"}))),
            Err(CompassError::Schema(_))
        ));
        assert!(validate_dashboard(&dashboard(json!([0.5]))).is_err());
    }

    #[test]
    fn each_section_required() {
        for section in REQUIRED_SECTIONS {
            let mut d = dashboard(json!({}));
            d.remove(*section);
            let err = validate_dashboard(&d).unwrap_err();
            assert_eq!(err.to_string(), format!("Dashboard schema violation: Missing dashboard section: {section}"));
        }
    }
}
