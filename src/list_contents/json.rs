//! JSON representation of serialized lists.

use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::error::{Result, ValidationError};
use crate::utils::strings;
use crate::utils::version::check_major_version_1;

struct Walker {
    externals: HashSet<u64>,
    num_external: u64,
}

/// Validate a parsed list document against the expected number of external
/// references.  Returns the length of the top-level list.
pub fn validate(parsed: &Value, num_external: u64) -> Result<u64> {
    let Value::Object(top) = parsed else {
        return Err(ValidationError::structure(
            "expected the list payload to be a JSON object".to_string(),
        ));
    };

    if let Some(version) = top.get("version") {
        let Value::String(vstring) = version else {
            return Err(ValidationError::structure(
                "expected 'version' property to be a JSON string".to_string(),
            ));
        };
        check_major_version_1(vstring)?;
    }

    let mut walker = Walker {
        externals: HashSet::new(),
        num_external,
    };

    if node_type(top)? != "list" {
        return Err(ValidationError::structure(
            "expected the top-level node to be a list".to_string(),
        ));
    }
    let length = walker.walk_list(top)?;

    if walker.externals.len() as u64 != num_external {
        return Err(ValidationError::value(format!(
            "fewer 'external' references than subdirectories (got {}, expected {})",
            walker.externals.len(),
            num_external
        )));
    }

    Ok(length)
}

/// Read and validate a gzipped JSON list payload from disk.
pub fn validate_file(path: &std::path::Path, num_external: u64) -> Result<u64> {
    let reader = crate::utils::files::open_gzip(path)?;
    let parsed: Value = serde_json::from_reader(reader)?;
    validate(&parsed, num_external)
}

fn node_type(node: &Map<String, Value>) -> Result<&str> {
    match node.get("type") {
        Some(Value::String(s)) => Ok(s),
        Some(_) => Err(ValidationError::structure(
            "expected 'type' property to be a JSON string".to_string(),
        )),
        None => Err(ValidationError::structure(
            "expected a 'type' property on every node".to_string(),
        )),
    }
}

fn values_array(node: &Map<String, Value>) -> Result<&Vec<Value>> {
    match node.get("values") {
        Some(Value::Array(values)) => Ok(values),
        Some(_) => Err(ValidationError::structure(
            "expected 'values' property to be a JSON array".to_string(),
        )),
        None => Err(ValidationError::structure(
            "expected a 'values' property".to_string(),
        )),
    }
}

fn check_names(node: &Map<String, Value>, expected: usize) -> Result<()> {
    let Some(names) = node.get("names") else {
        return Ok(());
    };
    let Value::Array(names) = names else {
        return Err(ValidationError::structure(
            "expected 'names' property to be a JSON array".to_string(),
        ));
    };
    if names.len() != expected {
        return Err(ValidationError::value(
            "'names' and 'values' should have the same length".to_string(),
        ));
    }
    if names.iter().any(|x| !x.is_string()) {
        return Err(ValidationError::structure(
            "expected 'names' to be an array of strings".to_string(),
        ));
    }
    Ok(())
}

impl Walker {
    fn walk_list(&mut self, node: &Map<String, Value>) -> Result<u64> {
        let values = values_array(node)?;
        check_names(node, values.len())?;
        for value in values {
            let Value::Object(child) = value else {
                return Err(ValidationError::structure(
                    "expected every list element to be a JSON object".to_string(),
                ));
            };
            self.walk(child)?;
        }
        Ok(values.len() as u64)
    }

    fn walk(&mut self, node: &Map<String, Value>) -> Result<()> {
        match node_type(node)? {
            "list" => {
                self.walk_list(node)?;
            }
            "nothing" => {}
            "external" => {
                let index = match node.get("index") {
                    Some(Value::Number(n)) => n.as_u64().ok_or_else(|| {
                        ValidationError::value(
                            "expected 'index' to be a non-negative integer".to_string(),
                        )
                    })?,
                    _ => {
                        return Err(ValidationError::structure(
                            "expected an 'index' property for external nodes".to_string(),
                        ));
                    }
                };
                if index >= self.num_external {
                    return Err(ValidationError::value(format!(
                        "external index {} is out of range",
                        index
                    )));
                }
                if !self.externals.insert(index) {
                    return Err(ValidationError::value(format!(
                        "external index {} is referenced more than once",
                        index
                    )));
                }
            }
            "integer" => self.walk_integer(node)?,
            "number" => self.walk_number(node)?,
            "boolean" => self.walk_boolean(node)?,
            "string" => self.walk_string(node)?,
            "factor" => self.walk_factor(node)?,
            other => {
                return Err(ValidationError::value(format!(
                    "unknown node type '{}'",
                    other
                )));
            }
        }
        Ok(())
    }

    fn walk_integer(&mut self, node: &Map<String, Value>) -> Result<()> {
        let values = values_array(node)?;
        check_names(node, values.len())?;
        for value in values {
            match value {
                Value::Null => {}
                Value::Number(n) => {
                    let in_range = n
                        .as_i64()
                        .map(|x| (i32::MIN as i64..=i32::MAX as i64).contains(&x))
                        .unwrap_or(false);
                    if !in_range {
                        return Err(ValidationError::value(
                            "integer value does not fit inside a 32-bit signed integer"
                                .to_string(),
                        ));
                    }
                }
                _ => {
                    return Err(ValidationError::value(
                        "expected integer values to be JSON numbers".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }

    fn walk_number(&mut self, node: &Map<String, Value>) -> Result<()> {
        let values = values_array(node)?;
        check_names(node, values.len())?;
        for value in values {
            match value {
                Value::Null | Value::Number(_) => {}
                // IEEE specials have no JSON representation and are stored
                // as strings.
                Value::String(s) if matches!(s.as_str(), "NaN" | "Inf" | "-Inf") => {}
                _ => {
                    return Err(ValidationError::value(
                        "expected number values to be JSON numbers".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }

    fn walk_boolean(&mut self, node: &Map<String, Value>) -> Result<()> {
        let values = values_array(node)?;
        check_names(node, values.len())?;
        for value in values {
            if !matches!(value, Value::Null | Value::Bool(_)) {
                return Err(ValidationError::value(
                    "expected boolean values to be JSON booleans".to_string(),
                ));
            }
        }
        Ok(())
    }

    fn walk_string(&mut self, node: &Map<String, Value>) -> Result<()> {
        let values = values_array(node)?;
        check_names(node, values.len())?;

        let format = match node.get("format") {
            None => "none",
            Some(Value::String(s)) => s.as_str(),
            Some(_) => {
                return Err(ValidationError::structure(
                    "expected 'format' property to be a JSON string".to_string(),
                ));
            }
        };

        for value in values {
            match value {
                Value::Null => {}
                Value::String(s) => match format {
                    "none" => {}
                    "date" => {
                        if !strings::is_date(s) {
                            return Err(ValidationError::value(format!(
                                "expected a date-formatted string (got '{}')",
                                s
                            )));
                        }
                    }
                    "date-time" => {
                        if !strings::is_rfc3339(s) {
                            return Err(ValidationError::value(format!(
                                "expected a date/time-formatted string (got '{}')",
                                s
                            )));
                        }
                    }
                    other => {
                        return Err(ValidationError::value(format!(
                            "unsupported format '{}'",
                            other
                        )));
                    }
                },
                _ => {
                    return Err(ValidationError::value(
                        "expected string values to be JSON strings".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }

    fn walk_factor(&mut self, node: &Map<String, Value>) -> Result<()> {
        let levels = match node.get("levels") {
            Some(Value::Array(levels)) => levels,
            _ => {
                return Err(ValidationError::structure(
                    "expected a 'levels' array for factor nodes".to_string(),
                ));
            }
        };
        let mut present = HashSet::with_capacity(levels.len());
        for level in levels {
            let Value::String(level) = level else {
                return Err(ValidationError::structure(
                    "expected 'levels' to be an array of strings".to_string(),
                ));
            };
            if !present.insert(level.as_str()) {
                return Err(ValidationError::value(format!(
                    "duplicated factor level '{}'",
                    level
                )));
            }
        }

        if let Some(ordered) = node.get("ordered") {
            if !ordered.is_boolean() {
                return Err(ValidationError::structure(
                    "expected 'ordered' property to be a JSON boolean".to_string(),
                ));
            }
        }

        let values = values_array(node)?;
        check_names(node, values.len())?;
        for value in values {
            match value {
                Value::Null => {}
                Value::Number(n) => {
                    let in_range = n
                        .as_u64()
                        .map(|x| x < levels.len() as u64)
                        .unwrap_or(false);
                    if !in_range {
                        return Err(ValidationError::value(
                            "expected factor codes to be less than the number of levels"
                                .to_string(),
                        ));
                    }
                }
                _ => {
                    return Err(ValidationError::value(
                        "expected factor codes to be JSON numbers".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::validate;

    fn run(payload: &str, num_external: u64) -> crate::error::Result<u64> {
        let parsed: serde_json::Value = serde_json::from_str(payload).unwrap();
        validate(&parsed, num_external)
    }

    #[test]
    fn empty_list() {
        assert_eq!(run(r#"{ "type": "list", "values": [] }"#, 0).unwrap(), 0);
    }

    #[test]
    fn nested() {
        let payload = r#"{
            "type": "list",
            "names": ["counts", "meta", "missing"],
            "values": [
                { "type": "integer", "values": [1, 2, null] },
                { "type": "list", "values": [
                    { "type": "string", "format": "date", "values": ["2021-05-01", null] },
                    { "type": "number", "values": [1.5, "NaN", "-Inf"] },
                    { "type": "factor", "levels": ["a", "b"], "values": [0, 1, null], "ordered": true }
                ] },
                { "type": "nothing" }
            ]
        }"#;
        assert_eq!(run(payload, 0).unwrap(), 3);
    }

    #[test]
    fn externals_consumed_exactly() {
        let payload = r#"{ "type": "list", "values": [
            { "type": "external", "index": 0 },
            { "type": "external", "index": 1 }
        ] }"#;
        assert_eq!(run(payload, 2).unwrap(), 2);

        let err = run(payload, 3).unwrap_err();
        assert!(err.to_string().contains("fewer 'external' references"));

        let dup = r#"{ "type": "list", "values": [
            { "type": "external", "index": 0 },
            { "type": "external", "index": 0 }
        ] }"#;
        let err = run(dup, 2).unwrap_err();
        assert!(err.to_string().contains("referenced more than once"));
    }

    #[rstest::rstest]
    #[case(r#"{ "type": "integer", "values": [] }"#, "top-level node to be a list")]
    #[case(
        r#"{ "type": "list", "values": [ { "type": "integer", "values": [2147483648] } ] }"#,
        "32-bit signed integer"
    )]
    #[case(
        r#"{ "type": "list", "values": [ { "type": "whatever" } ] }"#,
        "unknown node type 'whatever'"
    )]
    #[case(
        r#"{ "type": "list", "values": [ { "type": "factor", "levels": ["a", "a"], "values": [] } ] }"#,
        "duplicated factor level"
    )]
    #[case(
        r#"{ "type": "list", "values": [ { "type": "string", "format": "date", "values": ["x"] } ] }"#,
        "date-formatted"
    )]
    fn failures(#[case] payload: &str, #[case] msg: &str) {
        let err = run(payload, 0).unwrap_err();
        assert!(err.to_string().contains(msg), "got: {}", err);
    }
}
