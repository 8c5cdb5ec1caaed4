pub mod table;

use anyhow::Result;
use serde::Serialize;

/// How command results are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Yaml,
}

impl OutputFormat {
    pub fn from_flags(json: bool, yaml: bool) -> Self {
        if json {
            OutputFormat::Json
        } else if yaml {
            OutputFormat::Yaml
        } else {
            OutputFormat::Table
        }
    }

    pub fn is_structured(&self) -> bool {
        *self != OutputFormat::Table
    }
}

/// Render a serializable value as pretty JSON or YAML.
pub fn render<T: Serialize>(format: OutputFormat, value: &T) -> Result<String> {
    match format {
        OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?.trim_end().to_string()),
        _ => Ok(serde_json::to_string_pretty(value)?),
    }
}

/// Print a serializable value in the structured format to stdout.
pub fn print_structured<T: Serialize>(format: OutputFormat, value: &T) -> Result<()> {
    println!("{}", render(format, value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn flags_pick_format() {
        assert_eq!(OutputFormat::from_flags(true, true), OutputFormat::Json);
        assert_eq!(OutputFormat::from_flags(false, true), OutputFormat::Yaml);
        assert!(!OutputFormat::from_flags(false, false).is_structured());
    }

    #[test]
    fn renders_json_and_yaml() {
        let value = json!({"status": "success"});
        assert_eq!(
            render(OutputFormat::Json, &value).unwrap(),
            "{\n  \"status\": \"success\"\n}"
        );
        assert_eq!(render(OutputFormat::Yaml, &value).unwrap(), "status: success");
    }
}
