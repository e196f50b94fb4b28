//! Synthesis configuration.

/// Settings accepted by the synthesis entry points.
#[derive(Debug, Clone)]
pub struct SynthesisSettings {
    /// Module to synthesize. Falls back to `main`, then to the first
    /// declared module.
    pub main_module: Option<String>,
    /// Format of generated line names; `{name}`, `{array}` and `{index}`
    /// are substituted per line.
    pub variable_name_format: String,
}

impl Default for SynthesisSettings {
    fn default() -> Self {
        Self {
            main_module: None,
            variable_name_format: "{name}{array}.{index}".into(),
        }
    }
}

impl SynthesisSettings {
    /// Render the name of bit `index` of a variable.
    pub fn line_name(&self, name: &str, array: &str, index: u32) -> String {
        self.variable_name_format
            .replace("{name}", name)
            .replace("{array}", array)
            .replace("{index}", &index.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_line_name() {
        let settings = SynthesisSettings::default();
        assert_eq!(settings.line_name("a", "", 3), "a.3");
        assert_eq!(settings.line_name("m", "[1][2]", 0), "m[1][2].0");
    }

    #[test]
    fn test_custom_format() {
        let settings = SynthesisSettings {
            variable_name_format: "{index}:{name}".into(),
            ..Default::default()
        };
        assert_eq!(settings.line_name("x", "", 7), "7:x");
    }
}
