use crate::platforms::Target;
use crate::schedule::ImageSize;
use std::time::Duration;

#[derive(serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub targets: Vec<Target>,
    pub client: ClientSettings,
    pub cold_start: ColdStartSettings,
    pub latency_breakdown: LatencyBreakdownSettings,
}

#[derive(serde::Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct ClientSettings {
    // No timeout unless configured, the probes wait as long as the platform takes.
    pub timeout_secs: Option<u64>,
}

#[derive(serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ColdStartSettings {
    pub initial_wait_secs: u64,
    pub max_wait_secs: u64,
    pub image_url: String,
    pub output_path: String,
    pub elapsed_decimals: Option<u32>,
}

#[derive(serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct LatencyBreakdownSettings {
    pub image_sizes: Vec<ImageSize>,
    pub image_url_template: String,
    pub output_path: String,
    pub elapsed_decimals: Option<u32>,
}

impl Settings {
    pub const ENV_PREFIX: &'static str = "COLDPROBE";

    pub fn from_configuration() -> Result<Self, config::ConfigError> {
        // Initialize our configuration reader
        let settings = config::Config::builder()
            // Add configuration values from an optional file named `configuration`.
            // It will look for any top-level file with an extension
            // that `config` knows how to parse: yaml, json, toml, etc.
            .add_source(config::File::with_name("configuration").required(false))
            // Environment overrides, e.g. COLDPROBE_COLD_START__MAX_WAIT_SECS=180
            .add_source(
                config::Environment::with_prefix(Self::ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;
        Self::from_config(settings)
    }

    // Try to convert the configuration values it reads into
    // our Settings type
    pub fn from_config(config: config::Config) -> Result<Self, config::ConfigError> {
        let settings: Self = config.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if let Some(size) = self
            .latency_breakdown
            .image_sizes
            .iter()
            .find(|s| s.width == 0 || s.height == 0)
        {
            return Err(config::ConfigError::Message(format!(
                "Image size {} must have a positive width and height.",
                size
            )));
        }
        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            targets: vec![
                Target::new(
                    "Azure",
                    "https://vin-image-processing-workflow.azurewebsites.net",
                    "/api/classify_image",
                ),
                Target::new(
                    "OpenFaaS",
                    "http://20.26.125.107:8080",
                    "/function/process-image",
                ),
            ],
            client: ClientSettings::default(),
            cold_start: ColdStartSettings::default(),
            latency_breakdown: LatencyBreakdownSettings::default(),
        }
    }
}

impl ClientSettings {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl Default for ColdStartSettings {
    fn default() -> Self {
        Self {
            initial_wait_secs: 60,
            max_wait_secs: 1920,
            image_url: "https://picsum.photos/400/500".to_string(),
            output_path: "cold_start_times.csv".to_string(),
            elapsed_decimals: None,
        }
    }
}

impl Default for LatencyBreakdownSettings {
    fn default() -> Self {
        let image_sizes = [256, 512, 1024, 1280, 1920, 2160, 2560, 2880, 3200]
            .iter()
            .map(|&side| ImageSize::square(side))
            .collect();
        Self {
            image_sizes,
            image_url_template: "https://picsum.photos/{width}/{height}".to_string(),
            output_path: "latency_breakdown_results.csv".to_string(),
            elapsed_decimals: Some(2),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_have_azure_and_openfaas_targets() {
        let settings = Settings::default();
        let names: Vec<&str> = settings.targets.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Azure", "OpenFaaS"]);
        assert_eq!(
            settings.targets[1].endpoint(),
            "http://20.26.125.107:8080/function/process-image"
        );
    }

    #[test]
    fn default_cold_start_settings_cover_one_to_thirty_two_minutes() {
        let cold_start = ColdStartSettings::default();
        assert_eq!(cold_start.initial_wait_secs, 60);
        assert_eq!(cold_start.max_wait_secs, 1920);
        assert_eq!(cold_start.elapsed_decimals, None);
    }

    #[test]
    fn default_latency_breakdown_sweeps_nine_ascending_sizes() {
        let latency = LatencyBreakdownSettings::default();
        assert_eq!(latency.image_sizes.len(), 9);
        assert_eq!(latency.image_sizes.first(), Some(&ImageSize::square(256)));
        assert_eq!(latency.image_sizes.last(), Some(&ImageSize::square(3200)));
        assert!(latency
            .image_sizes
            .windows(2)
            .all(|w| w[0].width < w[1].width));
        assert_eq!(latency.elapsed_decimals, Some(2));
    }

    #[test]
    fn client_timeout_is_none_by_default() {
        assert_eq!(ClientSettings::default().timeout(), None);
        let client = ClientSettings {
            timeout_secs: Some(30),
        };
        assert_eq!(client.timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn partial_config_keeps_defaults_for_missing_fields() {
        let config = config::Config::builder()
            .set_override("cold_start.max_wait_secs", 180i64)
            .expect("Failed to set max wait.")
            .build()
            .expect("Failed to build config.");
        let settings = Settings::from_config(config).expect("Failed to deserialize settings.");
        assert_eq!(settings.cold_start.max_wait_secs, 180);
        assert_eq!(settings.cold_start.initial_wait_secs, 60);
        assert_eq!(settings.targets.len(), 2);
    }

    #[test]
    fn env_var_overrides_nested_setting() {
        let key = "COLDPROBE_COLD_START__INITIAL_WAIT_SECS";
        std::env::set_var(key, "30");
        let settings = Settings::from_configuration();
        std::env::remove_var(key);

        let settings = settings.expect("Failed to read configuration.");
        assert_eq!(settings.cold_start.initial_wait_secs, 30);
        assert_eq!(settings.cold_start.max_wait_secs, 1920);
        assert_eq!(settings.latency_breakdown.image_sizes.len(), 9);
    }

    #[test]
    fn validate_rejects_zero_image_dimensions() {
        let mut settings = Settings::default();
        assert!(settings.validate().is_ok());

        settings.latency_breakdown.image_sizes.push(ImageSize::new(0, 512));
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("0x512"));

        settings.latency_breakdown.image_sizes = vec![ImageSize::new(256, 0)];
        assert!(settings.validate().is_err());
    }

    #[test]
    fn zero_sized_image_in_config_fails_to_load() {
        let config = config::Config::builder()
            .add_source(config::File::from_str(
                r#"
                [latency_breakdown]
                image_sizes = [{ width = 256, height = 256 }, { width = 0, height = 0 }]
                "#,
                config::FileFormat::Toml,
            ))
            .build()
            .expect("Failed to build config.");
        assert!(Settings::from_config(config).is_err());
    }
}
