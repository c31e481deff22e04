use std::{collections::HashMap, fs, path::Path};

#[derive(Debug, Clone)]
pub struct Settings {
    pub api_base_url: String,
    pub api_key: String,
    pub storage_bucket: String,
    pub report_collection: String,
    /// 0 disables the per-operation timeout.
    pub request_timeout_seconds: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:54321".into(),
            api_key: "dev-anon-key".into(),
            storage_bucket: "inspection-photos".into(),
            report_collection: "inspection_reports".into(),
            request_timeout_seconds: 30,
        }
    }
}

pub fn load_settings(path: &Path) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(&raw) {
            if let Some(v) = file_cfg.get("api_base_url") {
                settings.api_base_url = v.clone();
            }
            if let Some(v) = file_cfg.get("api_key") {
                settings.api_key = v.clone();
            }
            if let Some(v) = file_cfg.get("storage_bucket") {
                settings.storage_bucket = v.clone();
            }
            if let Some(v) = file_cfg.get("report_collection") {
                settings.report_collection = v.clone();
            }
            if let Some(v) = file_cfg.get("request_timeout_seconds") {
                if let Ok(parsed) = v.parse::<u64>() {
                    settings.request_timeout_seconds = parsed;
                }
            }
        }
    }

    if let Ok(v) = std::env::var("API_BASE_URL") {
        settings.api_base_url = v;
    }
    if let Ok(v) = std::env::var("APP__API_BASE_URL") {
        settings.api_base_url = v;
    }

    if let Ok(v) = std::env::var("API_KEY") {
        settings.api_key = v;
    }
    if let Ok(v) = std::env::var("APP__API_KEY") {
        settings.api_key = v;
    }

    if let Ok(v) = std::env::var("APP__STORAGE_BUCKET") {
        settings.storage_bucket = v;
    }

    if let Ok(v) = std::env::var("APP__REPORT_COLLECTION") {
        settings.report_collection = v;
    }

    if let Ok(v) = std::env::var("APP__REQUEST_TIMEOUT_SECONDS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.request_timeout_seconds = parsed;
        }
    }

    settings
}

#[cfg(test)]
mod tests {
    use std::{
        env,
        time::{SystemTime, UNIX_EPOCH},
    };

    use super::*;

    #[test]
    fn missing_settings_file_yields_defaults() {
        let settings = load_settings(Path::new("./does-not-exist.toml"));
        assert_eq!(settings.api_base_url, "http://127.0.0.1:54321");
        assert_eq!(settings.report_collection, "inspection_reports");
        assert_eq!(settings.request_timeout_seconds, 30);
    }

    #[test]
    fn settings_file_overrides_defaults() {
        let suffix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos();
        let path = env::temp_dir().join(format!("survey_cli_settings_{suffix}.toml"));
        fs::write(
            &path,
            concat!(
                "api_base_url = \"https://project.example.supabase.co\"\n",
                "storage_bucket = \"photos-prod\"\n",
                "request_timeout_seconds = \"120\"\n",
            ),
        )
        .expect("write settings");

        let settings = load_settings(&path);
        fs::remove_file(&path).expect("cleanup");

        assert_eq!(settings.api_base_url, "https://project.example.supabase.co");
        assert_eq!(settings.storage_bucket, "photos-prod");
        assert_eq!(settings.request_timeout_seconds, 120);
        assert_eq!(settings.api_key, "dev-anon-key");
    }
}
