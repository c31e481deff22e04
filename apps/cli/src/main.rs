use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use anyhow::{anyhow, Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use shared::{
    domain::InspectionFields,
    error::{StoreError, SubmissionError},
    schema,
};
use stores::{HttpBlobStore, HttpRecordStore};
use survey_core::SurveySession;

mod config;
mod images;

#[derive(Parser, Debug)]
struct Cli {
    /// Settings file; environment variables override its values.
    #[arg(long, default_value = "survey.toml")]
    settings: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Submit one inspection report from a form file and a photos directory.
    Submit {
        /// TOML file with the scalar answers (camelCase column names).
        #[arg(long)]
        form: PathBuf,
        /// Directory with one subdirectory per photo bucket.
        #[arg(long)]
        photos_dir: Option<PathBuf>,
    },
    /// Print the declared record-store column set.
    Columns,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let cli = Cli::parse();

    match cli.command {
        Command::Columns => {
            for column in schema::REPORT_COLUMNS {
                println!("{column}");
            }
            Ok(())
        }
        Command::Submit { form, photos_dir } => {
            submit(&cli.settings, &form, photos_dir.as_deref()).await
        }
    }
}

async fn submit(settings_path: &Path, form_path: &Path, photos_dir: Option<&Path>) -> Result<()> {
    let settings = config::load_settings(settings_path);

    let raw_form = fs::read_to_string(form_path)
        .with_context(|| format!("failed to read form file '{}'", form_path.display()))?;
    let mut fields: InspectionFields = toml::from_str(&raw_form)
        .with_context(|| format!("failed to parse form file '{}'", form_path.display()))?;

    let now = Local::now();
    if fields.inspection_date.is_empty() {
        fields.inspection_date = now.format("%Y-%m-%d").to_string();
    }
    if fields.inspection_time.is_empty() {
        fields.inspection_time = now.format("%H:%M").to_string();
    }

    let blob_store = Arc::new(HttpBlobStore::new(
        &settings.api_base_url,
        &settings.api_key,
        &settings.storage_bucket,
    ));
    let record_store = Arc::new(HttpRecordStore::new(&settings.api_base_url, &settings.api_key));
    let mut session = SurveySession::new(blob_store, record_store)
        .with_collection(&settings.report_collection)
        .with_fields(fields);
    if settings.request_timeout_seconds > 0 {
        session = session.with_op_timeout(Duration::from_secs(settings.request_timeout_seconds));
    }

    if let Some(dir) = photos_dir {
        for (bucket, photos) in images::collect_bucket_images(dir)? {
            session.add_images(bucket, photos);
        }
    }

    match session.submit().await {
        Ok(report_id) => {
            println!("recorded inspection report id={}", report_id.0);
            Ok(())
        }
        Err(err) => {
            if let SubmissionError::Insert {
                source: StoreError::SchemaMismatch { .. },
            } = &err
            {
                eprintln!(
                    "the report shape no longer matches the store schema; \
                     run `survey-cli columns` to compare against the collection"
                );
            }
            Err(anyhow!("{err}"))
        }
    }
}
