use anyhow::{Context, Result};
use clap::Parser;
use skin_analysis_gateway::data_uri::DataUri;
use skin_analysis_gateway::models::Config;
use skin_analysis_gateway::{report, Gateway};
use std::path::PathBuf;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "skin-analysis-gateway")]
#[command(about = "Analyze a skin photo with the configured inference service")]
struct CliArgs {
    /// Image file to analyze, or a literal `data:` URI.
    #[arg(value_name = "IMAGE")]
    image: String,

    /// Print the outcome as JSON instead of a text report.
    #[arg(long)]
    json: bool,

    /// Ask the text-generation service for a routine recommendation.
    #[arg(long)]
    routine: bool,
}

/// Applies `--routine` on top of the environment settings. Without an API
/// key the flag is ignored and analysis runs without a routine.
fn apply_routine_flag(config: &mut Config, requested: bool) {
    if !requested {
        return;
    }
    if config.gemini_api_key.is_none() {
        warn!("--routine needs GEMINI_API_KEY; continuing without routine generation");
        return;
    }
    config.routine_enabled = true;
}

fn load_image(input: &str) -> Result<String> {
    if input.starts_with("data:") {
        return Ok(input.to_string());
    }

    let path = PathBuf::from(input);
    let uri = DataUri::from_path(&path)
        .with_context(|| format!("Failed to load image from {}", path.display()))?;
    Ok(uri.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "skin_analysis_gateway=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = CliArgs::parse();

    let mut config = Config::from_env();
    apply_routine_flag(&mut config, args.routine);

    let photo_data_uri = load_image(&args.image)?;
    let gateway = Gateway::from_config(&config);

    info!("Starting analysis");
    let outcome = gateway.analyze(&photo_data_uri).await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print!("{}", report::render(&outcome));
    }

    if let Some(failure) = outcome.failure() {
        error!("Analysis failed: {}", failure.error);
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_image_passes_data_uri_through() {
        let uri = "data:image/png;base64,iVBORw0KGgo=";
        assert_eq!(load_image(uri).unwrap(), uri);
    }

    #[test]
    fn test_load_image_encodes_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A])
            .unwrap();

        let uri = load_image(file.path().to_str().unwrap()).unwrap();
        assert_eq!(uri, "data:image/png;base64,iVBORw0KGgo=");
    }

    #[test]
    fn test_load_image_missing_file() {
        let err = load_image("/definitely/not/here.jpg").unwrap_err();
        assert!(err.to_string().contains("Failed to load image"));
    }

    #[test]
    fn test_routine_flag_without_key_is_ignored() {
        let mut config = Config::from_lookup(|_| None);
        apply_routine_flag(&mut config, true);
        assert!(!config.routine_enabled);
    }

    #[test]
    fn test_routine_flag_with_key_enables_routine() {
        let mut config = Config::from_lookup(|key| match key {
            "GEMINI_API_KEY" => Some("key".to_string()),
            _ => None,
        });
        apply_routine_flag(&mut config, true);
        assert!(config.routine_enabled);
    }

    #[test]
    fn test_cli_parses_flags() {
        let args = CliArgs::parse_from(["skin-analysis-gateway", "--json", "face.jpg"]);
        assert!(args.json);
        assert!(!args.routine);
        assert_eq!(args.image, "face.jpg");
    }
}
