use clap::{Parser, Subcommand};

use blens_audit::{run_audit, run_suggestion, AuditDeps, AuditRequest, SuggestRequest};
use blens_core::BrandProfile;
use blens_llm::LlmClient;
use blens_scraper::{CaptureClient, PageFetcher};

#[derive(Debug, Parser)]
#[command(name = "blens-cli")]
#[command(about = "Competitive brand audits from the command line")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Suggest up to 3 competitors for a company.
    Suggest {
        #[arg(long)]
        url: String,
        #[arg(long)]
        name: String,
    },
    /// Run a full audit against the given competitors.
    Audit {
        #[arg(long)]
        url: String,
        #[arg(long)]
        name: String,
        /// Competitor as `name=url`; repeat for more than one.
        #[arg(long = "competitor", value_parser = parse_competitor, required = true)]
        competitors: Vec<BrandProfile>,
    },
}

fn parse_competitor(raw: &str) -> Result<BrandProfile, String> {
    let (name, url) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected name=url, got \"{raw}\""))?;
    if name.trim().is_empty() || url.trim().is_empty() {
        return Err(format!("expected name=url, got \"{raw}\""));
    }
    Ok(BrandProfile::new(name.trim(), url.trim()))
}

fn build_deps(config: &blens_core::AppConfig) -> anyhow::Result<AuditDeps> {
    let fetcher = PageFetcher::new(config.fetch_timeout_secs, &config.fetch_user_agent)?;
    let capture = match &config.capture_base_url {
        Some(base) => Some(CaptureClient::new(base, config.capture_timeout_secs)?),
        None => None,
    };
    let llm = LlmClient::new(
        &config.llm_api_base,
        &config.llm_api_key,
        &config.llm_model,
        config.llm_request_timeout_secs,
    )?;
    Ok(AuditDeps {
        fetcher,
        capture,
        llm,
        call_delay_ms: config.llm_call_delay_ms,
        compare_delay_ms: config.llm_compare_delay_ms,
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = blens_core::load_app_config()?;
    let deps = build_deps(&config)?;

    match cli.command {
        Commands::Suggest { url, name } => {
            let request = SuggestRequest {
                company_url: url,
                company_name: name,
            };
            let suggestions = run_suggestion(&deps, &request).await?;
            println!("{}", serde_json::to_string_pretty(&suggestions)?);
        }
        Commands::Audit {
            url,
            name,
            competitors,
        } => {
            let request = AuditRequest {
                company_url: url,
                company_name: name,
                competitors,
            };
            let report = run_audit(&deps, &request).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_competitor_splits_name_and_url() {
        let profile = parse_competitor("Rival=https://rival.example").expect("should parse");
        assert_eq!(profile.name, "Rival");
        assert_eq!(profile.url, "https://rival.example");
    }

    #[test]
    fn parse_competitor_rejects_missing_separator() {
        assert!(parse_competitor("Rival").is_err());
    }

    #[test]
    fn parse_competitor_rejects_empty_url() {
        assert!(parse_competitor("Rival=").is_err());
    }
}
