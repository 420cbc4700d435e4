pub mod json;
pub mod md;

use crate::error::Bfi2Error;
use crate::types::ScoredProfile;

#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    Json,
    Md,
}

pub fn render(profile: &ScoredProfile, format: OutputFormat) -> Result<String, Bfi2Error> {
    match format {
        OutputFormat::Json => json::to_json(profile).map_err(Bfi2Error::Json),
        OutputFormat::Md => Ok(md::to_markdown(profile)),
    }
}

pub fn render_batch(profiles: &[ScoredProfile], format: OutputFormat) -> Result<String, Bfi2Error> {
    match format {
        OutputFormat::Json => json::batch_to_json(profiles).map_err(Bfi2Error::Json),
        OutputFormat::Md => Ok(profiles
            .iter()
            .map(md::summary_line)
            .collect::<Vec<_>>()
            .join("\n")),
    }
}
