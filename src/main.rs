mod cli;

use bfi2_scorer::config;
use bfi2_scorer::error::Bfi2Error;
use bfi2_scorer::report;
use bfi2_scorer::scoring::{self, ScoringConfig};
use bfi2_scorer::store;
use bfi2_scorer::survey::{self, PersonaAgent, QuestionBank, ResponseFile, StdinResponder};
use bfi2_scorer::telemetry;
use bfi2_scorer::types::settings::Settings;
use bfi2_scorer::types::{ResponseSet, ScoredProfile};
use clap::Parser;
use std::path::Path;
use tracing::{debug, warn};

pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const WARNINGS: i32 = 1;
    pub const INVALID_INPUT: i32 = 2;
    pub const RUNTIME_FAILURE: i32 = 3;
}

fn resolve_scoring_config(
    explicit: Option<&Path>,
    settings: &Settings,
) -> Result<ScoringConfig, Bfi2Error> {
    match explicit.or(settings.scoring.config.as_deref()) {
        Some(path) => scoring::load_scoring_config(path),
        None => Ok(ScoringConfig::bfi2()?),
    }
}

/// Warns about configured items nobody answered. They were scored as neutral.
fn completeness_code(responses: &ResponseSet, scoring_config: &ScoringConfig) -> i32 {
    let missing = survey::missing_items(responses, scoring_config);
    if missing.is_empty() {
        return exit_code::SUCCESS;
    }
    eprintln!(
        "warning: {} of {} configured items unanswered, scored as neutral: {}",
        missing.len(),
        scoring_config.item_ids().len(),
        missing
            .iter()
            .map(|item| item.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    );
    exit_code::WARNINGS
}

fn check_recorded_digest(record: &ResponseFile, scoring_config: &ScoringConfig) {
    if let Some(recorded) = record.scoring_config_sha256.as_deref() {
        if recorded != scoring_config.digest() {
            warn!(
                recorded,
                current = scoring_config.digest(),
                "responses were recorded against a different scoring config"
            );
        }
    }
}

fn persona_from_file_name(path: &Path) -> Option<String> {
    let name = path.file_stem()?.to_str()?;
    let persona = name.split("_responses").next()?;
    (!persona.is_empty()).then(|| persona.to_string())
}

fn score_file(
    path: &Path,
    scoring_config: &ScoringConfig,
    settings: &Settings,
) -> Result<ScoredProfile, Bfi2Error> {
    let record = survey::load_response_file(path)?;
    check_recorded_digest(&record, scoring_config);
    let responses = record.response_set()?;
    let persona = record
        .persona
        .clone()
        .or_else(|| persona_from_file_name(path))
        .unwrap_or_else(|| settings.study.default_persona.clone());
    Ok(scoring::score(scoring_config, &responses, &persona))
}

fn run() -> Result<i32, Bfi2Error> {
    let cli = cli::Cli::parse();

    let loaded = config::load_settings(Path::new("."))?;
    let missing_settings = loaded.is_none();
    let settings = loaded.unwrap_or_default();
    settings.validate()?;

    telemetry::init(&telemetry::level_for(
        cli.verbose,
        cli.quiet,
        &settings.logging.level,
    ))?;
    if missing_settings {
        debug!("no {} found, using defaults", config::DEFAULT_SETTINGS_FILE);
    }

    match cli.command {
        cli::Commands::Score(cmd) => {
            let scoring_config = resolve_scoring_config(cmd.config.as_deref(), &settings)?;
            let mut record = survey::load_response_file(&cmd.responses)?;
            check_recorded_digest(&record, &scoring_config);
            let responses = record.response_set()?;

            let persona = cmd
                .persona
                .or_else(|| record.persona.clone())
                .unwrap_or_else(|| settings.study.default_persona.clone());
            let profile = scoring::score(&scoring_config, &responses, &persona);

            let rendered = report::render(&profile, cmd.format.into())?;
            println!("{rendered}");

            if cmd.save {
                record.persona = Some(persona);
                record
                    .scoring_config_sha256
                    .get_or_insert_with(|| scoring_config.digest().to_string());
                let paths = store::write_run(
                    &settings.output.results_dir,
                    &record,
                    &profile,
                    settings.output.write_latest,
                )?;
                eprintln!("saved: {}", paths.scored.display());
            }

            Ok(completeness_code(&responses, &scoring_config))
        }
        cli::Commands::Batch(cmd) => {
            if !cmd.dir.exists() {
                return Err(Bfi2Error::PathNotFound(cmd.dir.display().to_string()));
            }
            let scoring_config = resolve_scoring_config(cmd.config.as_deref(), &settings)?;

            let files = store::discover_response_files(&cmd.dir);
            if files.is_empty() {
                eprintln!("warning: no response files found in {}", cmd.dir.display());
                return Ok(exit_code::WARNINGS);
            }

            let mut profiles = Vec::with_capacity(files.len());
            let mut failures = 0usize;
            for path in &files {
                match score_file(path, &scoring_config, &settings) {
                    Ok(profile) => profiles.push(profile),
                    Err(e) => {
                        failures += 1;
                        eprintln!("error: {}: {}", path.display(), e);
                    }
                }
            }

            let rendered = report::render_batch(&profiles, cmd.format.into())?;
            println!("{rendered}");

            if failures > 0 {
                eprintln!(
                    "warning: {} of {} response files could not be scored",
                    failures,
                    files.len()
                );
                Ok(exit_code::WARNINGS)
            } else {
                Ok(exit_code::SUCCESS)
            }
        }
        cli::Commands::Survey(cmd) => {
            let scoring_config = resolve_scoring_config(cmd.config.as_deref(), &settings)?;
            let bank = match cmd
                .questions
                .as_deref()
                .or(settings.scoring.questions.as_deref())
            {
                Some(path) => survey::load_questions(path)?,
                None => QuestionBank::bfi2()?,
            };
            let persona = cmd
                .persona
                .unwrap_or_else(|| settings.study.default_persona.clone());

            let stdin = std::io::stdin();
            let responder = StdinResponder::new(stdin.lock(), std::io::stderr());
            let mut agent = PersonaAgent::new(persona.clone(), responder);
            let responses = agent.take_survey(&bank)?;

            let profile = scoring::score(&scoring_config, &responses, &persona);
            let rendered = report::render(&profile, cmd.format.into())?;
            println!("{rendered}");

            if cmd.save {
                let record = ResponseFile::record(&persona, &responses, &scoring_config);
                let paths = store::write_run(
                    &settings.output.results_dir,
                    &record,
                    &profile,
                    settings.output.write_latest,
                )?;
                eprintln!("saved: {}", paths.scored.display());
            }

            Ok(completeness_code(&responses, &scoring_config))
        }
        cli::Commands::CheckConfig(cmd) => {
            let (source, scoring_config) =
                match cmd.path.as_deref().or(settings.scoring.config.as_deref()) {
                    Some(path) => (
                        path.display().to_string(),
                        scoring::load_scoring_config(path)?,
                    ),
                    None => ("built-in BFI-2 key".to_string(), ScoringConfig::bfi2()?),
                };

            println!("scoring config: {source}");
            println!("sha256: {}", scoring_config.digest());
            println!("domains: {}", scoring_config.domains().len());
            for (name, domain) in scoring_config.domains().iter() {
                println!(
                    "- {} ({}): {} items, {} reverse, {} facets",
                    name,
                    domain.code,
                    domain.items.len(),
                    domain.reverse_items.len(),
                    domain.facets.len()
                );
            }
            let ranges = scoring_config.interpretation_ranges();
            println!("interpretation bands: {}", ranges.len());
            for range in ranges {
                println!("- {}: [{:.2}, {:.2})", range.label, range.min, range.max);
            }
            Ok(exit_code::SUCCESS)
        }
    }
}

fn main() {
    match run() {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
        }
        Err(e) => {
            eprintln!("error: {}", e);
            let code = match e {
                Bfi2Error::Validation(_) => exit_code::INVALID_INPUT,
                _ => exit_code::RUNTIME_FAILURE,
            };
            std::process::exit(code);
        }
    }
}
