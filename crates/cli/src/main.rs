use clap::{Args, Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tcm_core::{
    canonical_point_code, EngineConfig, FuzzyMatcher, KnowledgeBase, PatientObservation,
    PulseObservation, ScoredSyndrome, ScoringEngine, SynonymTable, TongueObservation,
};
use tcm_core::constants::{MAX_RESULTS, MIN_SCORE_EXCLUSIVE};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "tcm")]
#[command(about = "TCM clinical decision-support CLI")]
struct Cli {
    /// YAML knowledge base to use instead of the built-in one
    #[arg(long, global = true)]
    knowledge_base: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank syndromes against a patient observation
    Analyze(AnalyzeArgs),
    /// List the syndromes of the knowledge base
    Syndromes,
    /// Show one syndrome with its points, relationships and herbs
    Show {
        /// Syndrome id, e.g. HEART_FIRE_BLAZING
        id: String,
    },
    /// Test whether two phrases match
    Match {
        input: String,
        reference: String,
        /// Token-overlap threshold
        #[arg(long, default_value_t = tcm_core::constants::MATCH_THRESHOLD)]
        threshold: f64,
    },
    /// Canonicalize an acupuncture point code
    Point {
        /// Raw code, e.g. "HE-7 Shenmen"
        code: String,
    },
}

#[derive(Args)]
struct AnalyzeArgs {
    /// Observation document (JSON or YAML)
    #[arg(
        long,
        conflicts_with_all = [
            "symptoms",
            "select",
            "tongue_body",
            "tongue_coating",
            "coating_quality",
            "tongue_feature",
            "pulse",
        ]
    )]
    file: Option<PathBuf>,

    /// Free-text symptom narrative
    #[arg(long)]
    symptoms: Option<String>,

    /// Checklist symptom (repeatable)
    #[arg(long)]
    select: Vec<String>,

    /// Tongue body colour
    #[arg(long)]
    tongue_body: Option<String>,

    /// Tongue coating colour
    #[arg(long)]
    tongue_coating: Option<String>,

    /// Tongue coating quality
    #[arg(long)]
    coating_quality: Option<String>,

    /// Special tongue feature (repeatable)
    #[arg(long)]
    tongue_feature: Vec<String>,

    /// Pulse quality (repeatable)
    #[arg(long)]
    pulse: Vec<String>,

    /// Print results as JSON
    #[arg(long)]
    json: bool,
}

impl AnalyzeArgs {
    fn observation(&self) -> CliResult<PatientObservation> {
        if let Some(path) = &self.file {
            return read_observation(path);
        }

        Ok(PatientObservation {
            symptoms: self.symptoms.clone().unwrap_or_default(),
            selected_symptoms: self.select.clone(),
            tongue: TongueObservation {
                body_color: self.tongue_body.clone().unwrap_or_default(),
                coating_color: self.tongue_coating.clone().unwrap_or_default(),
                coating_quality: self.coating_quality.clone().unwrap_or_default(),
                special_features: self.tongue_feature.clone(),
            },
            pulse: PulseObservation {
                qualities: self.pulse.clone(),
            },
        })
    }
}

fn read_observation(path: &Path) -> CliResult<PatientObservation> {
    let text = std::fs::read_to_string(path)?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let observation = if is_json {
        PatientObservation::from_json(&text)?
    } else {
        PatientObservation::from_yaml(&text)?
    };
    Ok(observation)
}

fn main() -> CliResult<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("tcm_core=warn".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let stdout = std::io::stdout();
    run(cli, &mut stdout.lock())
}

fn run(cli: Cli, out: &mut impl Write) -> CliResult<()> {
    match cli.command {
        Some(Commands::Analyze(args)) => {
            let engine = engine(cli.knowledge_base.as_deref())?;
            let results = engine.analyze(&args.observation()?);
            if args.json {
                writeln!(out, "{}", serde_json::to_string_pretty(&results)?)?;
            } else if results.is_empty() {
                writeln!(out, "No syndrome matched strongly enough.")?;
            } else {
                for (rank, result) in results.iter().enumerate() {
                    write_result(out, rank + 1, result)?;
                }
            }
        }
        Some(Commands::Syndromes) => {
            let kb = KnowledgeBase::load_or_builtin(cli.knowledge_base.as_deref())?;
            for s in kb.syndromes() {
                let element = s.wuxing_element.map(|e| e.to_string()).unwrap_or_default();
                writeln!(
                    out,
                    "{:<32} {:<6} {}",
                    s.id.as_str(),
                    element,
                    display_name(s)
                )?;
            }
        }
        Some(Commands::Show { id }) => {
            let engine = engine(cli.knowledge_base.as_deref())?;
            match engine.profile(&id) {
                Some(profile) => write_result(out, 0, &profile)?,
                None => return Err(format!("unknown syndrome: {id}").into()),
            }
        }
        Some(Commands::Match {
            input,
            reference,
            threshold,
        }) => {
            let config = EngineConfig::new(threshold, MIN_SCORE_EXCLUSIVE, MAX_RESULTS)?;
            let matcher = FuzzyMatcher::new(config.match_threshold(), SynonymTable::default());
            writeln!(out, "{}", matcher.matches(&input, &reference))?;
        }
        Some(Commands::Point { code }) => match canonical_point_code(&code) {
            Some(canonical) => writeln!(out, "{canonical}")?,
            None => return Err("empty point code".into()),
        },
        None => {
            writeln!(out, "Use 'tcm --help' for commands")?;
        }
    }

    Ok(())
}

fn engine(knowledge_base: Option<&Path>) -> CliResult<ScoringEngine> {
    let kb = KnowledgeBase::load_or_builtin(knowledge_base)?;
    Ok(ScoringEngine::new(Arc::new(kb), EngineConfig::default()))
}

fn display_name(s: &tcm_core::Syndrome) -> &str {
    if s.name.is_empty() {
        &s.name_en
    } else {
        &s.name
    }
}

/// Print one result; `rank` 0 prints a profile without score.
fn write_result(out: &mut impl Write, rank: usize, r: &ScoredSyndrome<'_>) -> CliResult<()> {
    let s = r.syndrome;
    if rank == 0 {
        writeln!(out, "{} ({})", display_name(s), s.id)?;
    } else {
        writeln!(out, "{rank}. {} ({}) score {}", display_name(s), s.id, r.score)?;
    }

    let element = match s.wuxing_element {
        Some(e) => format!("{e} ({})", e.organs().join(", ")),
        None => "-".into(),
    };
    let nature = s.pattern_class().nature().join(", ");
    writeln!(
        out,
        "   element: {element} | pattern: {} [{nature}]",
        s.pattern_type
    )?;

    for line in &r.rationale {
        writeln!(out, "   {line}")?;
    }
    if !r.points.is_empty() {
        let codes: Vec<&str> = r.points.iter().map(|p| p.code.as_str()).collect();
        writeln!(out, "   points: {}", codes.join(", "))?;
    }
    for warning in &r.warnings {
        writeln!(out, "   ! {warning}")?;
    }
    for rel in &r.relationships {
        writeln!(
            out,
            "   {} -> {}: {}",
            rel.relationship_type, rel.target_element, rel.description
        )?;
    }
    if let Some(herbs) = &r.herbal_recommendation {
        writeln!(
            out,
            "   herbs: {} ({})",
            herbs.formula_name,
            herbs.chief_herbs.join(", ")
        )?;
        writeln!(out, "   avoid: {}", herbs.avoid.join("; "))?;
    }
    Ok(())
}
