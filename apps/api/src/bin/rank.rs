use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use ranker_api::config::Config;
use ranker_api::ranking::engine::{DimensionPolicy, RankOptions};
use ranker_api::ranking::pipeline::{run_ranking_job, RankingJob, SkillSource};
use ranker_api::ranking::report::{format_skill_matches, format_top_match};

/// Rank pre-embedded resumes against the skills a job description asks for.
#[derive(Parser)]
#[command(name = "rank", version, about)]
struct Cli {
    /// Job description to extract required skills from
    #[arg(long, default_value = "test_job_input.txt")]
    job_file: PathBuf,

    /// Comma-separated skills; skips extraction from --job-file
    #[arg(long, value_delimiter = ',')]
    skills: Option<Vec<String>>,

    /// Resume corpus (JSON array). Defaults to CORPUS_PATH
    #[arg(long)]
    corpus: Option<PathBuf>,

    /// Ranked output file. Defaults to RANKING_OUTPUT_PATH
    #[arg(long)]
    output: Option<PathBuf>,

    /// Run log file. Defaults to RANKING_LOG_PATH
    #[arg(long)]
    log: Option<PathBuf>,

    /// Fail on any resume whose embedding dimension differs from the corpus
    #[arg(long)]
    strict: bool,

    /// Seed for fallback skill-vector noise. Defaults to FALLBACK_NOISE_SEED
    #[arg(long)]
    seed: Option<u64>,

    /// Number of top matches to print (default: 5)
    #[arg(long, default_value = "5")]
    top: usize,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("ranker_api={}", config.rust_log))),
        )
        .with_writer(std::io::stderr)
        .init();

    let skills = match cli.skills {
        Some(skills) => SkillSource::Skills(
            skills
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        ),
        None => SkillSource::JobDescriptionFile(cli.job_file),
    };

    let dimension_policy = if cli.strict {
        DimensionPolicy::Strict
    } else {
        config.dimension_policy
    };

    let job = RankingJob {
        skills,
        corpus_path: cli.corpus.unwrap_or(config.corpus_path),
        output_path: cli.output.unwrap_or(config.output_path),
        log_path: cli.log.unwrap_or(config.log_path),
        options: RankOptions {
            dimension_policy,
            ..Default::default()
        },
        noise_seed: cli.seed.or(config.noise_seed),
        top_n: cli.top,
    };

    let summary = match run_ranking_job(&job, None) {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("Error in resume ranking: {e:#}");
            eprintln!("See {} for details.", job.log_path.display());
            std::process::exit(1);
        }
    };

    println!(
        "Resume ranking completed successfully. Ranked {} resumes.",
        summary.ranked.len()
    );
    if !summary.rejected.is_empty() || !summary.warnings.is_empty() {
        println!(
            "{} records quarantined, {} warnings.",
            summary.rejected.len(),
            summary.warnings.len()
        );
    }
    println!("Top {} matching resumes:", cli.top.min(summary.ranked.len()));
    for (i, record) in summary.ranked.iter().take(cli.top).enumerate() {
        println!("{}", format_top_match(i + 1, record));
        println!("   Individual skill matches: {}", format_skill_matches(record));
    }
    println!();
    println!("See {} for detailed results.", summary.log_path.display());
    println!("Full results saved to {}", summary.output_path.display());

    Ok(())
}
