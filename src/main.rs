use clap::{Parser, Subcommand};
use mixopt::search::{DEFAULT_MAX_STEPS, DEFAULT_TARGET_CAP};
use mixopt::{
    mix, pricing, unmix, unmix_best_base, CancelToken, Catalog, ParallelConfig, RankFilter,
    UnmixConfig, UnmixOutcome,
};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// --- Command Line Arguments ---

#[derive(Parser)]
#[command(name = "mixopt")]
#[command(about = "mixopt - effect-mix calculator and minimum-cost unmix solver")]
#[command(version)]
#[command(subcommand_required = true)]
#[command(arg_required_else_help = true)]
struct Args {
    /// Path to the catalog document
    #[arg(long, global = true, default_value = "data/catalog.json")]
    catalog: PathBuf,

    /// Current rank name; gates which items are selectable
    #[arg(long, global = true, conflicts_with = "unlock_all")]
    rank: Option<String>,

    /// Ignore rank gating entirely
    #[arg(long, global = true)]
    unlock_all: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Mix a base product with a sequence of additives and show the result
    Mix {
        /// Base product name
        base: String,
        /// Additive names, in application order
        #[arg(required = true)]
        additives: Vec<String>,
    },
    /// Find the cheapest additive sequence that achieves the given effects
    Unmix {
        /// Desired effects, comma separated
        #[arg(long, value_delimiter = ',', required = true)]
        effects: Vec<String>,
        /// Fix the base product; omit to search every unlocked base
        #[arg(long)]
        base: Option<String>,
        /// Maximum additive applications to consider
        #[arg(long, default_value_t = DEFAULT_MAX_STEPS)]
        max_steps: usize,
        /// Cap on the number of requested effects
        #[arg(long, default_value_t = DEFAULT_TARGET_CAP)]
        max_effects: usize,
        /// Cancel the search after this many seconds
        #[arg(long)]
        timeout_secs: Option<u64>,
        /// Worker threads for the best-of-all-bases mode
        #[arg(long)]
        workers: Option<usize>,
        /// Print search statistics
        #[arg(long)]
        stats: bool,
    },
    /// List catalog items visible under the rank filter
    List,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    if let Err(err) = run(args) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = Catalog::from_path(&args.catalog)?;
    let filter = resolve_filter(&catalog, args.rank.as_deref(), args.unlock_all)?;

    match args.command {
        Commands::Mix { base, additives } => cmd_mix(&catalog, filter, &base, &additives),
        Commands::Unmix {
            effects,
            base,
            max_steps,
            max_effects,
            timeout_secs,
            workers,
            stats,
        } => cmd_unmix(
            &catalog,
            filter,
            &effects,
            base.as_deref(),
            max_steps,
            max_effects,
            timeout_secs,
            workers,
            stats,
        ),
        Commands::List => cmd_list(&catalog, filter),
    }
}

fn resolve_filter(
    catalog: &Catalog,
    rank: Option<&str>,
    unlock_all: bool,
) -> Result<RankFilter, Box<dyn std::error::Error>> {
    if unlock_all {
        return Ok(RankFilter::UnlockAll);
    }
    match rank {
        None => Ok(RankFilter::UnlockAll),
        Some(name) => match catalog.rank_index(name) {
            Some(index) => Ok(RankFilter::AtRank(index)),
            None => Err(format!(
                "unknown rank '{}' (ladder: {})",
                name,
                catalog.ranks().join(", ")
            )
            .into()),
        },
    }
}

fn cmd_mix(
    catalog: &Catalog,
    filter: RankFilter,
    base: &str,
    additives: &[String],
) -> Result<(), Box<dyn std::error::Error>> {
    let base_id = catalog.base_id(base)?;
    if !filter.is_unlocked(catalog.base(base_id).unlock) {
        return Err(format!("base product '{base}' is not unlocked at this rank").into());
    }
    for name in additives {
        let id = catalog.additive_id(name)?;
        if !filter.is_unlocked(catalog.additive(id).unlock) {
            return Err(format!("additive '{name}' is not unlocked at this rank").into());
        }
    }

    let path = mix(catalog, base, additives)?;

    println!("Base: {} [{}]", base, catalog.render_effects(path.start));
    for (index, step) in path.steps.iter().enumerate() {
        println!(
            "  {}. {} -> {}",
            index + 1,
            catalog.additive(step.additive).name,
            catalog.render_effects(step.effects)
        );
    }
    println!(
        "Final effects: {}",
        catalog.render_effects(path.final_effects())
    );

    let additive_ids: Vec<_> = path.additives().collect();
    let breakdown = pricing::cost_breakdown(catalog, path.base, &additive_ids);
    println!(
        "Cost: base {} + additives {} = {}",
        breakdown.base_cost, breakdown.additive_total, breakdown.total
    );
    println!(
        "Estimated sell price: {}",
        pricing::sell_price(catalog, path.base, path.final_effects())
    );
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn cmd_unmix(
    catalog: &Catalog,
    filter: RankFilter,
    effects: &[String],
    base: Option<&str>,
    max_steps: usize,
    max_effects: usize,
    timeout_secs: Option<u64>,
    workers: Option<usize>,
    stats: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let target = catalog.effect_set(effects)?;
    let candidates = catalog.unlocked_additives(filter);
    let config = UnmixConfig::default()
        .with_max_steps(max_steps)
        .with_target_cap(max_effects);

    let cancel = CancelToken::new();
    if let Some(secs) = timeout_secs {
        cancel.cancel_after(Duration::from_secs(secs));
    }

    let outcome = match base {
        Some(name) => {
            let base_id = catalog.base_id(name)?;
            if !filter.is_unlocked(catalog.base(base_id).unlock) {
                return Err(format!("base product '{name}' is not unlocked at this rank").into());
            }
            unmix(catalog, base_id, target, &candidates, &config, &cancel)?
        }
        None => {
            let bases = catalog.unlocked_bases(filter);
            let mut parallel = ParallelConfig::default();
            if let Some(workers) = workers {
                parallel = parallel.with_workers(workers);
            }
            unmix_best_base(
                catalog, &bases, target, &candidates, &config, &parallel, &cancel,
            )?
        }
    };

    match &outcome {
        UnmixOutcome::Found { solution, .. } => {
            let base = catalog.base(solution.base);
            println!("Base: {} [{}]", base.name, catalog.render_effects(solution.path.start));
            for (index, step) in solution.path.steps.iter().enumerate() {
                println!(
                    "  {}. {} -> {}",
                    index + 1,
                    catalog.additive(step.additive).name,
                    catalog.render_effects(step.effects)
                );
            }
            println!(
                "Final effects: {}",
                catalog.render_effects(solution.path.final_effects())
            );
            let breakdown = pricing::cost_breakdown(catalog, solution.base, &solution.additives);
            println!(
                "Cost: base {} + additives {} = {}",
                breakdown.base_cost, breakdown.additive_total, breakdown.total
            );
            println!(
                "Estimated sell price: {}",
                pricing::sell_price(catalog, solution.base, solution.path.final_effects())
            );
        }
        UnmixOutcome::NotFound { .. } => match base {
            Some(name) => println!(
                "No additive sequence can produce all of: {} from '{}'",
                effects.join(", "),
                name
            ),
            None => println!(
                "No unlocked base product can achieve all of: {}",
                effects.join(", ")
            ),
        },
        UnmixOutcome::Cancelled { .. } => {
            println!("Search cancelled before completion.");
        }
    }

    if stats {
        print!("{}", outcome.statistics().format_summary());
    }
    Ok(())
}

fn cmd_list(catalog: &Catalog, filter: RankFilter) -> Result<(), Box<dyn std::error::Error>> {
    println!("Base products:");
    for id in catalog.unlocked_bases(filter) {
        let base = catalog.base(id);
        println!(
            "  {} (cost {}, sell value {}) [{}]",
            base.name,
            base.cost,
            base.sell_value,
            catalog.render_effects(base.effects)
        );
    }

    println!("Additives:");
    for id in catalog.unlocked_additives(filter) {
        let additive = catalog.additive(id);
        println!(
            "  {} (cost {}, {} rule{})",
            additive.name,
            additive.cost,
            additive.rules.len(),
            if additive.rules.len() == 1 { "" } else { "s" }
        );
    }

    println!("Effects:");
    for (_, effect) in catalog.effects() {
        println!("  {} (multiplier {:+.2})", effect.name, effect.multiplier);
    }
    Ok(())
}
