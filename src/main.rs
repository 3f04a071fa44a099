mod constants;
mod coordinator;
mod engine;
mod palette;
mod plan;
mod worker;

use clap::Parser;

use crate::coordinator::{Coordinator, CoordinatorConfig};

const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Position to analyse, as a FEN string
    #[arg(long, default_value = START_FEN)]
    fen: String,

    /// Search depth of the root task
    #[arg(long, default_value_t = 4)]
    depth: u8,

    /// Upper bound on the number of generated analysis tasks
    #[arg(long, default_value_t = 128)]
    plans: usize,

    /// Worker threads (defaults to the logical CPU count)
    #[arg(long)]
    workers: Option<usize>,

    /// Print the final ranking as JSON instead of a table
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = CoordinatorConfig {
        worker_count: args.workers.unwrap_or_else(num_cpus::get),
        max_plans: args.plans,
        max_depth: args.depth,
    };

    let mut coordinator = Coordinator::new(config, |_, stats| {
        tracing::debug!(
            tasks = stats.tasks,
            total = stats.total,
            nodes = stats.nodes,
            nps = stats.nps,
            "progress"
        );
    });

    let lines = coordinator.start(&args.fen).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&lines)?);
    } else if lines.is_empty() {
        println!("no legal moves in this position");
    } else {
        for line in &lines {
            println!(
                "{:>8}  {:<7} {}  ({} plans, depth {})",
                palette::format_score(line.score),
                line.root_move,
                line.moves.join(" "),
                line.plan_count,
                line.depth
            );
        }
    }

    Ok(())
}
