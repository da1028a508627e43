use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use goal_breaker::client::{GoalApi, GoalClient};
use goal_breaker::config::Config;
use goal_breaker::models::sort_newest_first;
use goal_breaker::shell;
use goal_breaker::ui::render::{render_detail, render_goal_list};
use goal_breaker::ui::view::{
    list_headline, DetailSource, DetailView, GoalListBody, GoalListView, GoalSummary,
};
use goal_breaker::ui::Controller;

#[derive(Parser)]
#[command(name = "goalbreak")]
#[command(about = "Break ambitious goals into actionable steps")]
struct Cli {
    /// Backend base URL (overrides GOAL_BREAKER_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interactive shell (default)
    Shell,
    /// Break down a goal and print the result
    Create {
        /// The goal to break down
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// List all goals, newest first
    List,
    /// Show one goal by id
    Show { id: i64 },
    /// Check that the backend is reachable
    Status,
}

/// Initialize tracing on stderr so stdout carries only rendered output.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "goal_breaker=info".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let mut config = Config::from_env();
    if let Some(url) = cli.api_url {
        config = config.with_api_url(url);
    }
    tracing::debug!(api_url = %config.api_url, "resolved configuration");

    let client = GoalClient::new(&config.api_url);

    match cli.command.unwrap_or(Commands::Shell) {
        Commands::Shell => {
            let mut controller = Controller::new(client);
            let stdin = BufReader::new(tokio::io::stdin());
            let mut stdout = std::io::stdout();
            shell::run(&mut controller, stdin, &mut stdout)
                .await
                .context("Terminal I/O failed")?;
        }
        Commands::Create { text } => {
            let text = text.join(" ");
            anyhow::ensure!(!text.trim().is_empty(), "Enter a goal first.");
            let goal = client.create_goal(&text).await?;
            let detail = DetailView::from_goal(&goal, DetailSource::Created);
            print!("{}", render_detail(&detail));
        }
        Commands::List => {
            let mut goals = client.get_goals().await?;
            sort_newest_first(&mut goals);
            let body = if goals.is_empty() {
                GoalListBody::Empty
            } else {
                GoalListBody::Goals(
                    goals
                        .iter()
                        .map(|g| GoalSummary::from_goal(g, false))
                        .collect(),
                )
            };
            let list = GoalListView {
                headline: list_headline(goals.len()),
                loading: false,
                can_hide: false,
                body,
            };
            print!("{}", render_goal_list(&list));
        }
        Commands::Show { id } => {
            let goal = client
                .get_goal(id)
                .await
                .with_context(|| format!("Goal #{} could not be loaded", id))?;
            let detail = DetailView::from_goal(&goal, DetailSource::Created);
            print!("{}", render_detail(&detail));
        }
        Commands::Status => {
            let health = client.health().await?;
            println!("{} ({})", health.message, client.base_url());
        }
    }

    Ok(())
}
