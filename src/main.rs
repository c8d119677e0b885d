//! Forge CLI - structured content generation
//!
//! The application logic is contained in lib.rs, and this file is responsible
//! for parsing arguments, rendering results and handling top-level errors.

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use creator_forge::content::{
    self, IdeaList, ReelsInsight, ScriptPackage, TiktokInsight, YoutubeInsight,
};
use creator_forge::request::{GenerationRequest, ScriptPlatform};
use creator_forge::storage::{NewPlannedContent, PlanPlatform, PlanStatus};
use creator_forge::{
    server, Config, Dispatcher, GeneratedContent, GenerationError, IdeaRequest, InsightPlatform,
    InsightRequest, OpenAiClient, ScriptRequest, Storage, Workflow,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "forge")]
#[command(author, version, about = "Structured content generation for creators", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate content ideas for a topic or niche
    Ideas {
        /// Topic or niche
        topic: String,
        /// Print the validated JSON instead of a rendering
        #[arg(long)]
        json: bool,
    },
    /// Generate a script with storyboard
    Script {
        /// Video topic
        topic: String,
        #[arg(long, value_enum)]
        platform: ScriptPlatform,
        /// Target audience
        #[arg(long)]
        audience: String,
        /// Video duration, e.g. "60 seconds"
        #[arg(long)]
        duration: String,
        /// Tone of voice
        #[arg(long)]
        tone: String,
        #[arg(long)]
        json: bool,
    },
    /// Analyze a video for strategic insights
    Insight {
        #[arg(long, value_enum)]
        platform: InsightPlatform,
        /// Video URL, used when no transcript is given
        #[arg(long)]
        url: Option<String>,
        /// Video transcript
        #[arg(long, conflicts_with = "transcript_file")]
        transcript: Option<String>,
        /// Read the transcript from a file
        #[arg(long)]
        transcript_file: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// Print the JSON Schema of a workflow's result
    Schema {
        #[arg(value_enum)]
        workflow: SchemaWorkflow,
        /// Platform variant for insights
        #[arg(long, value_enum, default_value = "youtube")]
        platform: InsightPlatform,
    },
    /// Manage planned content
    Plan {
        #[command(subcommand)]
        command: PlanCommand,
    },
    /// Serve the workflows over HTTP
    Serve {
        /// Address to bind, overrides server.bind
        #[arg(long)]
        bind: Option<String>,
    },
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SchemaWorkflow {
    Ideas,
    Script,
    Insight,
}

#[derive(Subcommand)]
enum PlanCommand {
    /// Add a planned item
    Add {
        name: String,
        #[arg(long, value_enum, default_value = "youtube")]
        platform: PlanPlatform,
        /// Target date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<chrono::NaiveDate>,
        #[arg(long, value_enum, default_value = "idea")]
        status: PlanStatus,
    },
    /// List planned items, newest first
    List,
    /// Change the status of an item
    Status {
        id: u64,
        #[arg(value_enum)]
        status: PlanStatus,
    },
    /// Remove an item
    Remove { id: u64 },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Ideas { topic, json } => {
            let request = IdeaRequest { topic };
            let dispatcher = dispatcher(request.clone().into())?;
            let content = finish(dispatcher.generate_ideas(request).await)?;
            output(&content, json, render_ideas)?;
        }
        Commands::Script {
            topic,
            platform,
            audience,
            duration,
            tone,
            json,
        } => {
            let request = ScriptRequest {
                topic,
                platform,
                target_audience: audience,
                duration,
                tone,
            };
            let dispatcher = dispatcher(request.clone().into())?;
            let content = finish(dispatcher.generate_script(request).await)?;
            output(&content, json, render_script)?;
        }
        Commands::Insight {
            platform,
            url,
            transcript,
            transcript_file,
            json,
        } => {
            let transcript = match transcript_file {
                Some(path) => Some(
                    std::fs::read_to_string(&path)
                        .with_context(|| format!("failed to read {}", path.display()))?,
                ),
                None => transcript,
            };
            let request = InsightRequest {
                platform,
                source_url: url,
                transcript,
            };
            let dispatcher = dispatcher(request.clone().into())?;
            let content = finish(dispatcher.generate_insight(request).await)?;
            output(&content, json, render_insight)?;
        }
        Commands::Schema { workflow, platform } => {
            let workflow = match workflow {
                SchemaWorkflow::Ideas => Workflow::Ideas,
                SchemaWorkflow::Script => Workflow::Script,
                SchemaWorkflow::Insight => Workflow::Insight(platform),
            };
            let schema = content::result_schema(workflow);
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }
        Commands::Plan { command } => {
            let config = Config::load()?;
            let storage = Storage::open(&config.storage.path)?;
            run_plan(&storage, command)?;
        }
        Commands::Serve { bind } => {
            let config = Config::load()?;
            let bind = bind.unwrap_or_else(|| config.server.bind.clone());
            let client = OpenAiClient::from_config(&config)?;
            info!(model = client.model(), "generation client ready");
            server::serve(&bind, Dispatcher::new(Arc::new(client))).await?;
        }
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "forge", &mut std::io::stdout());
        }
    }

    Ok(())
}

fn init_tracing() {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Check the request before loading credentials, then build the dispatcher
fn dispatcher(request: GenerationRequest) -> anyhow::Result<Dispatcher> {
    request
        .validate()
        .map_err(|err| anyhow::anyhow!(GenerationError::from(err).public_message()))?;
    let config = Config::load()?;
    let client = OpenAiClient::from_config(&config)?;
    info!(model = client.model(), workflow = %request.workflow(), "generation client ready");
    Ok(Dispatcher::new(Arc::new(client)))
}

/// Surface only the caller-facing message of a failed generation
fn finish(result: Result<GeneratedContent, GenerationError>) -> anyhow::Result<GeneratedContent> {
    result.map_err(|err| anyhow::anyhow!(err.public_message()))
}

fn output(
    content: &GeneratedContent,
    json: bool,
    render: fn(&GeneratedContent) -> anyhow::Result<()>,
) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(content.body())?);
        return Ok(());
    }
    render(content)
}

fn render_ideas(content: &GeneratedContent) -> anyhow::Result<()> {
    let list: IdeaList = content.decode()?;
    println!("{}\n", "💡 Ideas".bold());
    for (n, idea) in list.ideas.iter().enumerate() {
        println!("  {:>2}. {}", n + 1, idea);
    }
    Ok(())
}

fn render_script(content: &GeneratedContent) -> anyhow::Result<()> {
    let package: ScriptPackage = content.decode()?;
    let script = &package.script;

    println!("=== {} ===\n", script.title.bold());
    println!("{}", "🎣 Hook:".bold());
    println!("  {}\n", script.hook);

    println!("{}", "📌 Development:".bold());
    for point in &script.development_points {
        println!("  • {}", point);
    }

    println!("\n{}", "📣 Call to action:".bold());
    println!("  {}", script.call_to_action);

    if let Some(alt) = &script.alternate_version {
        println!("\n{}", "🔁 Alternate version:".bold());
        println!("  {}", alt);
    }

    println!("\n{}", "🎬 Storyboard".bold());
    for scene in &package.storyboard {
        println!("\n  {} {}", "Scene".cyan(), scene.number.to_string().cyan());
        println!("    What happens: {}", scene.event);
        println!("    Visual:       {}", scene.visual);
        println!("    Illustration: {}", scene.illustration.italic());
    }
    Ok(())
}

fn render_insight(content: &GeneratedContent) -> anyhow::Result<()> {
    let Workflow::Insight(platform) = content.workflow() else {
        anyhow::bail!("not an insight result");
    };

    match platform {
        InsightPlatform::Youtube => {
            let report: YoutubeInsight = content.decode()?;
            section_text("📝 Summary", &report.summary);
            section_list("💡 Main ideas", &report.main_ideas);
            section_text("🧱 Structure", &report.structure);
            section_list("🎣 Hooks", &report.hooks);
            section_list("📈 Trends", &report.trends);
            section_list("✨ Derived ideas", &report.derived_ideas);
        }
        InsightPlatform::Reels => {
            let report: ReelsInsight = content.decode()?;
            section_text("📝 Summary", &report.summary);
            section_text("🧱 Structure", &report.structure);
            section_text("🎨 Visual style", &report.visual_style);
            section_text("🏆 Why it worked", &report.why_it_worked);
            section_list("👀 Attention elements", &report.attention_elements);
            section_list("✨ Derived ideas", &report.derived_ideas);
        }
        InsightPlatform::Tiktok => {
            let report: TiktokInsight = content.decode()?;
            section_text("📝 Summary", &report.summary);
            section_text("⏱️  Pace", &report.pace);
            section_list("✂️  Editing patterns", &report.editing_patterns);
            section_list("♟️  Strategies", &report.strategies);
            section_list("💓 Emotions", &report.emotions);
            section_list("🛠️  Practical insights", &report.practical_insights);
            section_list("✨ Derived ideas", &report.derived_ideas);
        }
    }
    Ok(())
}

fn section_text(title: &str, text: &str) {
    println!("{}", title.bold());
    println!("  {}\n", text);
}

fn section_list(title: &str, items: &[String]) {
    println!("{}", title.bold());
    for item in items {
        println!("  • {}", item);
    }
    println!();
}

fn run_plan(storage: &Storage, command: PlanCommand) -> anyhow::Result<()> {
    match command {
        PlanCommand::Add {
            name,
            platform,
            date,
            status,
        } => {
            let item = storage.create(NewPlannedContent {
                name,
                platform,
                date,
                status,
            })?;
            println!("Added #{} {}", item.id, item.name.bold());
        }
        PlanCommand::List => {
            let items = storage.list()?;
            if items.is_empty() {
                println!("No planned content found.");
            } else {
                println!("Planned content ({}):\n", items.len());
                for item in items {
                    let date = item
                        .date
                        .map(|d| d.format("%Y-%m-%d").to_string())
                        .unwrap_or_else(|| "no date".to_string());
                    println!(
                        "📄 #{} {} [{}] {} ({})",
                        item.id,
                        item.name.bold(),
                        item.platform,
                        item.status.to_string().green(),
                        date
                    );
                }
            }
        }
        PlanCommand::Status { id, status } => {
            let item = storage.update_status(id, status)?;
            println!("#{} is now {}", item.id, item.status.to_string().green());
        }
        PlanCommand::Remove { id } => {
            if storage.delete(id)? {
                println!("Removed #{}", id);
            } else {
                println!("No planned content with id {}", id);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_request_is_reported_before_credentials() {
        let request = InsightRequest {
            platform: InsightPlatform::Tiktok,
            source_url: None,
            transcript: Some("  ".into()),
        };
        let err = dispatcher(request.into()).err().unwrap();
        assert!(err.to_string().starts_with("Invalid request: "), "{err}");
        assert!(err.to_string().contains("sourceUrl"), "{err}");

        let err = dispatcher(IdeaRequest::default().into()).err().unwrap();
        assert!(err.to_string().contains("topic"), "{err}");
    }
}
