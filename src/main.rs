use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::{debug, error, info, Level};
use tracing_subscriber::FmtSubscriber;

use localchat::cli::{self, output, Commands};
use localchat::{
    BatchChatUseCase, ChatClient, ChatUseCase, MockChatClient, ModelConfig,
    OpenAiCompatibleClient,
};

#[derive(Parser)]
#[command(name = "localchat")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Exit with a non-zero status when the request fails
    #[arg(long, global = true)]
    strict: bool,

    /// Answer with an in-process echo client instead of calling the endpoint
    #[arg(long, global = true)]
    mock: bool,

    #[arg(long, global = true, default_value = ".env")]
    env_file: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    // Logs go to stderr; stdout carries only model output.
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let strict = cli.strict;
    if let Err(e) = run(cli).await {
        if strict {
            return Err(e);
        }
        error!("An error occurred: {e:#}");
        if let Some(hint) = output::failure_hint(&e) {
            info!("{hint}");
        }
    }

    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let config = ModelConfig::from_env_and_dotenv(&cli.env_file)?;

    let client: Arc<dyn ChatClient> = if cli.mock {
        info!("Using mock chat client");
        Arc::new(MockChatClient::new())
    } else {
        let client = OpenAiCompatibleClient::from_config(&config);
        debug!("Using chat endpoint {}", client.url());
        Arc::new(client)
    };

    match cli.command.unwrap_or_default() {
        Commands::Chat { prompt, system } => {
            config.validate()?;

            let use_case = ChatUseCase::new(client, &config);
            info!("Sending request to {}...", use_case.model());
            let reply = use_case.ask_with_system(system.as_deref(), &prompt).await?;
            output::write_reply(&mut io::stdout().lock(), &reply)?;
        }

        Commands::Advanced { prompt } => {
            config.validate()?;
            let options = config.generation_options()?;
            output::write_generation_summary(
                &mut io::stdout().lock(),
                config.model_name(),
                &options,
            )?;

            let use_case = ChatUseCase::new(client, &config).with_options(options);
            let reply = use_case.ask(&prompt).await?;
            output::write_reply(&mut io::stdout().lock(), &reply)?;
        }

        Commands::Batch { file } => {
            config.validate()?;
            let use_case = BatchChatUseCase::new(client, &config)?;
            let requests = cli::load_batch_file(&file)?;

            let outcomes = use_case.execute(&requests).await;
            output::write_batch_report(&mut io::stdout().lock(), &outcomes)?;
        }

        Commands::Config => {
            output::write_config(&mut io::stdout().lock(), &config)?;
            config.validate()?;
            config.validate_generation()?;
            println!("Configuration validation check passed.");
        }
    }

    Ok(())
}
