use financial_node_assistant::{config::Config, gemini::GeminiClient, repl::Repl};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    // Missing credential is the only fatal error
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            eprintln!("See .env.example for setup instructions");
            std::process::exit(1);
        }
    };

    info!(model = %config.model, "Financial Node Assistant starting");

    let client = GeminiClient::new(config);
    let mut repl = Repl::new(client);

    println!("Chat started. Commands:");
    println!("  - upload:/path/to/file   upload a local business plan (PDF)");
    println!("  - create:<instruction>   generate financial nodes from the document");
    println!("  - quit                   exit");
    println!("  - anything else          chat about the uploaded document\n");

    repl.run().await?;

    Ok(())
}
