use nl2sql_gateway::infra::config::{self, LlmSettings, PoolSettings};
use nl2sql_gateway::infra::llm::{Generation, SqlGenerator};
use nl2sql_gateway::storage;
use nl2sql_gateway::{check, sanitize};

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: cargo run --bin preflight -- [--probe-llm]\n\
         \n\
         Requires env vars:\n\
           DATABASE_URL, API_KEY\n\
         Optional:\n\
           LLM_API_KEY (or GROQ_API_KEY), LLM_API_URL, LLM_MODEL, SCHEMA_NAMESPACE\n"
    );
    std::process::exit(2);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        usage_and_exit();
    }
    let probe_llm = args.iter().any(|a| a == "--probe-llm");

    // Force-read config (nice error messages if missing)
    let database_url = config::database_url()?;
    let _ = config::service_api_key()?;
    let namespace = config::schema_namespace();
    let pool_settings = PoolSettings::from_env()?;
    let llm = LlmSettings::from_env()?;

    println!("> Preflight:");
    println!("  SCHEMA_NAMESPACE={}", namespace);
    println!(
        "  pool: min={} max={} acquire_timeout={}s statement_timeout={}ms",
        pool_settings.min_connections,
        pool_settings.max_connections,
        pool_settings.acquire_timeout.as_secs(),
        pool_settings.statement_timeout_ms
    );

    // Database connectivity
    let pool = storage::connect_pool(&database_url, &pool_settings).await?;
    println!("  Database reachable.");

    // Schema visible to the model
    let schema = storage::introspect(&pool, &namespace)
        .await
        .map_err(|e| anyhow::anyhow!("Schema introspection failed: {}", e))?;
    println!(
        "  Schema: {} tables, {} columns",
        schema.table_count(),
        schema.columns().len()
    );
    if schema.is_empty() {
        eprintln!("  Warning: namespace '{}' has no visible columns; prompts will carry no schema.", namespace);
    }

    // LLM configuration
    let generator = SqlGenerator::from_settings(&llm)?;
    if generator.is_configured() {
        println!("  LLM: {} via {}", llm.model, llm.api_url);
    } else {
        eprintln!("  Warning: no LLM API key; every request will run the fallback statement.");
    }

    if probe_llm {
        let generation = generator
            .generate(&schema.render(), "count the rows of any one table")
            .await;
        match &generation {
            Generation::Model { .. } => println!("  LLM probe answered."),
            other => eprintln!("  Warning: LLM probe degraded ({:?}).", other),
        }
        let candidate = sanitize(generation.candidate());
        match check(&candidate) {
            Ok(stmt) => println!("  Probe SQL passes validation: {}", stmt),
            Err(rejection) => eprintln!("  Probe SQL rejected: {}", rejection),
        }
    }

    pool.close().await;
    println!("> Preflight OK.");
    Ok(())
}
