use anyhow::Result;
use log::info;
use podscript::core::config::Config;
use podscript::core::io::NativeStorage;
use podscript::services::auth::{AuthClient, AuthEvent, SupabaseAuthClient};
use podscript::services::export::Exporter;
use podscript::services::llm::create_llm;
use podscript::services::setup;
use podscript::services::tts::create_tts_client;
use podscript::services::workflow::WorkflowManager;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    // 1. Load Config
    let config = match Config::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            eprintln!("Please ensure 'config.yml' exists with valid LLM settings.");
            return Err(e);
        }
    };

    config.ensure_directories()?;
    let storage = Arc::new(NativeStorage::new());

    let previous = Exporter::new(storage.as_ref(), config.output_folder.clone())
        .load_records()
        .await?;
    if !previous.is_empty() {
        println!("Previous episodes in {}:", config.output_folder);
        for record in previous.iter().take(5) {
            println!("  {} ({})", record.title, record.generated_at.format("%Y-%m-%d %H:%M"));
        }
    }

    // 2. Optional account
    let auth = match &config.auth.supabase {
        Some(supabase) => Some(SupabaseAuthClient::new(supabase, config.llm.timeout_seconds)?),
        None => None,
    };
    if let Some(auth) = &auth {
        let mut events = auth.subscribe();
        tokio::spawn(async move {
            while events.changed().await.is_ok() {
                let event = events.borrow_and_update().clone();
                match event {
                    AuthEvent::SignedIn(profile) => info!("Auth state: signed in as {}", profile.email),
                    AuthEvent::SignedOut => info!("Auth state: signed out"),
                }
            }
        });

        if let Some(profile) = setup::run_account(auth).await? {
            println!("Welcome, {}!", profile.name);
        }
    }

    // 3. Episode form
    let request = setup::prompt_request()?;

    // 4. Initialize clients
    let llm = create_llm(&config.llm)?;
    let tts = create_tts_client(&config.audio)?;

    // 5. Run Workflow
    let manager = WorkflowManager::new(config, llm, tts, storage)?;
    manager.run(&request).await?;

    if let Some(auth) = &auth {
        if auth.current_session().is_some() {
            auth.sign_out().await?;
        }
    }

    Ok(())
}
