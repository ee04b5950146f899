use clap::{Parser, Subcommand};
use remind_adaptor_terminal::{CommandSpeechEngine, TerminalAdaptor, TerminalConfig};
use remind_adaptor_web::{ChatGateway, GatewayConfig, GatewayServer, GatewayServerConfig, RelayMode};
use remind_core::{
    init_logging, load_env, ConversationStore, HttpChatTransport, SpeechEngine,
    DEFAULT_GATEWAY_URL, GATEWAY_URL_ENV, LOG_LEVEL_ENV, SPEECH_COMMAND_ENV,
};
use std::sync::Arc;
use tokio::io::BufReader;
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(name = "run-remind", about = "Re:Mind chat gateway and terminal client")]
struct Cli {
    #[arg(long, env = LOG_LEVEL_ENV, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    mode: Mode,
}

#[derive(Subcommand, Debug)]
enum Mode {
    /// Serve POST /api/chat and relay it to the agent
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
        /// Pipe agent replies through as they arrive
        #[arg(long)]
        stream: bool,
    },
    /// Chat from this terminal through a running gateway
    Chat {
        #[arg(long, env = GATEWAY_URL_ENV, default_value = DEFAULT_GATEWAY_URL)]
        gateway_url: String,
        /// TTS command for /speak, e.g. "espeak" or "say -v Samantha"
        #[arg(long, env = SPEECH_COMMAND_ENV)]
        speech_command: Option<String>,
    },
}

#[tokio::main]
async fn main() -> remind_core::Result<()> {
    // .env may carry the log level, so load it before parsing
    let env_loaded = load_env();
    let cli = Cli::parse();
    std::env::set_var(LOG_LEVEL_ENV, &cli.log_level);
    init_logging();
    env_loaded?;

    match cli.mode {
        Mode::Serve { host, port, stream } => serve(host, port, stream).await,
        Mode::Chat {
            gateway_url,
            speech_command,
        } => chat(gateway_url, speech_command).await,
    }
}

async fn serve(host: Option<String>, port: Option<u16>, stream: bool) -> remind_core::Result<()> {
    let mut gateway_config = GatewayConfig::from_env();
    if stream {
        gateway_config = gateway_config.with_relay_mode(RelayMode::Streaming);
    }

    let mut server_config = GatewayServerConfig::from_env();
    if let Some(host) = host {
        server_config.host = host;
    }
    if let Some(port) = port {
        server_config.port = port;
    }

    let mut server = GatewayServer::new(server_config, ChatGateway::new(gateway_config));
    let addr = server.start().await?;
    info!("POST http://{}/api/chat is ready; press Ctrl-C to stop", addr);

    tokio::signal::ctrl_c().await?;
    server.stop().await
}

async fn chat(gateway_url: String, speech_command: Option<String>) -> remind_core::Result<()> {
    let transport = Arc::new(HttpChatTransport::new(gateway_url));
    let mut store = ConversationStore::new(transport);
    if let Some(engine) = speech_command
        .as_deref()
        .and_then(CommandSpeechEngine::from_command_line)
    {
        let engine: Arc<dyn SpeechEngine> = Arc::new(engine);
        store = store.with_speech(engine);
    }
    let store = Arc::new(store);

    let adaptor = TerminalAdaptor::new(TerminalConfig::default(), store.clone());
    let renderer = adaptor.start_renderer();
    adaptor.run(BufReader::new(tokio::io::stdin())).await?;

    // Dropping the last store handle closes the snapshot channel
    drop(adaptor);
    drop(store);
    if let Err(e) = renderer.await {
        debug!("Renderer task ended abnormally: {}", e);
    }
    Ok(())
}
