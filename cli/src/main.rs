//! CLI entrypoint for bedrock-relay
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::{CommandFactory, Parser};
use relay_application::{MessageRelay, StreamCoordinator};
use relay_domain::{PromptTemplate, ServiceConfig};
use relay_infrastructure::{
    ApiGatewayPushTransport, BedrockInferenceGateway, ConfigLoader, DynamoConnectionRegistry,
    DynamoPromptStore, FileConfig, KnowledgeBaseRetriever, LambdaTaskSubmitter, S3DocumentStore,
    load_sdk_config,
};
use relay_presentation::{
    Cli, Command, InferenceOrigin, InferencePayload, PromptLibraryRequest, PromptsAction,
    RequestDispatcher, ResponseEnvelope, Trigger,
};
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level; RUST_LOG wins when no -v is given
    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    // stdout carries only the response
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        return Ok(());
    }

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let config = load_config(cli.no_config, cli.config.as_ref())?;
    info!(
        region = %config.aws.region,
        model = %config.inference.model_id,
        "Starting bedrock-relay"
    );

    let dispatcher = build_dispatcher(&config).await;

    match command {
        Command::Handle { event } => {
            let event = read_event(event.as_ref())?;
            let envelope = dispatcher.handle_event(event).await;
            println!("{}", serde_json::to_string(&envelope)?);
        }
        Command::Ask {
            prompt,
            template,
            knowledge_base,
            document_key,
            connection_id,
            address,
        } => {
            let payload = InferencePayload {
                prompt: Some(prompt),
                prompt_template: template,
                knowledge_base_id: knowledge_base,
                connection_id,
                domain_name: address,
                document_key,
                stage: None,
            };
            let envelope = dispatcher
                .dispatch(Trigger::Inference {
                    payload,
                    origin: InferenceOrigin::Async,
                })
                .await;
            let body = expect_success(&envelope)?;
            match body.get("response").and_then(|r| r.as_str()) {
                Some(text) => println!("{}", text),
                None => println!("{}", body),
            }
        }
        Command::Prompts { action } => {
            let request = match action {
                PromptsAction::List { scope } => PromptLibraryRequest::List { scope: Some(scope) },
                PromptsAction::Save {
                    scope,
                    title,
                    prompt,
                    template,
                } => {
                    let mut record = PromptTemplate::new(scope, title, prompt);
                    if let Some(template) = template {
                        record = record.with_template(template);
                    }
                    PromptLibraryRequest::Save(record)
                }
            };
            let envelope = dispatcher.dispatch(Trigger::PromptLibrary(request)).await;
            let body = expect_success(&envelope)?;
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
    }

    Ok(())
}

/// Load, validate and convert configuration.
fn load_config(no_config: bool, path: Option<&PathBuf>) -> Result<ServiceConfig> {
    let file_config: FileConfig = if no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(path)
            .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?
    };
    file_config.validate().context("Invalid configuration")?;
    Ok(file_config.to_service_config())
}

/// Build every adapter once and inject them.
async fn build_dispatcher(config: &ServiceConfig) -> RequestDispatcher {
    let sdk_config = load_sdk_config(&config.aws).await;

    let gateway = Arc::new(BedrockInferenceGateway::new(
        &sdk_config,
        &config.inference,
        &config.aws.region,
    ));
    let retriever = Arc::new(KnowledgeBaseRetriever::new(&sdk_config, &config.retrieval));
    let relay = MessageRelay::new(Arc::new(ApiGatewayPushTransport::new(&sdk_config)));
    let coordinator = StreamCoordinator::new(gateway, retriever, relay);

    let registry = Arc::new(DynamoConnectionRegistry::new(
        &sdk_config,
        &config.storage.connections_table,
    ));
    let prompts = Arc::new(DynamoPromptStore::new(
        &sdk_config,
        &config.storage.prompts_table,
    ));
    let documents = Arc::new(S3DocumentStore::new(
        &sdk_config,
        config.storage.document_bucket.clone(),
    ));
    let tasks = Arc::new(LambdaTaskSubmitter::new(
        &sdk_config,
        config.tasks.worker_function.clone(),
    ));

    debug!(routes = ?config.dispatch.forward_routes, "Dispatcher assembled");

    RequestDispatcher::new(coordinator, registry, prompts, documents, tasks)
        .with_forward_routes(config.dispatch.forward_routes.clone())
}

fn read_event(path: Option<&PathBuf>) -> Result<serde_json::Value> {
    let raw = match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read event file {}", path.display()))?,
        None => {
            let mut raw = String::new();
            std::io::stdin()
                .read_to_string(&mut raw)
                .context("Failed to read event from stdin")?;
            raw
        }
    };
    serde_json::from_str(&raw).context("Event is not valid JSON")
}

fn expect_success(envelope: &ResponseEnvelope) -> Result<serde_json::Value> {
    let body = envelope
        .body_json()
        .unwrap_or_else(|| serde_json::Value::String(envelope.body.clone()));
    if !envelope.is_success() {
        bail!("Request failed ({}): {}", envelope.status_code, body);
    }
    Ok(body)
}
