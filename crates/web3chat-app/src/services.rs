//! Build the completion service and SessionManager from config.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};
use web3chat_ai::{
    AiError, CompletionsClient, ConversationSettings, EndpointConfig, GenerationParams,
    GraphQlClient, SessionManager,
};
use web3chat_config::{HistoryMode, ServiceConfig, Transport, Web3ChatConfig};

pub fn endpoint_config(service: &ServiceConfig) -> EndpointConfig {
    let endpoint = EndpointConfig::new(service.endpoint.clone())
        .with_connect_timeout(Duration::from_secs(service.connect_timeout_secs.into()))
        .with_request_timeout(Duration::from_secs(service.request_timeout_secs.into()));
    match service.api_key() {
        Some(key) => endpoint.with_api_key(key),
        None => endpoint,
    }
}

pub fn conversation_settings(config: &Web3ChatConfig) -> ConversationSettings {
    ConversationSettings {
        generation: GenerationParams {
            model: config.generation.model.clone(),
            temperature: config.generation.temperature,
            max_tokens: config.generation.max_tokens,
        },
        welcome_message: config.session.welcome().map(str::to_string),
        error_message: config.session.error_message.clone(),
    }
}

pub fn build_manager(config: &Web3ChatConfig) -> Result<SessionManager, AiError> {
    let endpoint = endpoint_config(&config.service);
    let settings = conversation_settings(config);
    info!(
        transport = ?config.service.transport,
        endpoint = %endpoint.url,
        model = %settings.generation.model,
        "connecting to completion service"
    );

    let manager = match config.service.transport {
        Transport::GraphQl => {
            let client = Arc::new(GraphQlClient::new(endpoint)?);
            let manager = SessionManager::new(client.clone(), settings);
            match config.service.history {
                HistoryMode::Remote => manager.with_remote_history(client),
                HistoryMode::Local => manager,
            }
        }
        Transport::Http => {
            if config.service.history == HistoryMode::Remote {
                warn!("remote history needs the graphql transport; keeping history local");
            }
            SessionManager::new(Arc::new(CompletionsClient::new(endpoint)?), settings)
        }
    };
    Ok(manager)
}
