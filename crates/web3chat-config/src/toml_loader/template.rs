//! Default TOML config template with inline documentation comments.

pub(crate) fn default_config_toml() -> &'static str {
    r##"# web3chat configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[service]
# transport = "graphql"        # graphql, http
# endpoint = "https://openai-workers-proxy.leonaries9527.workers.dev/graphql"
# history = "local"            # local, remote (remote requires graphql)
# api_key_env = "WEB3CHAT_API_KEY"
# connect_timeout_secs = 10    # 1-120
# request_timeout_secs = 120   # 1-600

[generation]
# model = "gpt-3.5-turbo"
# temperature = 0.7            # 0.0-2.0
# max_tokens = 1000            # 1-32768

[session]
# welcome_message = "Hello! I'm your AI assistant. Ready to explore the digital future?"
# error_message = "Sorry, something went wrong. Please try again."

[display]
# title = "Web3 AI Assistant"
# subtitle = "Next-generation conversation"
# show_timestamps = true
# color = true

[logging]
# level = "info"               # trace, debug, info, warn, error
"##
}
