pub fn generate_starter_config() -> String {
    r#"# =============================================================================
# STACLOG CONFIGURATION
# =============================================================================
# This file configures the index service connection and pipeline behavior.
#
# Config file locations (in order of precedence):
#   1. Path specified via --config argument
#   2. ~/.config/staclog/config.yml
#   3. /etc/staclog/config.yml

# =============================================================================
# INDEX SERVICE
# =============================================================================
index:
  # Base URL of the search/indexing service. Environment variables can be
  # referenced as $env{VAR_NAME}.
  endpoint: https://$env{ES_HOST}:443

  # Optional basic-auth credentials. Omit both when the ambient execution
  # environment supplies authentication.
  # username: admin
  # password: $env{ES_PASSWORD}

  # Daily index names are <prefix>YYYYMMDD, dated from the first event of
  # each batch (UTC).
  prefix: stac_updater_logs_

  # safe:      create-only insert, merge into the stored document on
  #            conflict (idempotent, converges across batches)
  # overwrite: plain upsert replacing the stored document
  write_mode: safe

  # Per-request timeout for store calls, in seconds.
  timeout_seconds: 30

# =============================================================================
# PIPELINE
# =============================================================================
pipeline:
  errors:
    # abort: reject the whole batch when one log line fails to parse
    # skip:  drop the unparseable record and continue with the rest
    on_parse_error: abort
"#
    .to_string()
}
