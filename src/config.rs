//! Configuration for a run
//!
//! Resolved from the parsed command line (clap already folds in the
//! `NIFI_*` environment variables) and validated before any network call.

use std::fmt;
use std::num::NonZeroUsize;

use nifi_align_client::NifiClientConfig;
use nifi_align_core::{AlignError, AlignResult, AlignmentRequest, Depth, GroupId};
use reqwest::Url;

use crate::cli::{AlignArgs, Cli, Commands};

/// Username and password exchanged for a session token
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Username of the user
    pub username: String,
    password: String,
}

impl Credentials {
    /// Create credentials; both parts must be non-blank
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> AlignResult<Self> {
        let username = username.into();
        let password = password.into();
        if username.trim().is_empty() {
            return Err(AlignError::Configuration("Username is required.".to_string()));
        }
        if password.is_empty() {
            return Err(AlignError::Configuration("Password is required.".to_string()));
        }
        Ok(Self { username, password })
    }

    /// Password of the user
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Fully validated configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Normalized NiFi base url
    pub location: Url,
    /// Login credentials
    pub credentials: Credentials,
    /// Per request timeout
    pub timeout_secs: u64,
    /// Skip TLS certificate validation
    pub accept_invalid_certs: bool,
    /// What to align
    pub request: AlignmentRequest,
}

impl AppConfig {
    /// Resolve and validate the configuration of a parsed command line
    pub fn from_cli(cli: &Cli) -> AlignResult<Self> {
        let location = cli
            .location
            .as_deref()
            .ok_or_else(|| AlignError::Configuration("NiFi location is required.".to_string()))?;
        let location = normalize_location(location)?;

        let credentials = Credentials::new(
            cli.username.clone().unwrap_or_default(),
            cli.password.clone().unwrap_or_default(),
        )?;

        if cli.timeout_secs == 0 {
            return Err(AlignError::Configuration(
                "Timeout must be at least 1 second.".to_string(),
            ));
        }

        let request = match &cli.command {
            Commands::Align(args) => alignment_request(args)?,
        };

        Ok(Self {
            location,
            credentials,
            timeout_secs: cli.timeout_secs,
            accept_invalid_certs: cli.insecure,
            request,
        })
    }

    /// Settings for the REST client
    pub fn client_config(&self) -> NifiClientConfig {
        NifiClientConfig {
            base_url: self.location.clone(),
            timeout_secs: self.timeout_secs,
            accept_invalid_certs: self.accept_invalid_certs,
        }
    }
}

/// Build the alignment request of the `align` subcommand
pub fn alignment_request(args: &AlignArgs) -> AlignResult<AlignmentRequest> {
    let columns = usize::try_from(args.columns)
        .ok()
        .and_then(NonZeroUsize::new)
        .ok_or_else(|| {
            AlignError::Configuration("Maximum columns number can not be less than 1.".to_string())
        })?;
    let depth = Depth::from_signed(args.depth)?;
    let root = GroupId::resolve(args.root_pg_id.as_deref());

    Ok(AlignmentRequest::new(root, depth, columns))
}

/// Reduce a user supplied url to scheme, userinfo, host and port
pub fn normalize_location(value: &str) -> AlignResult<Url> {
    let invalid = || AlignError::Configuration(format!("Invalid NiFi URL ({}) provided.", value));

    let mut url = Url::parse(value.trim()).map_err(|_| invalid())?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().map_or(true, str::is_empty) {
        return Err(invalid());
    }

    url.set_path("");
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}
