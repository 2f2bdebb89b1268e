//! Command-line and environment configuration.

use clap::Parser;
use thiserror::Error;

/// Serve S3 objects as extracted text over the Model Context Protocol (stdio).
#[derive(Parser, Debug)]
#[command(name = "s3doc-mcp")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// AWS region of the bucket
    #[arg(short, long, env = "AWS_REGION", default_value = "ap-northeast-2")]
    pub region: String,

    /// S3 bucket name
    #[arg(short, long, env = "S3_BUCKET_NAME", default_value = "")]
    pub bucket: String,

    /// Content type assumed for objects that declare none
    #[arg(short = 't', long, env = "CONTENT_TYPE", default_value = "application/octet-stream")]
    pub content_type: String,

    /// Custom endpoint for S3-compatible stores
    #[arg(long, env = "AWS_ENDPOINT_URL")]
    pub endpoint: Option<String>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Startup configuration errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("AWS credentials are required. Please set AWS_ACCESS_KEY_ID and AWS_SECRET_ACCESS_KEY environment variables (missing {0})")]
    MissingCredential(&'static str),

    #[error("S3 bucket name is required. Pass --bucket or set S3_BUCKET_NAME")]
    MissingBucket,
}

/// Static access-key credentials.
#[derive(Clone)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("session_token", &self.session_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Validated server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub region: String,
    pub bucket: String,
    pub endpoint: Option<String>,
    pub default_content_type: String,
    pub credentials: Credentials,
}

impl Config {
    /// Validate arguments and read credentials through `lookup`.
    pub fn from_args(
        args: &Args,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|value| !value.is_empty())
                .ok_or(ConfigError::MissingCredential(name))
        };

        let credentials = Credentials {
            access_key_id: required("AWS_ACCESS_KEY_ID")?,
            secret_access_key: required("AWS_SECRET_ACCESS_KEY")?,
            session_token: lookup("AWS_SESSION_TOKEN").filter(|value| !value.is_empty()),
        };

        let bucket = args.bucket.trim();
        if bucket.is_empty() {
            return Err(ConfigError::MissingBucket);
        }

        Ok(Self {
            region: args.region.clone(),
            bucket: bucket.to_string(),
            endpoint: args.endpoint.clone().filter(|e| !e.is_empty()),
            default_content_type: args.content_type.clone(),
            credentials,
        })
    }

    /// Validate arguments against the process environment.
    pub fn from_env(args: &Args) -> Result<Self, ConfigError> {
        Self::from_args(args, |name| std::env::var(name).ok())
    }
}
