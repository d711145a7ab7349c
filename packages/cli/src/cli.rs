//! CLI definition and the glue between raw flags and the token engine

use crate::logging::LoggingTransformer;
use chrono::{Offset, TimeDelta, Utc};
use clap::Parser;
use jwtsmith_jwt::{
    GenerateOutcome, JwtToken, RawGrantee, SigningAlgorithm, TokenError, TokenGenerator,
    TokenRequest,
};
use std::io::Read;
use std::path::{Path, PathBuf};

/// Key file argument that reads the PEM from stdin
pub const STDIN_KEY: &str = "-";

#[derive(Parser, Debug)]
#[command(name = "jwtsmith")]
#[command(version, about = "Generate signed access tokens for a tenant user")]
pub struct Cli {
    /// Tenant identifier (integer)
    #[arg(long, env = "JWTSMITH_TENANT_ID")]
    pub tenant_id: String,

    /// User identifier
    #[arg(long, env = "JWTSMITH_USER_ID")]
    pub user_id: String,

    /// Plan identifier (integer, omitted from the token when empty)
    #[arg(long, env = "JWTSMITH_PLAN_ID", default_value = "")]
    pub plan_id: String,

    /// Signing algorithm: RS256/384/512, PS256/384/512, ES256/384/512
    #[arg(long = "alg", env = "JWTSMITH_ALG", default_value_t = SigningAlgorithm::RS256)]
    pub algorithm: SigningAlgorithm,

    /// PEM private key file (PKCS#8 or RSA PKCS#1); `-` reads stdin
    #[arg(long, short = 'k', env = "JWTSMITH_KEY_FILE")]
    pub key_file: PathBuf,

    /// Deny the personal space and grant explicit spaces instead
    #[arg(long, env = "JWTSMITH_NO_PERSONAL_SPACE")]
    pub no_personal_space: bool,

    /// Expiry as local `YYYY-MM-DDTHH:MM[:SS]` (default: one hour from now)
    #[arg(long, env = "JWTSMITH_EXPIRES_AT")]
    pub expires_at: Option<String>,

    /// Read --expires-at in UTC instead of the local timezone
    #[arg(long, env = "JWTSMITH_UTC")]
    pub utc: bool,

    /// Space grant, repeatable; only valid with --no-personal-space
    #[arg(
        long = "grant",
        value_name = "SPACE_ID:ROLE_ID",
        value_parser = parse_grant,
        value_delimiter = ',',
        env = "JWTSMITH_GRANTS",
        requires = "no_personal_space"
    )]
    pub grants: Vec<RawGrantee>,

    /// Print `{"token": ...}` / `{"error": ...}` instead of plain text
    #[arg(long, env = "JWTSMITH_JSON")]
    pub json: bool,
}

/// Failures of the shell itself, plus everything the engine reports
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Key file could not be read
    #[error("Failed to read key from {path}: {source}")]
    KeyRead {
        /// Path as given on the command line
        path: String,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Token engine error, shown verbatim
    #[error(transparent)]
    Token(#[from] TokenError),
}

/// Split `SPACE_ID:ROLE_ID` into its raw parts
///
/// Only the shape is checked here; the numbers are validated by the engine so
/// its messages reach the operator unchanged.
pub fn parse_grant(input: &str) -> Result<RawGrantee, String> {
    input
        .split_once(':')
        .map(|(space_id, role_id)| RawGrantee::new(space_id, role_id))
        .ok_or_else(|| format!("expected SPACE_ID:ROLE_ID, got `{input}`"))
}

/// Read the PEM text from a file, or from stdin for [`STDIN_KEY`]
pub fn read_private_key(path: &Path) -> Result<String, CliError> {
    let key_read = |source| CliError::KeyRead {
        path: path.display().to_string(),
        source,
    };

    let pem = if path.as_os_str() == STDIN_KEY {
        let mut pem = String::new();
        std::io::stdin().read_to_string(&mut pem).map_err(key_read)?;
        LoggingTransformer::log_key_source("stdin", pem.len());
        pem
    } else {
        let pem = std::fs::read_to_string(path).map_err(key_read)?;
        LoggingTransformer::log_key_source(&path.display().to_string(), pem.len());
        pem
    };
    Ok(pem)
}

impl Cli {
    /// Build the engine request from the parsed flags and the key text
    #[must_use]
    pub fn to_request(&self, private_key: String) -> TokenRequest {
        let mut request = TokenRequest::new()
            .with_tenant_id(self.tenant_id.as_str())
            .with_user_id(self.user_id.as_str())
            .with_plan_id(self.plan_id.as_str())
            .with_algorithm(self.algorithm)
            .with_private_key(private_key)
            .with_no_personal_space(self.no_personal_space);

        match &self.expires_at {
            Some(expires_at) => request = request.with_expires_at(expires_at.as_str()),
            None if self.utc => {
                let default = (Utc::now() + TimeDelta::hours(1)).format("%Y-%m-%dT%H:%M");
                request = request.with_expires_at(default.to_string());
            }
            None => {}
        }

        for grant in &self.grants {
            request.add_grantee(grant.clone());
        }
        request
    }

    /// Generator configured for the selected timezone
    #[must_use]
    pub fn generator(&self) -> TokenGenerator {
        let generator = TokenGenerator::new();
        if self.utc {
            generator.with_timezone(Utc.fix())
        } else {
            generator
        }
    }

    /// Read the key and run the token pipeline
    pub async fn run(&self) -> Result<JwtToken, CliError> {
        let private_key = read_private_key(&self.key_file)?;
        let request = self.to_request(private_key);
        Ok(self.generator().generate(&request).await?)
    }

    /// Text written to stdout (success) or stderr (failure)
    #[must_use]
    pub fn render(&self, result: &Result<JwtToken, CliError>) -> String {
        if !self.json {
            return match result {
                Ok(token) => token.to_string(),
                Err(e) => e.to_string(),
            };
        }

        let outcome = match result {
            Ok(token) => GenerateOutcome::Token {
                token: token.to_string(),
            },
            Err(e) => GenerateOutcome::Error {
                error: e.to_string(),
            },
        };
        serde_json::to_string(&outcome)
            .unwrap_or_else(|e| serde_json::json!({ "error": e.to_string() }).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jwtsmith_jwt::ClaimField;

    const FIXTURE_KEY: &str = concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/../jwt/tests/fixtures/rsa_pkcs8.pem"
    );

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["jwtsmith"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).expect("arguments parse")
    }

    fn base_args() -> Vec<&'static str> {
        vec![
            "--tenant-id",
            "42",
            "--user-id",
            "u1",
            "--key-file",
            FIXTURE_KEY,
            "--expires-at",
            "2999-01-01T00:00",
        ]
    }

    #[test]
    fn defaults_apply() {
        let cli = parse(&base_args());
        assert_eq!(cli.algorithm, SigningAlgorithm::RS256);
        assert_eq!(cli.plan_id, "");
        assert!(!cli.no_personal_space);
        assert!(cli.grants.is_empty());
        assert!(!cli.json);
        assert!(!cli.utc);
    }

    #[test]
    fn algorithm_names_are_exact() {
        let mut args = base_args();
        args.extend(["--alg", "ES384"]);
        assert_eq!(parse(&args).algorithm, SigningAlgorithm::ES384);

        let mut args = vec!["jwtsmith"];
        args.extend(base_args());
        args.extend(["--alg", "rs256"]);
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn grants_repeat_and_split_on_commas() {
        let mut args = base_args();
        args.extend(["--no-personal-space", "--grant", "3:2", "--grant", "5:7,11:9"]);
        let cli = parse(&args);
        assert_eq!(
            cli.grants,
            vec![
                RawGrantee::new("3", "2"),
                RawGrantee::new("5", "7"),
                RawGrantee::new("11", "9"),
            ]
        );
    }

    #[test]
    fn grant_requires_no_personal_space() {
        let mut args = vec!["jwtsmith"];
        args.extend(base_args());
        args.extend(["--grant", "3:2"]);
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn parse_grant_keeps_raw_text() {
        assert_eq!(parse_grant("x:1"), Ok(RawGrantee::new("x", "1")));
        assert_eq!(parse_grant(" 3 : 2 "), Ok(RawGrantee::new(" 3 ", " 2 ")));
        assert!(parse_grant("32").is_err());
    }

    #[test]
    fn request_carries_every_flag() {
        let mut args = base_args();
        args.extend(["--plan-id", "7", "--no-personal-space", "--grant", "3:2"]);
        let request = parse(&args).to_request("pem".to_string());

        assert_eq!(request.tenant_id(), "42");
        assert_eq!(request.user_id(), "u1");
        assert_eq!(request.plan_id(), "7");
        assert_eq!(request.private_key(), "pem");
        assert_eq!(request.expires_at(), "2999-01-01T00:00");
        assert!(request.no_personal_space());
        assert_eq!(request.grantees(), &[RawGrantee::new("3", "2")]);
    }

    #[test]
    fn utc_default_expiry_is_minute_precision() {
        let args = vec![
            "--tenant-id",
            "42",
            "--user-id",
            "u1",
            "--key-file",
            FIXTURE_KEY,
            "--utc",
        ];
        let request = parse(&args).to_request(String::new());
        assert_eq!(request.expires_at().len(), "YYYY-MM-DDTHH:MM".len());
    }

    #[tokio::test]
    async fn run_signs_with_the_key_file() {
        LoggingTransformer::init_test();
        let cli = parse(&base_args());
        let token = cli.run().await.expect("token");
        assert_eq!(token.segments().len(), 3);
        assert_eq!(cli.render(&Ok(token.clone())), token.to_string());
    }

    #[tokio::test]
    async fn engine_errors_render_verbatim() {
        let mut args = base_args();
        args[1] = "abc";
        let cli = parse(&args);
        let result = cli.run().await;
        assert!(matches!(
            &result,
            Err(CliError::Token(e)) if e.field() == Some(ClaimField::TenantId)
        ));
        assert_eq!(cli.render(&result), "Invalid tenant_id: must be a number");
    }

    #[test]
    fn json_errors_escape_quotes() {
        let mut args = base_args();
        args.push("--json");
        let cli = parse(&args);

        let err = CliError::KeyRead {
            path: r#"C:\keys\"quoted".pem"#.to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        let rendered = cli.render(&Err(err));
        let value: serde_json::Value = serde_json::from_str(&rendered).expect("valid json");
        assert_eq!(
            value["error"],
            r#"Failed to read key from C:\keys\"quoted".pem: missing"#
        );
    }

    #[tokio::test]
    async fn json_output_shapes() {
        let mut args = base_args();
        args.push("--json");
        let cli = parse(&args);

        let ok = cli.render(&cli.run().await);
        let value: serde_json::Value = serde_json::from_str(&ok).expect("json");
        assert!(value["token"].is_string());

        let missing = parse(&[
            "--tenant-id",
            "42",
            "--user-id",
            "u1",
            "--key-file",
            "/nonexistent/key.pem",
            "--json",
        ]);
        let err = missing.render(&missing.run().await);
        let value: serde_json::Value = serde_json::from_str(&err).expect("json");
        assert!(
            value["error"]
                .as_str()
                .is_some_and(|e| e.starts_with("Failed to read key from /nonexistent/key.pem"))
        );
    }
}
