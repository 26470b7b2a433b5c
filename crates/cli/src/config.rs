//! Command-line and environment configuration.

use apigroup::Version;
use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "apigroups",
    version,
    about = "Serve one service through every supported wire API version"
)]
pub struct Cli {
    #[command(flatten)]
    pub logging: LoggingArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Register the enabled versions and serve line-delimited JSON on stdin/stdout.
    Serve(ServeArgs),
    /// Print the method table every supported version registers.
    Versions,
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Versions to serve, comma separated (e.g. `v1alpha1,v1`). Empty serves all.
    #[arg(long, value_delimiter = ',', env = "APIGROUPS_VERSIONS")]
    pub versions: Vec<Version>,

    /// Deadline for frames that carry no `timeout_ms`, in milliseconds. 0 disables it.
    #[arg(long, default_value_t = 0, env = "APIGROUPS_DEFAULT_TIMEOUT_MS")]
    pub default_timeout_ms: u64,
}

#[derive(Args, Debug)]
pub struct LoggingArgs {
    /// Log line format. Logs always go to stderr.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty, env = "APIGROUPS_LOG_FORMAT")]
    pub log_format: LogFormat,

    /// Filter used when `RUST_LOG` is unset (e.g. `info`, `transport=debug`).
    #[arg(long, global = true, default_value = "info", env = "APIGROUPS_LOG_LEVEL")]
    pub log_level: String,

    /// OTLP/gRPC collector endpoint. Span export is off when unset.
    #[arg(long, global = true, env = "OTEL_EXPORTER_OTLP_ENDPOINT")]
    pub otlp_endpoint: Option<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_version_list() {
        let cli = Cli::try_parse_from(["apigroups", "serve", "--versions", "v1alpha1,v1"]).unwrap();
        let Command::Serve(args) = cli.command else {
            panic!("expected serve");
        };
        let versions: Vec<String> = args.versions.iter().map(Version::to_string).collect();
        assert_eq!(versions, ["v1alpha1", "v1"]);
        assert_eq!(args.default_timeout_ms, 0);
        assert_eq!(cli.logging.log_format, LogFormat::Pretty);
    }

    #[test]
    fn malformed_version_is_rejected_at_startup() {
        let err = Cli::try_parse_from(["apigroups", "serve", "--versions", "v1,version2"]).unwrap_err();
        assert!(err.to_string().contains("version2"), "{err}");
    }

    #[test]
    fn global_logging_flags_follow_the_subcommand() {
        let cli = Cli::try_parse_from(["apigroups", "versions", "--log-format", "json"]).unwrap();
        assert_eq!(cli.logging.log_format, LogFormat::Json);
        assert!(matches!(cli.command, Command::Versions));
    }
}
