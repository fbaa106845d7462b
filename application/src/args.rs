//! [`Args`] definitions.

use clap::Parser;

/// GraphQL server of the construction sites management system.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path to the configuration file.
    ///
    /// Missing file means defaults overridden by `CONF.`-prefixed
    /// environment variables.
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,

    /// Apply pending database migrations and exit without serving.
    #[arg(long)]
    pub migrate_only: bool,
}

impl Args {
    /// Parses command line arguments.
    ///
    /// # Errors
    ///
    /// If the provided arguments are malformed, or `--help`/`--version` is
    /// requested.
    pub fn parse() -> Result<Self, clap::Error> {
        <Self as Parser>::try_parse()
    }
}

#[cfg(test)]
mod spec {
    use clap::Parser as _;

    use super::Args;

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["app"]).expect("parses");

        assert_eq!(args.config, "config.toml");
        assert!(!args.migrate_only);
    }

    #[test]
    fn custom_config_and_migrate_only() {
        let args = Args::try_parse_from([
            "app",
            "-c",
            "/etc/app.toml",
            "--migrate-only",
        ])
        .expect("parses");

        assert_eq!(args.config, "/etc/app.toml");
        assert!(args.migrate_only);
    }
}
