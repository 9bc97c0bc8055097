//! Main entry point for CLI command to start server.

use std::io::IsTerminal;
use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;
use anyhow::anyhow;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use url::Url;

use crate::configuration::Configuration;
use crate::configuration::generate_config_schema;
use crate::graph;
use crate::router::GatewayRouter;
use crate::router::ShutdownKind;

/// Options for the router
#[derive(Parser, Debug)]
#[command(
    name = "rickmorty-router",
    about = "GraphQL gateway over the Rick and Morty REST API",
    disable_version_flag = true
)]
pub(crate) struct Opt {
    /// Log level (off|error|warn|info|debug|trace).
    #[arg(
        long = "log",
        default_value = "info",
        alias = "log-level",
        env = "RICKMORTY_ROUTER_LOG"
    )]
    log_level: String,

    /// Configuration location relative to the current directory.
    #[arg(short, long = "config", env = "RICKMORTY_ROUTER_CONFIG_PATH")]
    config_path: Option<PathBuf>,

    /// Address to listen on, overriding `server.listen`.
    #[arg(long, env = "RICKMORTY_ROUTER_LISTEN")]
    listen: Option<SocketAddr>,

    /// Base URL of the REST API, overriding `upstream.url`.
    #[arg(long, env = "RICKMORTY_ROUTER_UPSTREAM_URL")]
    upstream_url: Option<Url>,

    /// Prints the configuration schema.
    #[arg(long)]
    schema: bool,

    /// Prints the GraphQL schema in SDL.
    #[arg(long)]
    print_sdl: bool,

    /// Display version and exit.
    #[arg(long, short = 'V')]
    version: bool,
}

impl Opt {
    /// Load the configuration file, if any, and apply command line overrides on top.
    pub(crate) fn configuration(&self) -> Result<Configuration> {
        let mut configuration = match &self.config_path {
            Some(path) => {
                let path = if path.is_relative() {
                    std::env::current_dir()?.join(path)
                } else {
                    path.clone()
                };
                Configuration::from_file(&path)?
            }
            None => Configuration::default(),
        };

        if let Some(listen) = self.listen {
            configuration.server.listen = listen;
        }
        if let Some(upstream_url) = &self.upstream_url {
            configuration.upstream.url = upstream_url.clone();
        }

        configuration
            .validate()
            .context("invalid configuration after applying command line overrides")
    }
}

/// This is the main router entrypoint.
pub fn main() -> Result<()> {
    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(nb) = std::env::var("RICKMORTY_ROUTER_NUM_CORES")
        .ok()
        .and_then(|value| value.parse::<usize>().ok())
    {
        builder.worker_threads(nb);
    }
    let runtime = builder.build()?;
    runtime.block_on(Executable::builder().start())
}

/// Entry point into creating a router executable.
pub struct Executable {}

#[buildstructor::buildstructor]
impl Executable {
    /// Build an executable that will parse commandline options and set up logging.
    /// The shutdown hook defaults to CTRL+C and SIGTERM.
    #[builder(entry = "builder", exit = "start")]
    pub async fn start(shutdown: Option<ShutdownKind>) -> Result<()> {
        let opt = Opt::parse();

        if opt.version {
            println!("{}", std::env!("CARGO_PKG_VERSION"));
            return Ok(());
        }

        if opt.schema {
            let schema = generate_config_schema();
            println!("{}", serde_json::to_string_pretty(&schema)?);
            return Ok(());
        }

        if opt.print_sdl {
            println!("{}", graph::sdl());
            return Ok(());
        }

        let env_filter = std::env::var("RUST_LOG")
            .ok()
            .unwrap_or_else(|| opt.log_level.clone());
        let builder = tracing_subscriber::fmt::fmt().with_env_filter(
            EnvFilter::try_new(&env_filter).context("could not parse log configuration")?,
        );
        if std::io::stdout().is_terminal() {
            builder.try_init()
        } else {
            builder.json().try_init()
        }
        .map_err(|e| anyhow!("could not set the global subscriber: {e}"))?;

        setup_panic_handler();

        let configuration = opt.configuration()?;
        tracing::info!(
            "rickmorty-router v{} // {}",
            std::env!("CARGO_PKG_VERSION"),
            configuration
        );

        let router = GatewayRouter::builder()
            .configuration(configuration)
            .shutdown(shutdown.unwrap_or(ShutdownKind::CtrlC))
            .build();
        if let Err(err) = router.serve().await {
            tracing::error!("{}", err);
            return Err(err.into());
        }
        Ok(())
    }
}

fn setup_panic_handler() {
    // Redirect panics to the logs.
    let backtrace_env = std::env::var("RUST_BACKTRACE");
    let show_backtraces =
        backtrace_env.as_deref() == Ok("1") || backtrace_env.as_deref() == Ok("full");
    std::panic::set_hook(Box::new(move |e| {
        if show_backtraces {
            let backtrace = std::backtrace::Backtrace::force_capture();
            tracing::error!("{}\n{}", e, backtrace)
        } else {
            tracing::error!("{}", e)
        }
    }));
}
