// Import and re-export the `error` module
pub use self::error::{Error, Result};
mod error;

use azy_core::Pipeline;
use azy_core::PipelineError;
use azy_core::config::PipelineConfig;
use azy_core::policy::Denylist;
use azy_core::request::{Action, ChatRequest};
use clap::Parser;
use cli::{Cli, Commands};

mod cli;
mod logging;

fn main() -> Result<()> {
    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
    Ok(())
}

fn run() -> Result<()> {
    logging::init()?;

    let args = Cli::parse();

    match args.command {
        Commands::Version => {
            println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        }
        Commands::Check { message } => {
            let config = PipelineConfig::from_env();
            let verdict = Denylist::with_extra_terms(&config.extra_blocked_terms).check(&message);
            match verdict.matched {
                Some(term) if verdict.blocked => {
                    println!("blocked ({term})");
                    return Err(PipelineError::PolicyViolation { term }.into());
                }
                _ => println!("allowed"),
            }
        }
        Commands::Ask {
            message,
            action,
            language,
        } => {
            let action: Action = action.parse()?;
            let mut request = ChatRequest::new(action, message);
            request.language = language;
            if action == Action::Edit {
                return Err(Error::Custom(
                    "edit needs an attachment; use the HTTP endpoint".into(),
                ));
            }

            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            let reply = runtime.block_on(async {
                let pipeline = Pipeline::from_config(&PipelineConfig::from_env())?;
                pipeline.handle(request).await.map_err(Error::from)
            })?;

            println!("{}", reply.text);
            if let Some(url) = reply.media_url {
                println!("{url}");
            }
            log::info!("answered by {}", reply.source);
        }
    }

    Ok(())
}
