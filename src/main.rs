use anyhow::Result;
use objcmeta::cli::{self, Commands};
use objcmeta::commands::{self, ExtractConfig};
use objcmeta::observability::install_panic_hook;

fn main() -> Result<()> {
    install_panic_hook();
    let cli = cli::parse_args();

    match cli.command {
        Commands::Extract {
            path,
            name,
            output,
            format,
            sort,
            config,
            jobs,
            no_parallel,
            quiet,
            verbosity,
        } => {
            cli::init_logging(verbosity);
            if !no_parallel {
                cli::configure_thread_pool(jobs);
                tracing::debug!("Using {} worker threads", cli::get_worker_count(jobs));
            }

            commands::handle_extract(ExtractConfig {
                headers_dir: path,
                name,
                output,
                format: format.map(Into::into),
                sort: sort.map(Into::into),
                config_path: config,
                parallel: !no_parallel,
                quiet,
            })
        }
        Commands::Init { force } => commands::init_config(force),
    }
}
