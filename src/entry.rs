use std::ffi::OsString;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use clap::{ArgMatches, CommandFactory, FromArgMatches};
use tracing::{error, info};

use vuload::args::{LoadArgs, OutputFormat};
use vuload::config::{DEFAULT_CONFIG_FILES, apply_config, load_config};
use vuload::error::{AppError, AppResult};
use vuload::http::HttpExecutor;
use vuload::report::{ReportContext, render_json, render_text};
use vuload::run::RunController;
use vuload::shutdown::interrupt_signal;

pub(crate) fn run() -> AppResult<()> {
    let (args, matches) = match parse_args()? {
        Some(parsed) => parsed,
        None => return Ok(()),
    };

    crate::logger::init_logging(args.verbose, args.no_color);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(run_async(args, &matches))
}

fn parse_args() -> AppResult<Option<(LoadArgs, ArgMatches)>> {
    let mut cmd = LoadArgs::command();
    let raw_args: Vec<OsString> = std::env::args_os().collect();

    if should_show_help(&raw_args) {
        cmd.print_help()?;
        println!();
        return Ok(None);
    }

    let matches = cmd.get_matches_from(raw_args);
    let args = LoadArgs::from_arg_matches(&matches)?;

    Ok(Some((args, matches)))
}

fn should_show_help(raw_args: &[OsString]) -> bool {
    let treat_as_empty =
        matches!(raw_args, [] | [_]) || matches!(raw_args, [_, second] if second == "--");
    if !treat_as_empty {
        return false;
    }

    !has_default_config()
}

fn has_default_config() -> bool {
    DEFAULT_CONFIG_FILES
        .iter()
        .any(|path| Path::new(path).exists())
}

async fn run_async(mut args: LoadArgs, matches: &ArgMatches) -> AppResult<()> {
    if let Some(config) = load_config(args.config.as_deref())? {
        apply_config(&mut args, matches, &config)?;
    }

    let executor = HttpExecutor::new(&args.executor_settings())?;
    let controller = RunController::new(Arc::new(executor))
        .with_stats(&args.stats_settings())?
        .with_progress_interval(args.progress_interval());

    let config = args.run_config();
    let started_at = Utc::now();
    if let Err(err) = controller.start(&config).await {
        error!("Run could not start: {}", err);
        return Err(AppError::run(err));
    }

    let summary = tokio::select! {
        result = controller.wait() => result?,
        () = interrupt_signal() => {
            info!("Interrupted; letting in-flight requests finish.");
            controller.stop().await?
        }
    };

    let context = ReportContext {
        target: config.target_url.trim().to_owned(),
        virtual_users: config.virtual_users,
        planned_duration: config.duration,
        started_at,
    };
    let rendered = match args.output_format {
        OutputFormat::Text => render_text(&summary, &context)?,
        OutputFormat::Json => render_json(&summary, &context)?,
    };

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", rendered.trim_end())?;
    stdout.flush()?;
    Ok(())
}
