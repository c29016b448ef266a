use crate::config::StoreConfig;

pub const LOG_FILE_BASENAME: &str = "tasklist";
pub const LOG_FILE_SUFFIX: &str = "log";
pub const LOG_ROTATE_SIZE_BYTES: u64 = 10 * 1024 * 1024;
pub const LOG_ROTATE_KEEP_FILES: usize = 5;

/// Log spec used when neither the config nor the environment sets one.
pub fn default_log_spec() -> &'static str {
    if cfg!(debug_assertions) {
        "warn,tasklist=debug"
    } else {
        "warn,tasklist=info"
    }
}

pub fn effective_log_spec(config: &StoreConfig) -> String {
    config
        .log_spec
        .as_deref()
        .map(str::trim)
        .filter(|spec| !spec.is_empty())
        .unwrap_or(default_log_spec())
        .to_string()
}

/// Starts the logger. Files rotate under `config.log_dir` when set, otherwise
/// output goes to stderr so it does not interleave with the shell's stdout.
///
/// The returned handle must stay alive for the lifetime of the process.
#[cfg(all(feature = "app", not(test)))]
pub fn init_logging(
    config: &StoreConfig,
) -> Result<flexi_logger::LoggerHandle, flexi_logger::FlexiLoggerError> {
    use flexi_logger::{detailed_format, Cleanup, Criterion, FileSpec, Logger, Naming, WriteMode};

    let spec = effective_log_spec(config);
    let logger = Logger::try_with_str(&spec)?;
    let handle = match &config.log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            logger
                .log_to_file(
                    FileSpec::default()
                        .directory(dir)
                        .basename(LOG_FILE_BASENAME)
                        .suffix(LOG_FILE_SUFFIX),
                )
                .write_mode(WriteMode::BufferAndFlush)
                .format_for_files(detailed_format)
                .rotate(
                    Criterion::Size(LOG_ROTATE_SIZE_BYTES),
                    Naming::Numbers,
                    Cleanup::KeepLogFiles(LOG_ROTATE_KEEP_FILES),
                )
                .start()?
        }
        None => logger.log_to_stderr().start()?,
    };

    install_panic_hook();

    log::info!(
        "logger initialized spec={} dir={}",
        spec,
        config
            .log_dir
            .as_ref()
            .map(|dir| dir.display().to_string())
            .unwrap_or_else(|| "<stderr>".to_string())
    );
    Ok(handle)
}

// Logs the panicking thread before the default hook runs.
#[cfg(all(feature = "app", not(test)))]
fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info: &std::panic::PanicHookInfo<'_>| {
        let thread = std::thread::current();
        let location = info
            .location()
            .map(|loc| loc.to_string())
            .unwrap_or_else(|| "<unknown>".to_string());
        // Empty unless RUST_BACKTRACE is set.
        let backtrace = std::backtrace::Backtrace::capture();

        log::error!(
            "panic thread={} location={location} message={}\nbacktrace: {backtrace}",
            thread.name().unwrap_or("<unnamed>"),
            panic_message(info.payload())
        );
        default_hook(info);
    }));
}

pub fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("<non-string panic payload>")
}
