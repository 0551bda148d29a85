use std::{fs::OpenOptions, io, path::Path, sync::Mutex};

use tracing_subscriber::{fmt::writer::MakeWriterExt, EnvFilter};

/// Install the global subscriber, logging to stderr so report output on
/// stdout stays machine-readable. With `log_file`, every line is appended to
/// that file too.
pub fn init_tracing(log_file: Option<&Path>) -> io::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);

    match log_file {
        Some(path) => {
            if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
                std::fs::create_dir_all(dir)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            builder
                .with_writer(io::stderr.and(Mutex::new(file)))
                .with_ansi(false)
                .init();
        }
        None => builder.with_writer(io::stderr).init(),
    }

    Ok(())
}
