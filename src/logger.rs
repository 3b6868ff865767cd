use std::path::Path;

use data::log::Error;

/// Installs the global logger: timestamped lines to stdout and, when a path is
/// given, to a fresh log file as well.
pub fn setup(level: log::LevelFilter, path: Option<&Path>) -> Result<(), Error> {
    let mut dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}:{} [{}] -- {}",
                chrono::Local::now().format("%H:%M:%S%.3f"),
                record.target(),
                record.level(),
                message
            ));
        })
        .level(log::LevelFilter::Off)
        .level_for("graphview", level)
        .level_for("graphview_data", level)
        .level_for("graphview_service", level)
        .chain(std::io::stdout());

    if let Some(path) = path {
        dispatch = dispatch.chain(data::log::file(path)?);
    }

    dispatch.apply()?;
    Ok(())
}

/// Like [`setup`], with the level given by name (`"info"`, `"debug"`, ...).
pub fn setup_named(level: &str, path: Option<&Path>) -> Result<(), Error> {
    setup(data::log::parse_level(level)?, path)
}
