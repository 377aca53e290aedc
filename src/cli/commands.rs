//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::path::PathBuf;

use trellis_humanize::HumanizeNumberFormatter;

use crate::errors::RunError;
use crate::loader::{SearchOption, discover_suites};
use crate::selftest;
use crate::suite::Module;
use crate::trace::{TraceSink, TracingSink, WriterSink};
use crate::version::TRELLIS_VERSION;
use crate::TestRunner;

use super::{CliError, CliResult, ExitCode, SinkKind};

/// Options of the `run` command.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub dir: Option<PathBuf>,
    pub pattern: String,
    pub top_only: bool,
    pub sink: SinkKind,
}

/// Run the built-in self-test modules.
///
/// Without a directory the built-in module runs directly. With one, the module files are discovered
/// and resolved against [`selftest::catalog`].
pub fn run_selftests(options: &RunOptions) -> CliResult<ExitCode> {
    println!("Running [trellis {}]", TRELLIS_VERSION);

    let catalog = selftest::catalog();
    let builtin = selftest::module();
    let modules: Vec<&Module> = match &options.dir {
        None => vec![&builtin],
        Some(dir) => {
            let option = if options.top_only {
                SearchOption::TopDirectoryOnly
            } else {
                SearchOption::AllDirectories
            };
            discover_suites(&catalog, dir, &options.pattern, option)
                .map_err(CliError::diagnostic)?
                .ok_or_else(|| CliError::failure(format!("Error: `{}` is not a directory", dir.display())))?
        }
    };

    if modules.is_empty() {
        tracing::warn!(pattern = %options.pattern, "no suite modules found");
    }

    let result = match options.sink {
        SinkKind::Stderr => run_modules(WriterSink::stderr(), &modules),
        SinkKind::Log => run_modules(TracingSink, &modules),
    };
    result.map_err(CliError::diagnostic)?;
    Ok(ExitCode::SUCCESS)
}

fn run_modules<T: TraceSink>(sink: T, modules: &[&Module]) -> Result<(), RunError> {
    let mut runner = TestRunner::new(sink);
    for module in modules {
        tracing::debug!(module = module.name(), "running module");
        runner.run_module(Some(module))?;
    }
    Ok(())
}

/// Print `value` humanized with the given format specifier.
pub fn humanize_value(value: i64, format: Option<&str>) -> CliResult<ExitCode> {
    let formatter = HumanizeNumberFormatter::new();
    let text = formatter.format(format, value).ok_or_else(|| {
        CliError::failure(format!(
            "Error: unknown format specifier `{}` (expected D or B)",
            format.unwrap_or_default()
        ))
    })?;
    println!("{}", text);
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn options(dir: Option<PathBuf>) -> RunOptions {
        RunOptions {
            dir,
            pattern: crate::loader::DEFAULT_SUITE_PATTERN.to_string(),
            top_only: false,
            sink: SinkKind::Log,
        }
    }

    #[test]
    fn test_run_builtin_selftests() {
        assert_eq!(run_selftests(&options(None)).unwrap(), ExitCode::SUCCESS);
    }

    #[test]
    fn test_run_missing_dir_fails() {
        let err = run_selftests(&options(Some(PathBuf::from("/definitely/not/here")))).unwrap_err();
        assert_eq!(err.exit_code, ExitCode::FAILURE);
        assert!(err.message.contains("not a directory"));
    }

    #[test]
    fn test_humanize_unknown_specifier_fails() {
        let err = humanize_value(1, Some("X")).unwrap_err();
        assert!(err.message.contains("`X`"));
    }

    #[test]
    fn test_humanize_known_specifiers() {
        assert_eq!(humanize_value(1000, Some("D")).unwrap(), ExitCode::SUCCESS);
        assert_eq!(humanize_value(1000, None).unwrap(), ExitCode::SUCCESS);
    }
}
