//! Record Browser - Entry Point

use clap::Parser;
use futures::executor::block_on;
use recbrowse::model::{AppError, BrowserError, FilterForm, RecordId, SortDirective};
use recbrowse::source::{DataSource, PendingQuery};
use recbrowse::state::{ApplyOutcome, BrowserController, ItemClick};
use serde_json::Value;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, warn};

/// Record Browser - filter, sort and page through a JSON item file
#[derive(Parser, Debug)]
#[command(name = "recbrowse")]
#[command(version)]
#[command(about = "Filter, sort and page through a JSON item file, printing the view as JSON")]
pub struct Args {
    /// Path to the JSON item file
    pub file: PathBuf,

    /// Filter form entry as KEY=VALUE (VALUE is parsed as JSON when possible)
    #[arg(short, long = "filter", value_parser = parse_filter_entry)]
    pub filters: Vec<(String, Value)>,

    /// Sort directive as KEY, KEY:asc or KEY:desc (first is primary)
    #[arg(short, long = "sort")]
    pub sorts: Vec<String>,

    /// Page to show (1-based)
    #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
    pub page: Option<u64>,

    /// Records per page
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub page_size: Option<u64>,

    /// Select the record with this id on the shown page
    #[arg(long = "select")]
    pub selections: Vec<String>,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Parse `KEY=VALUE` into a filter form entry.
fn parse_filter_entry(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    if key.is_empty() {
        return Err(format!("empty key in '{raw}'"));
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

fn drive<D: DataSource>(
    controller: &mut BrowserController<D>,
    pending: PendingQuery,
) -> Result<ApplyOutcome, BrowserError> {
    block_on(controller.resolve(pending))
}

fn run(args: Args) -> Result<(), AppError> {
    // Load configuration with full precedence chain:
    // Defaults → Config File → Env Vars → CLI Args
    let config = {
        let config_file = recbrowse::config::load_config_with_precedence(args.config.clone())?;
        let merged = recbrowse::config::merge_config(config_file)?;
        let with_env = recbrowse::config::apply_env_overrides(merged);
        let page_size = args.page_size.map(|n| usize::try_from(n).unwrap_or(usize::MAX));
        recbrowse::config::apply_cli_overrides(with_env, page_size)?
    };

    recbrowse::logging::init(&config.log_file_path)?;

    info!(
        config = ?config,
        "Configuration loaded and resolved"
    );

    let adapter = &config.browser.data_adapter;
    let items = recbrowse::source::load_items(&args.file, &adapter.items_prop)?;
    info!(count = items.len(), file = %args.file.display(), "items loaded");

    let source = recbrowse::source::for_adapter(adapter, items);
    let page_size = config.browser.page_size;
    let mut controller = BrowserController::new(source, config.browser);

    let pending = controller.load()?;
    drive(&mut controller, pending)?;

    if !args.filters.is_empty() {
        let form: FilterForm = args.filters.into_iter().collect();
        let pending = controller.set_filter_form(form)?;
        drive(&mut controller, pending)?;
    }

    if !args.sorts.is_empty() {
        let sort = args.sorts.iter().map(|raw| SortDirective::parse(raw)).collect();
        let pending = controller.set_sort(sort)?;
        drive(&mut controller, pending)?;
    }

    if let Some(page) = args.page {
        let page = usize::try_from(page - 1).unwrap_or(usize::MAX);
        let pending = controller.go_to_index(page.saturating_mul(page_size))?;
        drive(&mut controller, pending)?;
    }

    for raw in args.selections {
        let id = RecordId::new(raw);
        if controller.selection().contains(&id) {
            continue;
        }
        match controller.page_ids().iter().position(|candidate| *candidate == id) {
            Some(index) => controller.click(&ItemClick::plain(index, id).on_affordance())?,
            None => warn!(id = %id, "selected id is not on the shown page"),
        }
    }

    let view = controller.view();
    println!("{}", serde_json::to_string_pretty(&view)?);

    controller.dispose();
    Ok(())
}

fn main() -> ExitCode {
    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("recbrowse: {err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use serde_json::json;

    #[test]
    fn test_help_does_not_error() {
        let result = Args::try_parse_from(["recbrowse", "--help"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_version_does_not_error() {
        let result = Args::try_parse_from(["recbrowse", "--version"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_file_is_required() {
        let result = Args::try_parse_from(["recbrowse"]);
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().kind(),
            clap::error::ErrorKind::MissingRequiredArgument
        );
    }

    #[test]
    fn test_file_only_defaults() {
        let args = Args::parse_from(["recbrowse", "items.json"]);
        assert_eq!(args.file, PathBuf::from("items.json"));
        assert!(args.filters.is_empty());
        assert!(args.sorts.is_empty());
        assert_eq!(args.page, None);
        assert_eq!(args.page_size, None);
        assert!(args.selections.is_empty());
        assert_eq!(args.config, None);
    }

    #[test]
    fn test_repeated_filters_and_sorts() {
        let args = Args::parse_from([
            "recbrowse",
            "items.json",
            "--filter",
            "team=red",
            "-f",
            "age=34",
            "--sort",
            "age:desc",
            "-s",
            "name",
        ]);
        assert_eq!(
            args.filters,
            vec![("team".to_string(), json!("red")), ("age".to_string(), json!(34))]
        );
        assert_eq!(args.sorts, vec!["age:desc", "name"]);
    }

    #[test]
    fn test_filter_requires_equals_sign() {
        let result = Args::try_parse_from(["recbrowse", "items.json", "--filter", "team"]);
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().kind(),
            clap::error::ErrorKind::ValueValidation
        );
    }

    #[test]
    fn test_filter_value_keeps_equals_signs() {
        assert_eq!(
            parse_filter_entry("expr=a=b"),
            Ok(("expr".to_string(), json!("a=b")))
        );
        assert!(parse_filter_entry("=x").is_err());
    }

    #[test]
    fn test_page_rejects_zero() {
        let result = Args::try_parse_from(["recbrowse", "items.json", "--page", "0"]);
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().kind(),
            clap::error::ErrorKind::ValueValidation
        );
    }

    #[test]
    fn test_page_size_rejects_zero() {
        let result = Args::try_parse_from(["recbrowse", "items.json", "--page-size", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_select_is_repeatable() {
        let args = Args::parse_from(["recbrowse", "items.json", "--select", "1", "--select", "b"]);
        assert_eq!(args.selections, vec!["1", "b"]);
    }
}
