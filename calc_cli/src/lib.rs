//! # Calcdeck CLI
//!
//! Command-line front end for `calc_core`: unit conversion, keypad sessions
//! with persisted history, the calculator catalog with favorites and recents,
//! and the finance/construction estimators.

use std::ffi::OsString;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{debug, info};
use serde::Serialize;

use calc_core::calculator::Calculator;
use calc_core::catalog::{self, CalculatorInfo};
use calc_core::estimate::{estimate_paint, estimate_roofing, PaintProduct, RoofingMaterial};
use calc_core::finance::{compound_interest, loan_payment, percent_change, percentage_of, CompoundInput, LoanInput};
use calc_core::format::format_result;
use calc_core::history::{CalculationHistory, CalculationHistoryEntry};
use calc_core::preferences::{Favorites, RecentCalculators};
use calc_core::settings::Settings;
use calc_core::share::{conversion_summary, whatsapp_url, ShareSummary};
use calc_core::storage::{Repository, Storage};
use calc_core::units::{ConversionRequest, QuantityKind, TemperatureUnit, UnitTable};
use calc_core::CalculatorState;

#[derive(Debug, Parser)]
#[command(name = "calc_cli")]
#[command(about = "Calcdeck CLI", version)]
pub struct Cli {
    /// Directory holding settings, history, favorites and recents
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Convert a value between two units of the same kind.
    Convert {
        #[arg(value_name = "VALUE", allow_hyphen_values = true)]
        value: String,
        #[arg(value_name = "FROM")]
        from: String,
        #[arg(value_name = "TO")]
        to: String,
        #[arg(long, short, default_value = "length")]
        kind: QuantityKind,
    },
    /// List the units of a quantity kind.
    Units {
        #[arg(value_name = "KIND")]
        kind: QuantityKind,
    },
    /// Press keys on the keypad calculator and print the display.
    Keys {
        #[arg(value_name = "KEY", required = true, num_args = 1.., allow_hyphen_values = true)]
        keys: Vec<String>,
    },
    /// Interactive keypad session reading keys from stdin.
    Session,
    /// Show calculation history, newest first.
    History {
        #[arg(long)]
        clear: bool,
    },
    /// Search the calculator catalog.
    Search {
        #[arg(value_name = "QUERY", default_value = "")]
        query: String,
    },
    /// Open a calculator and mark it as recently used.
    Open {
        #[arg(value_name = "ID")]
        id: String,
    },
    /// Manage favorite calculators.
    Favorites {
        #[command(subcommand)]
        action: Option<FavoritesAction>,
    },
    /// Show recently opened calculators.
    Recent,
    /// Run a key sequence and print share text plus a WhatsApp link.
    Share {
        #[arg(value_name = "KEY", required = true, num_args = 1.., allow_hyphen_values = true)]
        keys: Vec<String>,
    },
    /// Percent of a value, or percent change between two values.
    Percent {
        #[command(subcommand)]
        action: PercentAction,
    },
    /// Monthly payment for an amortized loan.
    Loan {
        #[arg(long)]
        principal: f64,
        /// Annual interest rate in percent
        #[arg(long)]
        rate: f64,
        #[arg(long)]
        years: f64,
    },
    /// Compound interest on a deposit.
    Compound {
        #[arg(long)]
        principal: f64,
        /// Annual interest rate in percent
        #[arg(long)]
        rate: f64,
        #[arg(long)]
        years: f64,
        #[arg(long, default_value_t = 12)]
        periods: u32,
    },
    /// Litres and cans of paint for a wall area.
    Paint {
        /// Area in m²
        #[arg(long)]
        area: f64,
        #[arg(long, default_value_t = 2)]
        coats: u32,
        #[arg(long, default_value = "interior")]
        product: PaintProduct,
    },
    /// Squares and bundles of roofing for a plan area.
    Roofing {
        /// Plan area in ft²
        #[arg(long)]
        area: f64,
        #[arg(long, default_value_t = 1.0)]
        pitch: f64,
        #[arg(long, default_value = "asphalt")]
        material: RoofingMaterial,
    },
}

#[derive(Debug, Subcommand)]
enum FavoritesAction {
    List,
    Add { id: String },
    Remove { id: String },
    Toggle { id: String },
}

#[derive(Debug, Subcommand)]
enum PercentAction {
    /// PERCENT% of VALUE
    Of {
        #[arg(allow_hyphen_values = true)]
        percent: f64,
        #[arg(allow_hyphen_values = true)]
        value: f64,
    },
    /// Change from FROM to TO in percent
    Change {
        #[arg(allow_hyphen_values = true)]
        from: f64,
        #[arg(allow_hyphen_values = true)]
        to: f64,
    },
}

#[derive(Debug, Serialize)]
struct ConversionOutput<'a> {
    kind: QuantityKind,
    value: f64,
    from: &'a str,
    to: &'a str,
    result: Option<f64>,
}

#[derive(Debug, Serialize)]
struct UnitOutput {
    symbol: &'static str,
    name: &'static str,
    category: Option<&'static str>,
}

#[derive(Debug, Serialize)]
struct KeysOutput<'a> {
    display: &'a str,
    state: &'a CalculatorState,
    recorded: Vec<&'a CalculationHistoryEntry>,
}

#[derive(Debug, Serialize)]
struct ShareOutput<'a> {
    text: &'a str,
    whatsapp: String,
}

pub fn run<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::parse_from(args);
    init_logging(cli.verbose);

    let ctx = RunContext::new(cli.data_dir, cli.json);

    match cli.command {
        Commands::Convert { value, from, to, kind } => run_convert(&ctx, kind, &value, &from, &to),
        Commands::Units { kind } => run_units(&ctx, kind),
        Commands::Keys { keys } => run_keys(&ctx, &keys.join(" ")),
        Commands::Session => run_session(&ctx),
        Commands::History { clear } => run_history(&ctx, clear),
        Commands::Search { query } => run_search(&ctx, &query),
        Commands::Open { id } => run_open(&ctx, &id),
        Commands::Favorites { action } => run_favorites(&ctx, action.unwrap_or(FavoritesAction::List)),
        Commands::Recent => run_recent(&ctx),
        Commands::Share { keys } => run_share(&ctx, &keys.join(" ")),
        Commands::Percent { action } => run_percent(&ctx, action),
        Commands::Loan { principal, rate, years } => run_loan(
            &ctx,
            LoanInput {
                principal,
                annual_rate_percent: rate,
                years,
            },
        ),
        Commands::Compound { principal, rate, years, periods } => run_compound(
            &ctx,
            CompoundInput {
                principal,
                annual_rate_percent: rate,
                years,
                compounds_per_year: periods,
            },
        ),
        Commands::Paint { area, coats, product } => run_paint(&ctx, area, coats, product),
        Commands::Roofing { area, pitch, material } => run_roofing(&ctx, area, pitch, material),
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    // try_init: run() may be called more than once per process
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .try_init();
}

// ============================================================================
// Shared state
// ============================================================================

/// Per-invocation options shared by every subcommand.
struct RunContext {
    data_dir: Option<PathBuf>,
    json: bool,
}

impl RunContext {
    fn new(data_dir: Option<PathBuf>, json: bool) -> Self {
        RunContext { data_dir, json }
    }

    fn storage(&self) -> Result<Storage> {
        let storage = Storage::resolve(self.data_dir.as_deref()).context("failed to resolve data directory")?;
        debug!("data directory: {}", storage.root().display());
        Ok(storage)
    }

    fn settings(&self, storage: &Storage) -> Result<Settings> {
        Settings::load(storage.root()).context("failed to load settings")
    }

    fn print_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }
}

fn load_calculator(storage: &Storage, settings: &Settings) -> Result<Calculator> {
    let mut history: CalculationHistory = storage
        .repository(Storage::HISTORY_KEY)
        .load()
        .context("failed to load calculation history")?;
    history.set_cap(settings.history_cap);
    Ok(Calculator::with_history(history).with_angle_mode(settings.angle_mode))
}

fn save_history(storage: &Storage, history: &CalculationHistory) -> Result<()> {
    storage
        .repository(Storage::HISTORY_KEY)
        .save(history)
        .context("failed to save calculation history")
}

fn load_recent(storage: &Storage, settings: &Settings) -> Result<RecentCalculators> {
    let mut recent: RecentCalculators = storage
        .repository(Storage::RECENT_KEY)
        .load()
        .context("failed to load recent calculators")?;
    recent.set_cap(settings.recent_cap);
    Ok(recent)
}

/// Feed a key line, returning how many history entries it produced.
fn press_line(calc: &mut Calculator, line: &str) -> calc_core::CalcResult<usize> {
    let events = calc_core::calculator::parse_keys(line)?;
    let mut recorded = 0;
    for event in events {
        if calc.press(event).is_some() {
            recorded += 1;
        }
    }
    Ok(recorded)
}

// ============================================================================
// Conversion
// ============================================================================

fn run_convert(ctx: &RunContext, kind: QuantityKind, value: &str, from: &str, to: &str) -> Result<()> {
    let Some(request) = ConversionRequest::parse(value, from, to) else {
        // Malformed input is "no result yet", not an error
        if ctx.json {
            return ctx.print_json(&serde_json::json!({ "kind": kind, "result": null }));
        }
        println!("no result");
        return Ok(());
    };

    let result = request.evaluate(kind)?;

    if ctx.json {
        return ctx.print_json(&ConversionOutput {
            kind,
            value: request.value,
            from: &request.from,
            to: &request.to,
            result: Some(result),
        });
    }
    println!("{}", conversion_summary(request.value, &request.from, result, &request.to));
    Ok(())
}

fn run_units(ctx: &RunContext, kind: QuantityKind) -> Result<()> {
    let units: Vec<UnitOutput> = match UnitTable::for_kind(kind) {
        Some(table) => table
            .units
            .iter()
            .map(|u| UnitOutput {
                symbol: u.symbol,
                name: u.name,
                category: u.category.map(|c| c.display_name()),
            })
            .collect(),
        None => TemperatureUnit::ALL
            .iter()
            .map(|u| UnitOutput {
                symbol: u.symbol(),
                name: u.name(),
                category: None,
            })
            .collect(),
    };

    if ctx.json {
        return ctx.print_json(&units);
    }

    println!("{} units:", kind.display_name());
    for unit in &units {
        match unit.category {
            Some(category) => println!("  {:<6} {:<24} {}", unit.symbol, unit.name, category),
            None => println!("  {:<6} {}", unit.symbol, unit.name),
        }
    }
    Ok(())
}

// ============================================================================
// Keypad
// ============================================================================

fn run_keys(ctx: &RunContext, keys: &str) -> Result<()> {
    let storage = ctx.storage()?;
    let settings = ctx.settings(&storage)?;
    let mut calc = load_calculator(&storage, &settings)?;

    let recorded = press_line(&mut calc, keys)?;
    if recorded > 0 {
        save_history(&storage, calc.history())?;
        info!("recorded {} calculation(s)", recorded);
    }

    if ctx.json {
        return ctx.print_json(&KeysOutput {
            display: calc.display(),
            state: calc.state(),
            recorded: calc.history().iter().take(recorded).collect(),
        });
    }
    println!("{}", calc.display());
    Ok(())
}

fn run_session(ctx: &RunContext) -> Result<()> {
    let storage = ctx.storage()?;
    let settings = ctx.settings(&storage)?;
    let mut calc = load_calculator(&storage, &settings)?;

    println!("Calcdeck keypad - type keys (e.g. 12 + 7 =), 'history', or 'quit'");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let recorded = session_loop(&mut calc, stdin.lock(), &mut stdout)?;

    if recorded > 0 {
        save_history(&storage, calc.history())?;
    }
    Ok(())
}

/// Prompt loop over `input`, one key line at a time. Returns the number of
/// history entries recorded.
fn session_loop<R: BufRead, W: Write>(calc: &mut Calculator, input: R, out: &mut W) -> Result<usize> {
    let mut recorded = 0;
    let mut lines = input.lines();

    loop {
        write!(out, "[{}] {} > ", calc.state().angle_mode.label(), calc.display())?;
        out.flush()?;

        let Some(line) = lines.next() else {
            writeln!(out)?;
            break;
        };
        let line = line?;

        match line.trim() {
            "" => continue,
            "quit" | "exit" | "q" => break,
            "history" => {
                for entry in calc.history().iter() {
                    writeln!(out, "  {} = {}", entry.expression, entry.result)?;
                }
            }
            keys => match press_line(calc, keys) {
                Ok(n) => {
                    recorded += n;
                    writeln!(out, "{}", calc.display())?;
                }
                Err(e) => writeln!(out, "error: {}", e)?,
            },
        }
    }

    Ok(recorded)
}

fn run_history(ctx: &RunContext, clear: bool) -> Result<()> {
    let storage = ctx.storage()?;
    let settings = ctx.settings(&storage)?;
    let mut calc = load_calculator(&storage, &settings)?;

    if clear {
        calc.history_mut().clear();
        save_history(&storage, calc.history())?;
        if !ctx.json {
            println!("history cleared");
            return Ok(());
        }
    }

    if ctx.json {
        let entries: Vec<_> = calc.history().iter().collect();
        return ctx.print_json(&entries);
    }

    if calc.history().is_empty() {
        println!("no history");
    }
    for entry in calc.history().iter() {
        println!(
            "{}  {} = {}",
            entry.timestamp.format("%Y-%m-%d %H:%M"),
            entry.expression,
            entry.result
        );
    }
    Ok(())
}

fn run_share(ctx: &RunContext, keys: &str) -> Result<()> {
    let storage = ctx.storage()?;
    let settings = ctx.settings(&storage)?;
    let mut calc = Calculator::new(settings.history_cap).with_angle_mode(settings.angle_mode);

    press_line(&mut calc, keys)?;
    let entry = calc
        .history()
        .latest()
        .context("nothing to share: the keys did not complete a calculation")?;

    let summary = ShareSummary::from_entry(entry);
    let whatsapp = whatsapp_url(summary.text());

    if ctx.json {
        return ctx.print_json(&ShareOutput {
            text: summary.text(),
            whatsapp,
        });
    }
    println!("{}", summary.text());
    println!("{}", whatsapp);
    Ok(())
}

// ============================================================================
// Catalog, favorites, recents
// ============================================================================

fn print_calculators(ctx: &RunContext, calculators: &[&CalculatorInfo], empty: &str) -> Result<()> {
    if ctx.json {
        return ctx.print_json(calculators);
    }
    if calculators.is_empty() {
        println!("{}", empty);
    }
    for calc in calculators {
        println!("{:<30} {:<28} {}", calc.id, calc.name, calc.category.display_name());
    }
    Ok(())
}

fn find_calculator(id: &str) -> Result<&'static CalculatorInfo> {
    catalog::find(id).with_context(|| format!("unknown calculator '{}'", id))
}

fn run_search(ctx: &RunContext, query: &str) -> Result<()> {
    let results = catalog::search(query);
    print_calculators(ctx, &results, "no calculators match")
}

fn run_open(ctx: &RunContext, id: &str) -> Result<()> {
    let calculator = find_calculator(id)?;

    let storage = ctx.storage()?;
    let settings = ctx.settings(&storage)?;
    let mut recent = load_recent(&storage, &settings)?;
    recent.record(calculator.id)?;
    storage
        .repository(Storage::RECENT_KEY)
        .save(&recent)
        .context("failed to save recent calculators")?;

    if ctx.json {
        return ctx.print_json(calculator);
    }
    println!("{} ({})", calculator.name, calculator.category.display_name());
    println!("{}", calculator.description);
    Ok(())
}

fn run_favorites(ctx: &RunContext, action: FavoritesAction) -> Result<()> {
    let storage = ctx.storage()?;
    let repo = storage.repository::<Favorites>(Storage::FAVORITES_KEY);
    let mut favorites = repo.load().context("failed to load favorites")?;

    let changed = match &action {
        FavoritesAction::List => false,
        FavoritesAction::Add { id } => {
            if !favorites.add(id)? && !ctx.json {
                println!("{} is already a favorite", id);
            }
            true
        }
        FavoritesAction::Remove { id } => {
            if !favorites.remove(id) && !ctx.json {
                println!("{} was not a favorite", id);
            }
            true
        }
        FavoritesAction::Toggle { id } => {
            let now = favorites.toggle(id)?;
            if !ctx.json {
                println!("{} {}", id, if now { "added to favorites" } else { "removed from favorites" });
            }
            true
        }
    };

    if changed {
        repo.save(&favorites).context("failed to save favorites")?;
    }

    let listed: Vec<&CalculatorInfo> = favorites.ids().iter().filter_map(|id| catalog::find(id)).collect();
    print_calculators(ctx, &listed, "no favorites")
}

fn run_recent(ctx: &RunContext) -> Result<()> {
    let storage = ctx.storage()?;
    let settings = ctx.settings(&storage)?;
    let recent = load_recent(&storage, &settings)?;

    let listed: Vec<&CalculatorInfo> = recent.ids().iter().filter_map(|id| catalog::find(id)).collect();
    print_calculators(ctx, &listed, "no recent calculators")
}

// ============================================================================
// Estimators
// ============================================================================

fn money(value: f64) -> String {
    format!("{:.2}", value)
}

fn run_percent(ctx: &RunContext, action: PercentAction) -> Result<()> {
    let (summary, result) = match action {
        PercentAction::Of { percent, value } => {
            let result = percentage_of(percent, value);
            (format!("{}% of {} = {}", format_result(percent), format_result(value), format_result(result)), result)
        }
        PercentAction::Change { from, to } => {
            let result = percent_change(from, to)?;
            (format!("{} -> {} = {}%", format_result(from), format_result(to), format_result(result)), result)
        }
    };

    if ctx.json {
        return ctx.print_json(&serde_json::json!({ "result": result }));
    }
    println!("{}", summary);
    Ok(())
}

fn run_loan(ctx: &RunContext, input: LoanInput) -> Result<()> {
    let result = loan_payment(&input)?;
    if ctx.json {
        return ctx.print_json(&result);
    }
    println!("Monthly payment: {}", money(result.monthly_payment));
    println!("Total paid:      {} over {} months", money(result.total_payment), result.months);
    println!("Total interest:  {}", money(result.total_interest));
    Ok(())
}

fn run_compound(ctx: &RunContext, input: CompoundInput) -> Result<()> {
    let result = compound_interest(&input)?;
    if ctx.json {
        return ctx.print_json(&result);
    }
    println!("Final amount:    {}", money(result.final_amount));
    println!("Interest earned: {}", money(result.interest_earned));
    Ok(())
}

fn run_paint(ctx: &RunContext, area: f64, coats: u32, product: PaintProduct) -> Result<()> {
    let estimate = estimate_paint(area, coats, product)?;
    if ctx.json {
        return ctx.print_json(&estimate);
    }
    println!("{}: {} L", product.display_name(), format_result(estimate.litres));
    println!("Cans: {} x {} L", estimate.cans, estimate.can_litres);
    Ok(())
}

fn run_roofing(ctx: &RunContext, area: f64, pitch: f64, material: RoofingMaterial) -> Result<()> {
    let estimate = estimate_roofing(area, pitch, material)?;
    if ctx.json {
        return ctx.print_json(&estimate);
    }
    println!("Roof surface: {} ft²", format_result(estimate.surface_ft2));
    println!("Squares (with waste): {}", format_result(estimate.squares));
    println!("{} bundles: {}", material.display_name(), estimate.bundles);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn session(input: &str) -> (Calculator, usize, String) {
        let mut calc = Calculator::default();
        let mut out = Vec::new();
        let recorded = session_loop(&mut calc, Cursor::new(input), &mut out).unwrap();
        (calc, recorded, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_session_evaluates_lines() {
        let (calc, recorded, out) = session("5 + 3 =\n* 2 =\nquit\n");
        assert_eq!(calc.display(), "16");
        assert_eq!(recorded, 2);
        assert!(out.contains("[DEG] 0 > "));
        assert!(out.contains("> 16\n"));
    }

    #[test]
    fn test_session_reports_bad_keys_and_continues() {
        let (calc, recorded, out) = session("5 + ?\n2 =\n");
        assert!(out.contains("error:"));
        assert_eq!(recorded, 0);
        assert_eq!(calc.display(), "2");
    }

    #[test]
    fn test_session_history_command() {
        let (_, _, out) = session("2 x 3 =\nhistory\nexit\n");
        assert!(out.contains("  2 × 3 = 6"));
    }

    #[test]
    fn test_press_line_counts_entries() {
        let mut calc = Calculator::default();
        assert_eq!(press_line(&mut calc, "1 + 1 + 1 =").unwrap(), 1);
        assert_eq!(calc.display(), "3");
        assert!(press_line(&mut calc, "1 @").is_err());
    }

    #[test]
    fn test_cli_parses() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
