use anyhow::{anyhow, Result};
use crossterm::style::Stylize;
use reedline::{
    FileBackedHistory, Prompt, PromptEditMode, PromptHistorySearch, Reedline, Signal,
};
use std::borrow::Cow;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use motioner_cli::api_client::{ApiClient, Endpoint, HitsRequest};
use motioner_cli::args::{take_flag, take_flag_value};
use motioner_cli::cache::ResponseCache;
use motioner_cli::config::config::Config;
use motioner_cli::display;
use motioner_cli::history::QueryHistory;
use motioner_cli::smoke;
use motioner_cli::utils::app_paths::AppPaths;

struct MotionerPrompt;

// The prompt runs with reedline's default emacs editing, so the edit-mode
// and multiline variants never vary here.
impl Prompt for MotionerPrompt {
    fn render_prompt_left(&self) -> Cow<'_, str> {
        Cow::Borrowed("motioner> ")
    }

    fn render_prompt_right(&self) -> Cow<'_, str> {
        Cow::Borrowed("")
    }

    fn render_prompt_indicator(&self, _edit_mode: PromptEditMode) -> Cow<'_, str> {
        Cow::Borrowed("> ")
    }

    fn render_prompt_multiline_indicator(&self) -> Cow<'_, str> {
        Cow::Borrowed("... ")
    }

    fn render_prompt_history_search_indicator(
        &self,
        history_search: PromptHistorySearch,
    ) -> Cow<'_, str> {
        Cow::Owned(format!("(search: {}) ", history_search.term))
    }
}

fn print_help() {
    println!("{}", "motioner-cli - smoke harness for the motioner search service".blue().bold());
    println!();
    println!("{}", "Usage:".yellow());
    println!("  motioner-cli [COMMAND] [OPTIONS]");
    println!();
    println!("{}", "Commands:".yellow());
    println!("  {}                 - Sweep all endpoints with the probe phrases (default)", "smoke".green());
    println!("  {}  - Full-text search via /motioner", "search <PHRASE>".green());
    println!("  {} - Yearly counts; no phrase hits /motioner/timeline/total", "timeline [PHRASE]".green());
    println!("  {}    - Paged hits via /motioner/hits", "hits <PHRASE>".green());
    println!("  {}                - The service's most recent queries", "latest".green());
    println!("  {}                   - The service's most frequent queries", "top".green());
    println!("  {} - Local query history", "history [recent|top|search <TERM>|clear]".green());
    println!("  {}    - Cached responses", "cache [list|show <ID>|stats|clear]".green());
    println!();
    println!("{}", "Options:".yellow());
    println!("  {}          - Override the service base URL", "--url <URL>".green());
    println!("  {}      - Read probe phrases from a file (smoke)", "--phrases <FILE>".green());
    println!("  {}  - Year range and offset for hits", "--from/--to/--index <N>".green());
    println!("  {}         - queryMode parameter for hits", "--mode <MODE>".green());
    println!("  {}              - Save the response to the cache", "--cache".green());
    println!("  {}    - Interactive prompt; each line is a search phrase", "-i, --interactive".green());
    println!("  {}    - Write a commented default config file", "--generate-config".green());
    println!();
    println!("{}", "Phrase syntax (interpreted by the backend):".yellow());
    println!("  mer pengar till .*");
    println!("  asdf,qwer parti:(m,s) år:(1995-2000)");
    println!("  mer .* till författare:(anders borg)");
    println!();
}

fn open_history(config: &Config) -> Option<QueryHistory> {
    if !config.behavior.enable_history {
        return None;
    }
    match QueryHistory::with_cap(config.behavior.max_history_entries) {
        Ok(history) => Some(history),
        Err(e) => {
            eprintln!("Warning: query history unavailable: {}", e);
            None
        }
    }
}

fn open_cache(config: &Config) -> Result<ResponseCache> {
    match &config.behavior.cache_dir {
        Some(dir) => ResponseCache::with_dir(dir.clone()),
        None => ResponseCache::new(),
    }
}

/// Issue one request, render the result, and record it. Failures come back
/// as the original error, body text and all, for the caller to report once.
fn execute(
    client: &ApiClient,
    endpoint: &Endpoint,
    config: &Config,
    save_to_cache: bool,
    history: &mut Option<QueryHistory>,
) -> Result<()> {
    let request = endpoint.describe();
    if config.display.color {
        println!("{}", request.as_str().cyan());
    } else {
        println!("{}", request);
    }

    let started = Instant::now();
    let result = client.get(endpoint);
    let duration_ms = started.elapsed().as_millis() as u64;

    if let (Some(history), Some(phrase)) = (history.as_mut(), endpoint.phrase()) {
        if let Err(e) = history.record(phrase, endpoint.path(), result.is_ok(), Some(duration_ms)) {
            eprintln!("Warning: could not record history entry: {}", e);
        }
    }

    match result {
        Ok(body) => {
            display::display_response(&body, &config.display);
            if save_to_cache {
                let mut cache = open_cache(config)?;
                let id = cache.save(endpoint.path(), endpoint.phrase().unwrap_or(""), &body)?;
                println!("Cached as entry {}", id);
            }
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

fn run_smoke(
    client: &ApiClient,
    config: &Config,
    phrases_file: Option<&str>,
    history: Option<&mut QueryHistory>,
) -> Result<()> {
    let phrases = match phrases_file {
        Some(path) => smoke::load_phrases(&PathBuf::from(path))?,
        None => smoke::default_phrases(),
    };
    if phrases.is_empty() {
        return Err(anyhow!("no probe phrases to run"));
    }

    let plan = smoke::sweep_plan(&phrases, &config.hits);
    let report = smoke::run_sweep(client, &plan, &config.display, history);
    smoke::print_summary(&report, config.display.color);

    if report.is_success() {
        Ok(())
    } else {
        Err(anyhow!("{} probes failed", report.failed()))
    }
}

fn run_history(history: Option<QueryHistory>, args: &[String]) -> Result<()> {
    let mut history =
        history.ok_or_else(|| anyhow!("query history is disabled in the config"))?;

    match args.first().map(String::as_str) {
        None | Some("recent") => {
            for entry in history.recent(20) {
                let status = if entry.success { "ok " } else { "ERR" };
                println!(
                    "{} {} {} {}",
                    entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
                    status,
                    entry.endpoint,
                    entry.phrase
                );
            }
        }
        Some("top") => {
            for (phrase, count) in history.top(20) {
                println!("{:>5}  {}", count, phrase);
            }
        }
        Some("search") => {
            let term = args
                .get(1)
                .ok_or_else(|| anyhow!("Usage: motioner-cli history search <TERM>"))?;
            for m in history.search(term) {
                println!("{:>5}  {}", m.score, m.entry.phrase);
            }
        }
        Some("clear") => {
            history.clear()?;
            println!("History cleared.");
        }
        Some(other) => return Err(anyhow!("Unknown history subcommand: {}", other)),
    }
    Ok(())
}

fn run_cache(config: &Config, args: &[String]) -> Result<()> {
    let mut cache = open_cache(config)?;

    match args.first().map(String::as_str) {
        None | Some("list") => {
            for entry in cache.list() {
                println!(
                    "{:>4}  {}  {:>5} rows  {}  {}",
                    entry.id,
                    entry.timestamp.format("%Y-%m-%d %H:%M"),
                    entry.row_count,
                    entry.endpoint,
                    entry.phrase
                );
            }
        }
        Some("show") => {
            let id: u64 = args
                .get(1)
                .ok_or_else(|| anyhow!("Usage: motioner-cli cache show <ID>"))?
                .parse()?;
            let (entry, body) = cache.load(id)?;
            println!("{} {}", entry.endpoint, entry.phrase);
            display::display_response(&body, &config.display);
        }
        Some("stats") => {
            let stats = cache.stats();
            println!(
                "{} entries, {} rows, {}",
                stats.total_entries,
                stats.total_rows,
                stats.format_size()
            );
        }
        Some("clear") => {
            cache.clear()?;
            println!("Cache cleared.");
        }
        Some(other) => return Err(anyhow!("Unknown cache subcommand: {}", other)),
    }
    Ok(())
}

fn run_repl(client: &ApiClient, config: &Config) -> Result<()> {
    print_help();
    println!(
        "{}",
        format!("Connected to {}", client.base_url()).cyan()
    );
    println!("Enter a search phrase, or \\help for commands. Ctrl+D exits.");

    let history_file = AppPaths::repl_history_file()
        .unwrap_or_else(|_| PathBuf::from(".motioner_repl_history"));
    let line_history = Box::new(
        FileBackedHistory::with_file(200, history_file)
            .map_err(|e| anyhow!("Error configuring line history: {}", e))?,
    );

    let mut line_editor = Reedline::create().with_history(line_history);
    let prompt = MotionerPrompt;
    let mut query_history = open_history(config);

    loop {
        let sig = line_editor
            .read_line(&prompt)
            .map_err(|e| anyhow!("prompt error: {}", e))?;
        match sig {
            Signal::Success(buffer) => {
                let trimmed = buffer.trim();
                if trimmed.is_empty() {
                    continue;
                }

                if trimmed == "\\help" {
                    print_help();
                    continue;
                }

                if trimmed == "\\clear" {
                    print!("{esc}[2J{esc}[1;1H", esc = 27 as char);
                    continue;
                }

                let endpoint = if let Some(phrase) = trimmed.strip_prefix("\\timeline") {
                    let phrase = phrase.trim();
                    if phrase.is_empty() {
                        Endpoint::timeline_total()
                    } else {
                        Endpoint::timeline_search(phrase)
                    }
                } else if let Some(phrase) = trimmed.strip_prefix("\\hits") {
                    let phrase = phrase.trim();
                    if phrase.is_empty() {
                        eprintln!("{}", "Usage: \\hits <phrase>".red());
                        continue;
                    }
                    Endpoint::hits(&HitsRequest {
                        search_phrase: phrase.to_string(),
                        start_date: config.hits.start_date,
                        end_date: config.hits.end_date,
                        from_index: config.hits.from_index,
                        query_mode: config.hits.query_mode.clone(),
                    })
                } else if trimmed == "\\latest" {
                    Endpoint::latest_queries()
                } else if trimmed == "\\top" {
                    Endpoint::top_queries()
                } else if trimmed.starts_with('\\') {
                    eprintln!("{}", format!("Unknown command: {}", trimmed).red());
                    continue;
                } else {
                    Endpoint::search(trimmed)
                };

                // A failed request is reported and the prompt keeps going.
                if let Err(e) = execute(client, &endpoint, config, false, &mut query_history) {
                    display::display_error(&e.to_string(), config.display.color);
                }
            }
            Signal::CtrlD | Signal::CtrlC => {
                println!("\nGoodbye!");
                break;
            }
        }
    }

    Ok(())
}

fn run(mut args: Vec<String>) -> Result<()> {
    if take_flag(&mut args, "--generate-config") {
        let path = Config::get_config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, Config::create_default_with_comments())?;
        println!("Configuration file created at: {:?}", path);
        return Ok(());
    }

    let mut config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: could not load config, using defaults: {}", e);
            Config::default()
        }
    };

    if let Some(url) = take_flag_value(&mut args, "--url")? {
        config.server.base_url = url;
    }

    let client = ApiClient::with_timeout(
        &config.resolved_base_url(),
        Duration::from_secs(config.server.timeout_secs),
    )?;

    if take_flag(&mut args, "-i") || take_flag(&mut args, "--interactive") {
        run_repl(&client, &config)?;
        return Ok(());
    }

    let save_to_cache = take_flag(&mut args, "--cache");
    let phrases_file = take_flag_value(&mut args, "--phrases")?;
    let from = take_flag_value(&mut args, "--from")?;
    let to = take_flag_value(&mut args, "--to")?;
    let index = take_flag_value(&mut args, "--index")?;
    let mode = take_flag_value(&mut args, "--mode")?;

    let mut history = open_history(&config);
    let command = args.first().cloned();
    let rest: Vec<String> = args.into_iter().skip(1).collect();

    match command.as_deref() {
        None | Some("smoke") => {
            run_smoke(&client, &config, phrases_file.as_deref(), history.as_mut())?;
        }
        Some("search") => {
            let phrase = rest
                .first()
                .ok_or_else(|| anyhow!("Usage: motioner-cli search <PHRASE>"))?;
            execute(&client, &Endpoint::search(phrase), &config, save_to_cache, &mut history)?;
        }
        Some("timeline") => {
            let endpoint = match rest.first() {
                Some(phrase) => Endpoint::timeline_search(phrase),
                None => Endpoint::timeline_total(),
            };
            execute(&client, &endpoint, &config, save_to_cache, &mut history)?;
        }
        Some("hits") => {
            let phrase = rest
                .first()
                .ok_or_else(|| anyhow!("Usage: motioner-cli hits <PHRASE> [--from YEAR] [--to YEAR] [--index N] [--mode MODE]"))?;
            let request = HitsRequest {
                search_phrase: phrase.clone(),
                start_date: match from {
                    Some(v) => v.parse()?,
                    None => config.hits.start_date,
                },
                end_date: match to {
                    Some(v) => v.parse()?,
                    None => config.hits.end_date,
                },
                from_index: match index {
                    Some(v) => v.parse()?,
                    None => config.hits.from_index,
                },
                query_mode: mode.or_else(|| config.hits.query_mode.clone()),
            };
            execute(&client, &Endpoint::hits(&request), &config, save_to_cache, &mut history)?;
        }
        Some("latest") => {
            execute(&client, &Endpoint::latest_queries(), &config, save_to_cache, &mut history)?;
        }
        Some("top") => {
            execute(&client, &Endpoint::top_queries(), &config, save_to_cache, &mut history)?;
        }
        Some("history") => run_history(history, &rest)?,
        Some("cache") => run_cache(&config, &rest)?,
        Some(other) => {
            return Err(anyhow!("Unknown command: {} (try --help)", other));
        }
    }

    Ok(())
}

fn main() {
    motioner_cli::utils::logging::init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return;
    }

    match run(args) {
        Ok(_) => {}
        Err(e) => {
            eprintln!("{}", format!("Error: {}", e).red());
            std::process::exit(1);
        }
    }
}
