// Entry point and high-level CLI flow.
//
// - The CSV is loaded, normalized and aggregated once at startup.
// - `--export DIR` writes every view as CSV plus `summary.json`.
// - `--sport S --category C` prints one sport page.
// - Otherwise a menu picks the home page or a sport, then a category.
use clap::Parser;
use log::{error, info};
use olympic_report::config::{Cli, Config};
use olympic_report::output::{self, preview_table_rows};
use olympic_report::router::{Category, Page, Router, Selection};
use olympic_report::util::{format_int, format_number};
use olympic_report::{build_pipeline, loader, PipelineOutputs};
use std::error::Error;
use std::io::{self, Write};
use std::path::Path;

const PREVIEW_ROWS: usize = 5;

/// Read a single line of input after printing the common "Enter choice:"
/// prompt. `None` on end of input.
fn read_choice() -> Option<String> {
    print!("Enter choice: ");
    let _ = io::stdout().flush();
    let mut buf = String::new();
    match io::stdin().read_line(&mut buf) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(buf.trim().to_string()),
    }
}

/// Ask whether to go back to the page selection menu.
fn prompt_back_to_menu() -> bool {
    loop {
        print!("Back to Page Selection (Y/N): ");
        let _ = io::stdout().flush();
        let mut buf = String::new();
        match io::stdin().read_line(&mut buf) {
            Ok(0) | Err(_) => return false,
            Ok(_) => {}
        }
        match buf.trim().to_uppercase().as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

fn print_page(page: &Page<'_>) {
    match page {
        Page::Placeholder(msg) => println!("{}\n", msg),
        Page::Views(views) => {
            for v in views {
                println!("{}", v.title);
                println!(
                    "({:?} chart, x = {}, y = {})\n",
                    v.binding.kind, v.binding.x, v.binding.y
                );
                println!("{}\n", v.table.render(PREVIEW_ROWS));
                if let Some(caption) = v.id.description() {
                    println!("{}\n", caption);
                }
            }
        }
    }
}

fn show_home(router: &Router<'_>) {
    print_page(&router.resolve(&Selection::Home));
    let sports = router.sports();
    if let Some(rows) = router.timeline(sports.as_slice()) {
        println!("Medals over time for {}", sports.join(", "));
        preview_table_rows(&rows, PREVIEW_ROWS * 2);
    }
}

/// Let the user pick one of the categories offered for `sport`.
fn choose_category(router: &Router<'_>, sport: &str) -> Option<Category> {
    let categories = router.categories(sport);
    loop {
        println!("{} categories:", sport);
        for (idx, c) in categories.iter().enumerate() {
            println!("[{}] {}", idx + 1, c);
        }
        println!("");
        let choice = read_choice()?;
        match choice.parse::<usize>() {
            Ok(n) if (1..=categories.len()).contains(&n) => return Some(categories[n - 1]),
            _ => println!("Invalid choice. Please enter 1 to {}.\n", categories.len()),
        }
    }
}

fn run_menu(router: &Router<'_>) {
    let sports = router.sports();
    loop {
        println!("Select a page:");
        println!("[0] Home");
        for (idx, sport) in sports.iter().enumerate() {
            println!("[{}] {}", idx + 1, sport);
        }
        println!("");
        let Some(choice) = read_choice() else {
            break;
        };
        match choice.parse::<usize>() {
            Ok(0) => {
                println!("");
                show_home(router);
            }
            Ok(n) if n <= sports.len() => {
                let sport = sports[n - 1];
                let Some(category) = choose_category(router, sport) else {
                    break;
                };
                println!("");
                print_page(&router.resolve(&Selection::Sport {
                    sport: sport.to_string(),
                    category,
                }));
            }
            _ => {
                println!("Invalid choice. Please enter 0 to {}.\n", sports.len());
                continue;
            }
        }
        if !prompt_back_to_menu() {
            println!("Exiting the program.");
            break;
        }
    }
}

/// Write every routed view, the anonymized country rows and the summary.
fn export_all(
    router: &Router<'_>,
    outputs: &PipelineOutputs,
    dir: &Path,
) -> Result<(), Box<dyn Error>> {
    let mut written = 0usize;
    for (sub, views) in router.all_pages() {
        let page_dir = dir.join(&sub);
        std::fs::create_dir_all(&page_dir)?;
        for v in views {
            v.table
                .write_csv(&page_dir.join(format!("{}.csv", v.id.name())))?;
            written += 1;
        }
    }
    output::write_csv(dir.join("anonymized.csv"), &outputs.country_rows)?;
    output::write_json(dir.join("summary.json"), &outputs.summary)?;
    info!("wrote {} tables to {}", written, dir.display());
    println!("Outputs saved to {}", dir.display());
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = Config::from_cli(&cli);
    let (records, report) = match loader::load_and_normalize(&config.input) {
        Ok(loaded) => loaded,
        Err(e) => {
            error!("Failed to load file: {}", e);
            return Err(e.into());
        }
    };
    println!(
        "Processing dataset... ({} rows loaded, {} ages imputed with median {})\n",
        format_int(report.total_rows),
        format_int(report.age.missing),
        format_number(report.age.median, 1)
    );

    let outputs = build_pipeline(records, &config);
    let router = Router::new(&outputs, &config);

    if let Some(dir) = &cli.export {
        std::fs::create_dir_all(dir)?;
        return export_all(&router, &outputs, dir);
    }

    if let (Some(sport), Some(category)) = (&cli.sport, &cli.category) {
        print_page(&router.resolve_names(&config, sport, category));
        return Ok(());
    }

    run_menu(&router);
    Ok(())
}
