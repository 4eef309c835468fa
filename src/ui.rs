// UI layer: a numbered menu read from the terminal with `dialoguer`.
// Each menu entry maps to one handler; handlers load the catalog fresh,
// act on it and print the result. Per-command failures are printed and
// the loop continues; only fatal errors are returned to `main`.

use crate::api::OmdbClient;
use crate::catalog::{self, Entry, Filter, SearchOutcome};
use crate::config::Config;
use crate::error::{LookupError, StorageError};
use crate::movie::{Catalog, Movie};
use crate::report;
use crate::storage::MovieStorage;
use anyhow::{Context, Result};
use crossterm::style::Stylize;
use dialoguer::{Confirm, Input};
use indicatif::{ProgressBar, ProgressStyle};
use std::ops::ControlFlow;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Everything a command handler needs.
pub struct App {
    pub storage: Box<dyn MovieStorage>,
    pub api: OmdbClient,
    pub config: Config,
}

/// What the menu loop does after a handler returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

type Handler = fn(&App) -> Result<Flow>;

/// Menu entries, indexed by their number.
const COMMANDS: [(&str, Handler); 13] = [
    ("Quit", command_quit),
    ("List movies", command_list_movies),
    ("Add movie", command_add_movie),
    ("Delete movie", command_delete_movie),
    ("Update movie", command_update_movie),
    ("Stats", command_stats),
    ("Random movie", command_random_movie),
    ("Search movie", command_search_movie),
    ("Movies sorted by rating", command_sort_by_rating),
    ("Movies sorted by year", command_sort_by_year),
    ("Create Rating Histogram", command_create_histogram),
    ("Filter Movies", command_filter_movies),
    ("Generate Website", command_generate_website),
];

/// Main interactive loop. Runs until the user picks 0 or a fatal error
/// occurs.
pub fn main_menu(app: &App) -> Result<()> {
    println!("{}\n", "********** My Movies Database **********".magenta().underlined());

    let last = COMMANDS.len() - 1;
    loop {
        println!("{}", menu_text().blue());
        let choice: usize = Input::new()
            .with_prompt(format!("Enter choice (0-{})", last))
            .validate_with(|n: &usize| -> Result<(), &'static str> {
                if *n <= last {
                    Ok(())
                } else {
                    Err("Invalid choice")
                }
            })
            .interact_text()?;
        println!();

        let (name, handler) = COMMANDS[choice];
        log::debug!("running command {} ({})", choice, name);
        if handler(app)? == Flow::Quit {
            break;
        }

        let _: String = Input::new()
            .with_prompt("Press enter to continue".blue().to_string())
            .allow_empty(true)
            .interact_text()?;
    }
    Ok(())
}

fn menu_text() -> String {
    let mut text = String::from("Menu:\n");
    for (i, (name, _)) in COMMANDS.iter().enumerate() {
        text.push_str(&format!("{}. {}\n", i, name));
    }
    text
}

fn movie_line(title: &str, movie: &Movie) -> String {
    format!("{} ({}): {:.1}", title, movie.year, movie.rating)
}

fn print_entries(entries: &[Entry]) {
    for (title, movie) in entries {
        println!("{}", movie_line(title, movie));
    }
}

fn print_error(msg: impl std::fmt::Display) {
    println!("{}", msg.to_string().red());
}

/// Load the catalog for a command. A missing file is offered to be
/// created; declining quits the app. Other storage errors abort just
/// this command.
fn load_movies(app: &App) -> Result<ControlFlow<Flow, Catalog>> {
    match app.storage.list_movies() {
        Ok(movies) => Ok(ControlFlow::Continue(movies)),
        Err(StorageError::Missing(path)) => {
            print_error(format!("{} not found.", path.display()));
            let create = Confirm::new()
                .with_prompt(format!("Do you want to create empty {} file? (N exits)", path.display()))
                .interact()?;
            if !create {
                println!("{}", "Bye!".green());
                return Ok(ControlFlow::Break(Flow::Quit));
            }
            match app.storage.create_empty() {
                Ok(()) => Ok(ControlFlow::Continue(Catalog::new())),
                Err(e) => {
                    print_error(&e);
                    Ok(ControlFlow::Break(Flow::Continue))
                }
            }
        }
        Err(e) => {
            log::warn!("loading catalog failed: {}", e);
            print_error(&e);
            Ok(ControlFlow::Break(Flow::Continue))
        }
    }
}

/// Like `load_movies` but also stops the command on an empty catalog.
fn load_non_empty(app: &App) -> Result<ControlFlow<Flow, Catalog>> {
    match load_movies(app)? {
        ControlFlow::Continue(movies) if movies.is_empty() => {
            print_error("No movies in database");
            Ok(ControlFlow::Break(Flow::Continue))
        }
        other => Ok(other),
    }
}

macro_rules! load_or_return {
    ($load:expr) => {
        match $load? {
            ControlFlow::Continue(movies) => movies,
            ControlFlow::Break(flow) => return Ok(flow),
        }
    };
}

/// Titles must contain something besides whitespace.
#[allow(clippy::ptr_arg)]
fn check_title(input: &String) -> Result<(), &'static str> {
    if input.trim().is_empty() {
        Err("Please enter a movie name")
    } else {
        Ok(())
    }
}

fn prompt_title(prompt: &str) -> Result<String> {
    let title: String = Input::new()
        .with_prompt(prompt.green().to_string())
        .validate_with(check_title)
        .interact_text()?;
    Ok(title.trim().to_string())
}

fn prompt_rating() -> Result<f64> {
    let rating: f64 = Input::new()
        .with_prompt("Enter new movie rating (0-10)".green().to_string())
        .validate_with(|r: &f64| -> Result<(), &'static str> {
            if (0.0..=10.0).contains(r) {
                Ok(())
            } else {
                Err("Please enter a Number (0 to 10)")
            }
        })
        .interact_text()?;
    Ok(rating)
}

/// Blank input means "no constraint"; anything else must parse as `T`.
fn prompt_optional<T>(prompt: &str) -> Result<Option<T>>
where
    T: FromStr,
{
    let text: String = Input::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .validate_with(|s: &String| -> Result<(), &'static str> {
            if s.trim().is_empty() || s.trim().parse::<T>().is_ok() {
                Ok(())
            } else {
                Err("Not a valid number")
            }
        })
        .interact_text()?;
    let text = text.trim();
    Ok(if text.is_empty() { None } else { text.parse().ok() })
}

fn command_quit(_app: &App) -> Result<Flow> {
    println!("{}", "Bye!".green());
    Ok(Flow::Quit)
}

fn command_list_movies(app: &App) -> Result<Flow> {
    let movies = load_or_return!(load_movies(app));
    println!("{} movies in total", movies.len());
    print_entries(&catalog::entries(&movies).collect::<Vec<_>>());
    Ok(Flow::Continue)
}

/// Ask the user for the fields the lookup service could not provide.
fn manual_movie() -> Result<Movie> {
    let year: i32 = Input::new()
        .with_prompt("Enter new movie year".green().to_string())
        .interact_text()?;
    let rating = prompt_rating()?;
    Ok(Movie::new(year, rating, crate::movie::NO_POSTER))
}

fn lookup_with_spinner(api: &OmdbClient, title: &str) -> Result<crate::api::MovieInfo, LookupError> {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(format!("Looking up {}...", title));
    spinner.enable_steady_tick(Duration::from_millis(100));
    let res = api.lookup(title);
    spinner.finish_and_clear();
    res
}

fn command_add_movie(app: &App) -> Result<Flow> {
    let movies = load_or_return!(load_movies(app));
    let title = prompt_title("Enter new movie name")?;
    if movies.contains_key(&title) {
        println!("{}", StorageError::Duplicate(title).to_string().magenta());
        return Ok(Flow::Continue);
    }

    let movie = if app.api.has_api_key() {
        match lookup_with_spinner(&app.api, &title) {
            Ok(info) => {
                let rating = match info.rating {
                    Some(r) => r,
                    None => {
                        println!("No rating available for {}.", title);
                        prompt_rating()?
                    }
                };
                Movie::new(info.year, rating, info.poster)
            }
            Err(LookupError::NotFound(msg)) => {
                print_error(format!("Error: {}", msg));
                return Ok(Flow::Continue);
            }
            Err(e) => {
                log::warn!("lookup of '{}' failed: {}", title, e);
                print_error(&e);
                return Ok(Flow::Continue);
            }
        }
    } else {
        println!("No OMDb API key configured, enter the details manually.");
        manual_movie()?
    };

    match app.storage.add_new_movie(&title, movie) {
        Ok(()) => println!("{}", format!("Movie \"{}\" successfully added", title).magenta()),
        Err(e) => print_error(&e),
    }
    Ok(Flow::Continue)
}

fn command_delete_movie(app: &App) -> Result<Flow> {
    load_or_return!(load_movies(app));
    let title = prompt_title("Enter movie name to delete")?;
    match app.storage.delete_movie(&title) {
        Ok(_) => println!("{}", format!("Movie \"{}\" successfully deleted", title).magenta()),
        Err(e) => print_error(&e),
    }
    Ok(Flow::Continue)
}

fn command_update_movie(app: &App) -> Result<Flow> {
    let movies = load_or_return!(load_movies(app));
    let title = prompt_title("Enter movie name")?;
    if !movies.contains_key(&title) {
        print_error(StorageError::NotFound(title));
        return Ok(Flow::Continue);
    }
    let rating = prompt_rating()?;
    match app.storage.update_movie(&title, rating) {
        Ok(()) => println!("{}", format!("Movie \"{}\" successfully updated", title).magenta()),
        Err(e) => print_error(&e),
    }
    Ok(Flow::Continue)
}

fn command_stats(app: &App) -> Result<Flow> {
    let movies = load_or_return!(load_non_empty(app));
    if let Some(stats) = catalog::stats(&movies) {
        println!("Average rating: {:.1}", stats.average);
        println!("Median rating: {:.1}", stats.median);
        println!("Best movie: {}, {:.1}", stats.best.0, stats.best.1);
        println!("Worst movie: {}, {:.1}", stats.worst.0, stats.worst.1);
    }
    Ok(Flow::Continue)
}

fn command_random_movie(app: &App) -> Result<Flow> {
    let movies = load_or_return!(load_non_empty(app));
    if let Some((title, movie)) = catalog::random_movie(&movies, &mut rand::rng()) {
        println!(
            "Your movie for tonight: {}, it's rated {}",
            title.green(),
            format!("{:.1}", movie.rating).green()
        );
    }
    Ok(Flow::Continue)
}

fn command_search_movie(app: &App) -> Result<Flow> {
    let movies = load_or_return!(load_non_empty(app));
    let query: String = Input::new()
        .with_prompt("Enter part of movie name".green().to_string())
        .interact_text()?;

    match catalog::search(&movies, &query) {
        SearchOutcome::Matches(found) => {
            for (title, movie) in found {
                println!("{}, {:.1}", title, movie.rating);
            }
        }
        SearchOutcome::Suggestions(titles) => {
            println!("{} Did you mean:", format!("The movie {} does not exist.", query).red());
            for title in titles {
                println!("{}", title);
            }
        }
        SearchOutcome::NotFound => print_error(format!("The movie {} does not exist.", query)),
    }
    Ok(Flow::Continue)
}

fn command_sort_by_rating(app: &App) -> Result<Flow> {
    let movies = load_or_return!(load_non_empty(app));
    print_entries(&catalog::sort_by_rating(&movies, true));
    Ok(Flow::Continue)
}

fn command_sort_by_year(app: &App) -> Result<Flow> {
    let movies = load_or_return!(load_non_empty(app));
    let latest_first = Confirm::new()
        .with_prompt("Do you want the latest movies first?".green().to_string())
        .interact()?;
    print_entries(&catalog::sort_by_year(&movies, latest_first));
    Ok(Flow::Continue)
}

fn command_create_histogram(app: &App) -> Result<Flow> {
    let movies = load_or_return!(load_non_empty(app));
    let name: String = Input::new()
        .with_prompt("Please enter a file name to save the histogram".green().to_string())
        .interact_text()?;
    let path = PathBuf::from(format!("{}.png", name.trim()));

    match report::write_histogram(&catalog::ratings(&movies), &path) {
        Ok(_) => println!("{}", format!("Histogram saved to {}.", path.display()).green()),
        Err(e) => print_error(&e),
    }
    Ok(Flow::Continue)
}

fn command_filter_movies(app: &App) -> Result<Flow> {
    let movies = load_or_return!(load_non_empty(app));
    let filter = Filter {
        min_rating: prompt_optional("Enter minimum rating (leave blank for no minimum rating)")?,
        start_year: prompt_optional("Enter start year (leave blank for no start year)")?,
        end_year: prompt_optional("Enter end year (leave blank for no end year)")?,
    };
    log::debug!("filtering with {:?}", filter);

    let found = filter.apply(&movies);
    if found.is_empty() {
        println!("{}", "No movies found based on the provided criteria".magenta());
    } else {
        println!("Filtered Movies:");
        print_entries(&found);
    }
    Ok(Flow::Continue)
}

/// A missing template is fatal and ends the menu loop.
fn command_generate_website(app: &App) -> Result<Flow> {
    let movies = load_or_return!(load_movies(app));
    report::generate_website(&app.config.template_path, &app.config.website_path, &movies)
        .context("Website generation failed")?;
    println!("Website was generated successfully.");
    Ok(Flow::Continue)
}
