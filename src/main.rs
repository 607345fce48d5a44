use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{error::Error, io, process::ExitCode};

mod app;
mod cli;
mod config;
mod current;
mod error;
mod export;
mod fetch;
mod history;
mod logging;
mod openmeteo;
mod pipeline;
mod resolve;
mod units;
mod weather;

use crate::app::{run_app, App};
use crate::cli::Args;
use crate::config::Settings;
use crate::openmeteo::OpenMeteo;
use crate::pipeline::Request;

fn run_once(api: &OpenMeteo, args: &Args, place: String) -> ExitCode {
    let request = Request {
        place,
        mode: args.mode,
        out_dir: args.out.clone(),
        format: args.format,
    };
    let today = chrono::Local::now().date_naive();
    let outcome = pipeline::invoke(api, &request, today, &mut |status| {
        eprintln!("{}", status.message())
    });

    if outcome.succeeded {
        println!("{}", outcome.console);
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn run_console(api: &OpenMeteo, args: &Args) -> Result<(), Box<dyn Error>> {
    // setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // create app and run it
    let res = run_app(&mut terminal, api, App::new(args.out.clone(), args.format));

    // restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{:?}", err)
    }

    Ok(())
}

fn main() -> Result<ExitCode, Box<dyn Error>> {
    let args = Args::parse();
    logging::init(args.verbose, args.log_file.as_deref(), args.place.is_none())?;

    let settings = Settings::from_args(&args);
    let api = OpenMeteo::from_settings(&settings)?;

    match args.place.clone() {
        Some(place) => Ok(run_once(&api, &args, place)),
        None => {
            run_console(&api, &args)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
