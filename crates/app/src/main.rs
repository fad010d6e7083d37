//! Courtbook - club court booking from the command line
//!
//! A thin caller around `courtbook-core`: resolves the acting user, asks
//! the booking service, prints the outcome.

use std::path::PathBuf;

use anyhow::Result;
use chrono::{Local, NaiveDate, NaiveTime};
use clap::{Parser, Subcommand};
use courtbook_core::{
    identity, parse_slot_time, BookingOutcome, BookingService, CancellationOutcome, ClubAdmin,
    CourtId, Role, SessionIdentity,
};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

mod render;
mod state;

#[derive(Parser)]
#[command(name = "courtbook", about = "Book club courts")]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true, env = "COURTBOOK_CONFIG")]
    config: Option<PathBuf>,

    /// Database file, overriding the config
    #[arg(long, global = true, env = "COURTBOOK_DATABASE")]
    database: Option<PathBuf>,

    /// Act as this signed-in user
    #[arg(long = "as", global = true, env = "COURTBOOK_USER")]
    user: Option<Uuid>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the availability grid for a date
    Grid {
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Include inactive courts
        #[arg(long)]
        all: bool,
    },
    /// Book one slot
    Book {
        court: CourtId,
        #[arg(value_parser = parse_time)]
        start: NaiveTime,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Cancel a reservation
    Cancel { reservation: Uuid },
    /// List your reservations from a date onward
    Mine {
        #[arg(long)]
        from: Option<NaiveDate>,
    },
    /// Create the club profile for the signed-in user
    Register { name: String, email: String },
    /// Change your display name
    Rename { name: String },
    /// Court administration
    Courts {
        #[command(subcommand)]
        action: CourtAction,
    },
    /// User administration
    Users {
        #[command(subcommand)]
        action: UserAction,
    },
    /// Every reservation (administrators)
    Reservations,
}

#[derive(Subcommand)]
enum CourtAction {
    List,
    Add { name: String },
    Rename { id: CourtId, name: String },
    Toggle { id: CourtId },
    Remove { id: CourtId },
}

#[derive(Subcommand)]
enum UserAction {
    List,
    SetRole {
        user: Uuid,
        #[arg(value_parser = parse_role)]
        role: Role,
    },
}

fn parse_time(s: &str) -> std::result::Result<NaiveTime, String> {
    parse_slot_time(s).ok_or_else(|| format!("invalid time '{}', expected HH:MM", s))
}

fn parse_role(s: &str) -> std::result::Result<Role, String> {
    let role = Role::from_label(s);
    if role == Role::Guest && !s.trim().eq_ignore_ascii_case("guest") {
        return Err(format!("unknown role '{}'", s));
    }
    Ok(role)
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn print<T: Serialize>(json: bool, value: &T, text: impl FnOnce(&T) -> String) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        print!("{}", text(value));
    }
    Ok(())
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let app = state::AppState::new(cli.config.as_deref(), cli.database.clone())?;
    let db = &app.db;
    let session = SessionIdentity::new(db, cli.user);
    let json = cli.json;

    match cli.command {
        Command::Grid { date, all } => {
            let service = BookingService::new(db, &session, app.config.engine());
            let date = date.unwrap_or_else(today);
            let grid = if all {
                service.grid_including_closed(date)?
            } else {
                service.grid(date)?
            };
            print(json, &grid, render::grid)?;
        }
        Command::Book { court, start, date } => {
            let service = BookingService::new(db, &session, app.config.engine());
            let outcome = service.book(court, date.unwrap_or_else(today), start)?;
            print(json, &outcome, render::booking)?;
            if matches!(outcome, BookingOutcome::Conflict) {
                std::process::exit(2);
            }
        }
        Command::Cancel { reservation } => {
            let service = BookingService::new(db, &session, app.config.engine());
            let outcome = service.cancel(reservation)?;
            print(json, &outcome, render::cancellation)?;
            if !matches!(outcome, CancellationOutcome::Cancelled { .. }) {
                std::process::exit(1);
            }
        }
        Command::Mine { from } => {
            let service = BookingService::new(db, &session, app.config.engine());
            let list = service.my_reservations(from.unwrap_or_else(today))?;
            print(json, &list, |l| render::reservations(l))?;
        }
        Command::Register { name, email } => {
            let user_id = cli
                .user
                .ok_or_else(|| anyhow::anyhow!("--as <user-id> is required to register"))?;
            let profile = identity::register(db, user_id, &name, &email)?;
            print(json, &profile, |p| format!("Registered {} as {}\n", p.name, p.role))?;
        }
        Command::Rename { name } => {
            identity::rename_current(db, &session, &name)?;
            println!("Name updated");
        }
        Command::Courts { action } => {
            let admin = ClubAdmin::new(db, &session);
            match action {
                CourtAction::List => print(json, &admin.courts()?, |c| render::courts(c))?,
                CourtAction::Add { name } => {
                    let court = admin.add_court(&name)?;
                    print(json, &court, |c| format!("Created court {} ({})\n", c.id, c.name))?;
                }
                CourtAction::Rename { id, name } => {
                    admin.rename_court(id, &name)?;
                    println!("Court {} renamed", id);
                }
                CourtAction::Toggle { id } => {
                    let court = admin.toggle_court(id)?;
                    let status = if court.active { "active" } else { "inactive" };
                    println!("Court {} is now {}", id, status);
                }
                CourtAction::Remove { id } => {
                    admin.remove_court(id)?;
                    println!("Court {} removed", id);
                }
            }
        }
        Command::Users { action } => {
            let admin = ClubAdmin::new(db, &session);
            match action {
                UserAction::List => print(json, &admin.users()?, |p| render::profiles(p))?,
                UserAction::SetRole { user, role } => {
                    admin.set_role(user, role)?;
                    println!("{} is now {}", user, role);
                }
            }
        }
        Command::Reservations => {
            let admin = ClubAdmin::new(db, &session);
            print(json, &admin.reservations()?, |l| render::reservations(l))?;
        }
    }

    Ok(())
}
