use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;

use arcade_pong::ai::Difficulty;
use arcade_pong::api::{LocalLedger, MatchApi, PlayerId, Profile};
use arcade_pong::config::{self, Config};
use arcade_pong::controller::{MatchController, SessionExit};
use arcade_pong::game::{Customization, GameMode, MatchSettings};
use arcade_pong::logging;
use arcade_pong::menu::{handle_menu_input, render_menu, MenuAction, MenuState};

/// Id given to a profile created with --player
const LOCAL_USER_ID: u64 = 1;

/// Command line options; everything is optional
#[derive(Debug, Default)]
struct CliArgs {
    mode: Option<GameMode>,
    difficulty: Option<Difficulty>,
    map: Option<String>,
    player: Option<String>,
    custom: Customization,
    debug: bool,
}

fn main() -> Result<(), io::Error> {
    let args: Vec<String> = std::env::args().collect();
    let cli = parse_args(&args)?;

    // File logging only; the TUI owns stdout
    logging::init(cli.debug)?;
    tracing::info!(?cli, "session start");

    let config = config::load_config()?;

    let profile_path = Profile::default_path();
    let mut profile = match Profile::load_from(&profile_path) {
        Ok(profile) => profile,
        Err(e) => {
            tracing::warn!(path = %profile_path.display(), error = %e, "unreadable profile, starting signed out");
            Profile::default()
        }
    };
    if let Some(name) = &cli.player {
        profile.name = name.clone();
        profile.user_id.get_or_insert(PlayerId(LOCAL_USER_ID));
        profile.save_to(&profile_path)?;
    }

    let ledger = open_ledger(&config, &profile);
    let controller = MatchController::new(config, profile, Some(ledger))?.with_profile_path(profile_path);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, controller, &cli);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

/// In-process match service seeded with the local user and the guest seat
fn open_ledger(config: &Config, profile: &Profile) -> Arc<dyn MatchApi> {
    let ledger = LocalLedger::new(config.profile.initial_rating);
    let guest = PlayerId(config.profile.guest_player_id);

    if let Err(e) = ledger.register_player(guest, "guest", None) {
        tracing::warn!(error = %e, "could not register guest player");
    }
    if let Some(id) = profile.user_id {
        if let Err(e) = ledger.register_player(id, &profile.name, profile.rating) {
            tracing::warn!(%id, error = %e, "could not register local player");
        }
    }
    Arc::new(ledger)
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    mut controller: MatchController,
    cli: &CliArgs,
) -> Result<(), io::Error> {
    let difficulty = cli.difficulty.unwrap_or(controller.config().ai.difficulty);
    let mut menu = MenuState::new(difficulty, &controller.config().maps);
    menu.custom = cli.custom;

    if let Some(map) = &cli.map {
        if !menu.select_map(map) {
            menu.message = Some(format!("unknown map: {}", map));
        }
    }

    if let Some(mode) = cli.mode {
        let settings = menu.settings_for(mode);
        menu.message = launch(terminal, &mut controller, settings)?;
    }

    while controller.frame_loop().is_running() {
        // Ratings from a match finished just before leaving it
        let now = controller.frame_loop().now_ms();
        if let Err(e) = controller.pump_events(None, &mut None, now) {
            tracing::warn!(error = %e, "reporter event while in menu");
        }

        terminal.draw(|f| render_menu(f, &menu, controller.profile()))?;

        match handle_menu_input(&mut menu)? {
            MenuAction::None => {}
            MenuAction::Quit => controller.frame_loop().cancel(),
            MenuAction::StartGame(settings) => {
                menu.message = launch(terminal, &mut controller, settings)?;
            }
        }
    }

    tracing::info!("session end");
    Ok(())
}

/// Run the chosen mode; returns the message to show in the menu, if any
fn launch<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    controller: &mut MatchController,
    settings: MatchSettings,
) -> Result<Option<String>, io::Error> {
    tracing::info!(mode = ?settings.mode, difficulty = %settings.difficulty, map = %settings.map, custom = ?settings.custom, "launch");

    let exit = if settings.mode == GameMode::Tournament {
        controller.run_tournament(terminal, settings.custom)?
    } else {
        controller.play(terminal, settings)?
    };

    Ok(match exit {
        SessionExit::Failed(message) => Some(message),
        SessionExit::Quit | SessionExit::Next => None,
    })
}

/// Parse command line arguments
fn parse_args(args: &[String]) -> Result<CliArgs, io::Error> {
    let program = args.first().map_or("arcade-pong", |s| s.as_str());
    let mut cli = CliArgs::default();
    let mut rest = args.iter().skip(1);

    while let Some(arg) = rest.next() {
        match arg.as_str() {
            "--mode" | "-m" => {
                let value = required_value(program, arg, rest.next());
                match value.parse::<GameMode>() {
                    Ok(mode) => cli.mode = Some(mode),
                    Err(e) => usage_error(program, &e),
                }
            }
            "--difficulty" | "-d" => {
                let value = required_value(program, arg, rest.next());
                match value.parse::<Difficulty>() {
                    Ok(difficulty) => cli.difficulty = Some(difficulty),
                    Err(e) => usage_error(program, &e.to_string()),
                }
            }
            "--map" => cli.map = Some(required_value(program, arg, rest.next())),
            "--player" => cli.player = Some(required_value(program, arg, rest.next())),
            "--ball-speed" => cli.custom.ball_speed = Some(positive_value(program, arg, rest.next())),
            "--ball-radius" => cli.custom.ball_radius = Some(positive_value(program, arg, rest.next())),
            "--paddle-speed" => cli.custom.paddle_speed = Some(positive_value(program, arg, rest.next())),
            "--paddle-length" => cli.custom.paddle_length = Some(positive_value(program, arg, rest.next())),
            "--debug" => cli.debug = true,
            "--help" | "-h" => {
                print_usage(program);
                std::process::exit(0);
            }
            other => usage_error(program, &format!("Unknown argument: {}", other)),
        }
    }

    Ok(cli)
}

fn required_value(program: &str, flag: &str, value: Option<&String>) -> String {
    match value {
        Some(value) => value.clone(),
        None => usage_error(program, &format!("{} requires a value", flag)),
    }
}

fn positive_value(program: &str, flag: &str, value: Option<&String>) -> f32 {
    let value = required_value(program, flag, value);
    match value.parse::<f32>() {
        Ok(number) if number.is_finite() && number > 0.0 => number,
        _ => usage_error(program, &format!("{} needs a positive number, got {}", flag, value)),
    }
}

fn usage_error(program: &str, message: &str) -> ! {
    eprintln!("Error: {}", message);
    print_usage(program);
    std::process::exit(1);
}

fn print_usage(program: &str) {
    println!("Arcade Pong - Terminal Pong with AI, local multiplayer and tournaments");
    println!();
    println!("Usage:");
    println!("  {}                              # Main menu", program);
    println!("  {} --mode <one|two|four|tournament>", program);
    println!("  {} --difficulty <easy|medium|hard|expert>", program);
    println!("  {} --map <name>                 # Obstacle map for one/two player", program);
    println!("  {} --player <name>              # Sign in locally as <name>", program);
    println!("  {} --ball-speed <n> --ball-radius <n>", program);
    println!("  {} --paddle-speed <n> --paddle-length <n>   # Per-match overrides", program);
    println!("  {} --debug                      # Log to {}", program, logging::LOG_FILE_PATH);
    println!();
    println!("Config: {}", config::get_config_path().display());
}
