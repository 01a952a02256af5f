// Frame loop and match controller
//
// One thread drives input, simulation and rendering. Match-lifecycle calls
// go through the reporter thread and come back as events drained each frame.

use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::time::{Duration, Instant};

use ratatui::{backend::Backend, Terminal};

use crate::api::{self, MatchApi, MatchReporter, Profile, ReportEvent};
use crate::config::{Config, KeyBindings};
use crate::error::StartError;
use crate::game::input::{poll_input, Command, InputState, KeyMap, KeyTracker};
use crate::game::session::{GamePhase, MatchSession, MatchSettings};
use crate::game::state::{Customization, GameMode, Slot};
use crate::tournament::Bracket;
use crate::ui::{self, Hud, OverlayMessage};

/// Fixed-rate frame pacing with a shared stop flag
#[derive(Debug, Clone)]
pub struct FrameLoop {
    frame_duration: Duration,
    started: Instant,
    running: Arc<AtomicBool>,
}

impl FrameLoop {
    pub fn new(target_fps: u64) -> Self {
        Self {
            frame_duration: Duration::from_millis(1000 / target_fps.max(1)),
            started: Instant::now(),
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Milliseconds since the loop was created; the clock every session runs on
    pub fn now_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    pub fn frame_duration(&self) -> Duration {
        self.frame_duration
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Stop every loop driven by this handle (or any clone of it) after the current frame
    pub fn cancel(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Sleep out the rest of the frame that began at `frame_start`
    pub fn limit_frame_rate(&self, frame_start: Instant) {
        let elapsed = frame_start.elapsed();
        if elapsed < self.frame_duration {
            std::thread::sleep(self.frame_duration - elapsed);
        }
    }
}

/// How a session loop ended
#[derive(Debug, Clone, PartialEq)]
pub enum SessionExit {
    /// Player left; back to the menu
    Quit,
    /// Tournament sub-match decided and acknowledged
    Next,
    /// Start refused; the message goes to the menu
    Failed(String),
}

/// Owns everything a match needs besides the session itself
pub struct MatchController {
    config: Config,
    keymap: KeyMap,
    tracker: KeyTracker,
    input: InputState,
    reporter: Option<MatchReporter>,
    profile: Profile,
    profile_path: Option<PathBuf>,
    frames: FrameLoop,
    /// Why the last final score was not recorded
    finish_error: Option<String>,
}

impl MatchController {
    /// Without an API every recorded mode fails to start; tournaments still work
    pub fn new(config: Config, profile: Profile, api: Option<Arc<dyn MatchApi>>) -> io::Result<Self> {
        let reporter = api.map(MatchReporter::spawn).transpose()?;
        Ok(Self {
            keymap: KeyMap::from_bindings(&config.keybindings),
            tracker: KeyTracker::default(),
            input: InputState::default(),
            frames: FrameLoop::new(config.display.target_fps),
            reporter,
            profile,
            profile_path: None,
            finish_error: None,
            config,
        })
    }

    /// Save the profile here whenever a rating changes
    pub fn with_profile_path(mut self, path: PathBuf) -> Self {
        self.profile_path = Some(path);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn frame_loop(&self) -> &FrameLoop {
        &self.frames
    }

    pub fn finish_error(&self) -> Option<&str> {
        self.finish_error.as_deref()
    }

    pub fn new_session(&self, settings: MatchSettings) -> Result<MatchSession, StartError> {
        MatchSession::new(settings, &self.config)
    }

    /// Begin `session` right away, or ask for a match record first.
    ///
    /// Returns the reporter ticket to wait for when a record is needed.
    pub fn request_start(&mut self, session: &mut MatchSession, now_ms: u64) -> Result<Option<u64>, StartError> {
        self.finish_error = None;
        match api::create_request(session.mode(), &self.profile, &self.config.profile)? {
            None => {
                session.begin(None, now_ms)?;
                Ok(None)
            }
            Some(request) => {
                let reporter = self
                    .reporter
                    .as_mut()
                    .ok_or_else(|| StartError::CreateFailed("no match service".to_string()))?;
                let ticket = reporter
                    .create(request)
                    .map_err(|e| StartError::CreateFailed(e.to_string()))?;
                tracing::debug!(ticket, mode = ?session.mode(), "match record requested");
                Ok(Some(ticket))
            }
        }
    }

    /// Handle one reporter event, if any.
    ///
    /// `pending` is the ticket `session` waits on; a matching reply begins the
    /// session or refuses it. Replies to older tickets are ignored. With
    /// `blocking` this waits for the next event. Returns whether an event was seen.
    pub fn handle_next_event(
        &mut self,
        session: Option<&mut MatchSession>,
        pending: &mut Option<u64>,
        now_ms: u64,
        blocking: bool,
    ) -> Result<bool, StartError> {
        let Some(reporter) = self.reporter.as_ref() else {
            return Ok(false);
        };
        let event = if blocking {
            reporter.recv_event()
        } else {
            reporter.try_recv_event()
        };
        let Some(event) = event else {
            return Ok(false);
        };

        match event {
            ReportEvent::Created { ticket, record } => {
                if *pending == Some(ticket) {
                    *pending = None;
                    if let Some(session) = session {
                        session.begin(Some(record.id), now_ms)?;
                    }
                } else {
                    tracing::debug!(ticket, id = %record.id, "stale match record ignored");
                }
            }
            ReportEvent::CreateFailed { ticket, error } => {
                if *pending == Some(ticket) {
                    *pending = None;
                    tracing::warn!(ticket, %error, "match creation failed");
                    return Err(StartError::CreateFailed(error));
                }
            }
            ReportEvent::Finished(response) => {
                if self.profile.apply_ratings(&response) {
                    self.save_profile();
                }
            }
            ReportEvent::FinishFailed { id, error } => {
                tracing::warn!(%id, %error, "could not submit final score");
                self.finish_error = Some(error);
            }
        }
        Ok(true)
    }

    /// Drain every waiting event without blocking
    pub fn pump_events(
        &mut self,
        mut session: Option<&mut MatchSession>,
        pending: &mut Option<u64>,
        now_ms: u64,
    ) -> Result<(), StartError> {
        while self.handle_next_event(session.as_deref_mut(), pending, now_ms, false)? {}
        Ok(())
    }

    /// Send the final score of a finished recorded match
    pub fn submit_result(&self, session: &MatchSession) {
        let (Some(outcome), Some(reporter)) = (session.outcome(), self.reporter.as_ref()) else {
            return;
        };
        let Some(id) = outcome.match_id else {
            return;
        };
        if let Err(e) = reporter.finish(id, api::finish_request(outcome)) {
            tracing::warn!(%id, error = %e, "could not queue final score");
        }
    }

    fn save_profile(&self) {
        if let Some(path) = &self.profile_path {
            if let Err(e) = self.profile.save_to(path) {
                tracing::warn!(path = %path.display(), error = %e, "could not save profile");
            }
        }
    }

    /// Play one match until the player quits or the start is refused
    pub fn play<B: Backend>(&mut self, terminal: &mut Terminal<B>, settings: MatchSettings) -> io::Result<SessionExit> {
        let mut session = match self.new_session(settings) {
            Ok(session) => session,
            Err(e) => return Ok(SessionExit::Failed(e.to_string())),
        };
        let labels = self.labels_for(session.mode(), session.bot_name());
        self.run_session(terminal, &mut session, labels, false)
    }

    /// Run a local bracket from the configured players until there is a champion.
    ///
    /// Every sub-match uses the same ball and paddle overrides.
    pub fn run_tournament<B: Backend>(&mut self, terminal: &mut Terminal<B>, custom: Customization) -> io::Result<SessionExit> {
        let mut bracket = match Bracket::new(self.config.tournament.players.clone()) {
            Ok(bracket) => bracket,
            Err(e) => return Ok(SessionExit::Failed(e.to_string())),
        };
        let (tx, rx) = mpsc::channel();

        while let Some(pairing) = bracket.next_pairing() {
            let settings = MatchSettings {
                custom,
                ..MatchSettings::new(GameMode::Tournament)
            };
            let mut session = match self.new_session(settings) {
                Ok(session) => session,
                Err(e) => return Ok(SessionExit::Failed(e.to_string())),
            };
            let winners = tx.clone();
            session.on_finish(Box::new(move |outcome| {
                let _ = winners.send(outcome.winner);
            }));

            tracing::info!(round = pairing.round, left = %pairing.left, right = %pairing.right, "tournament match");
            let labels = vec![
                (Slot::Left, pairing.left.clone()),
                (Slot::Right, pairing.right.clone()),
            ];
            match self.run_session(terminal, &mut session, labels, true)? {
                SessionExit::Next => {}
                other => return Ok(other),
            }

            while let Ok(winner) = rx.try_recv() {
                if let Err(e) = bracket.advance(winner) {
                    tracing::warn!(error = %e, "bracket rejected result");
                }
            }
        }

        if let Some(champion) = bracket.champion() {
            let overlay = OverlayMessage::success(vec![
                format!("{} wins the tournament", champion),
                String::new(),
                "Press any command key".to_string(),
            ])
            .with_title("CHAMPION");
            self.show_until_command(terminal, overlay)?;
        }
        Ok(SessionExit::Quit)
    }

    fn run_session<B: Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
        session: &mut MatchSession,
        labels: Vec<(Slot, String)>,
        tournament: bool,
    ) -> io::Result<SessionExit> {
        self.tracker.clear();
        self.input.clear();

        let mut pending = match self.request_start(session, self.frames.now_ms()) {
            Ok(pending) => pending,
            Err(e) => return Ok(SessionExit::Failed(e.to_string())),
        };
        let hint = controls_hint(&self.config.keybindings, session.mode());

        loop {
            let frame_start = Instant::now();
            if !self.frames.is_running() {
                return Ok(SessionExit::Quit);
            }
            let now = self.frames.now_ms();

            let commands = poll_input(&self.keymap, &mut self.tracker, now)?;
            self.tracker.apply(&mut self.input, now);

            for command in commands {
                match command {
                    Command::Quit => return Ok(SessionExit::Quit),
                    Command::Rematch | Command::Start if session.phase() == GamePhase::GameOver => {
                        if tournament {
                            return Ok(SessionExit::Next);
                        }
                        if command == Command::Rematch {
                            session.reset();
                            pending = match self.request_start(session, now) {
                                Ok(pending) => pending,
                                Err(e) => return Ok(SessionExit::Failed(e.to_string())),
                            };
                        }
                    }
                    _ => {}
                }
            }

            if let Err(e) = self.pump_events(Some(&mut *session), &mut pending, now) {
                let mut overlay = OverlayMessage::error(vec![e.to_string()]).with_title("MATCH NOT STARTED");
                overlay.push_line(String::new());
                overlay.push_line("Press any command key");
                self.show_until_command(terminal, overlay)?;
                return Ok(SessionExit::Failed(e.to_string()));
            }

            let report = session.step(&self.input, now);
            if report.finished() && !tournament {
                self.submit_result(session);
            }

            let hud = Hud {
                labels: labels.clone(),
                hint: hint.clone(),
                overlay: session_overlay(
                    session,
                    &labels,
                    &self.config.keybindings,
                    pending.is_some(),
                    tournament,
                    self.finish_error(),
                ),
            };
            let view: &MatchSession = session;
            terminal.draw(|f| ui::render(f, view, &self.config.display, &hud))?;

            self.frames.limit_frame_rate(frame_start);
        }
    }

    fn show_until_command<B: Backend>(&mut self, terminal: &mut Terminal<B>, overlay: OverlayMessage) -> io::Result<()> {
        loop {
            let frame_start = Instant::now();
            if !self.frames.is_running() {
                return Ok(());
            }
            let commands = poll_input(&self.keymap, &mut self.tracker, self.frames.now_ms())?;
            if !commands.is_empty() {
                return Ok(());
            }
            terminal.draw(|f| {
                let area = f.area();
                ui::overlay::render_overlay(f, &overlay, area)
            })?;
            self.frames.limit_frame_rate(frame_start);
        }
    }

    /// Score-line labels: the profile name for the local user, the bot for the AI slot
    pub fn labels_for(&self, mode: GameMode, bot_name: Option<&str>) -> Vec<(Slot, String)> {
        let me = if self.profile.name.is_empty() {
            "P1".to_string()
        } else {
            self.profile.name.clone()
        };
        match mode {
            GameMode::OnePlayer => vec![
                (Slot::Left, me),
                (Slot::Right, bot_name.unwrap_or("AI").to_string()),
            ],
            GameMode::TwoPlayers => vec![(Slot::Left, me), (Slot::Right, "P2".to_string())],
            GameMode::FourPlayers => vec![
                (Slot::Left, me),
                (Slot::Right, "P2".to_string()),
                (Slot::Top, "P3".to_string()),
                (Slot::Bottom, "P4".to_string()),
            ],
            GameMode::Tournament => Vec::new(),
        }
    }
}

impl Drop for MatchController {
    fn drop(&mut self) {
        self.frames.cancel();
        if let Some(mut reporter) = self.reporter.take() {
            reporter.shutdown();
        }
    }
}

/// Overlay for the current phase, if the field should be covered
pub fn session_overlay(
    session: &MatchSession,
    labels: &[(Slot, String)],
    keys: &KeyBindings,
    waiting: bool,
    tournament: bool,
    finish_error: Option<&str>,
) -> Option<OverlayMessage> {
    if waiting {
        return Some(OverlayMessage::info(vec!["Creating match...".to_string()]));
    }
    if session.phase() != GamePhase::GameOver {
        return None;
    }
    let winner = session.winner()?;
    let name = labels
        .iter()
        .find(|(slot, _)| *slot == winner)
        .map_or_else(|| winner.to_string(), |(_, name)| name.clone());

    let footer = if tournament {
        format!("{}: Next match  |  {}: Quit", keys.start, keys.quit)
    } else {
        format!("{}: Rematch  |  {}: Menu", keys.rematch, keys.quit)
    };
    let lines = vec![format!("{} WINS", name.to_uppercase()), String::new(), footer];
    let overlay = match finish_error {
        None => OverlayMessage::success(lines),
        Some(error) => {
            let mut overlay = OverlayMessage::warning(lines);
            overlay.push_line(format!("Result not recorded: {}", error));
            overlay
        }
    };
    Some(overlay.with_title("GAME OVER"))
}

/// Key summary for the paddles in play
pub fn controls_hint(keys: &KeyBindings, mode: GameMode) -> String {
    let left = format!("{}/{}: Left", keys.p1_up, keys.p1_down);
    let right = format!("{}/{}: Right", keys.p2_up, keys.p2_down);
    let quit = format!("{}: Quit", keys.quit);
    match mode {
        GameMode::OnePlayer => format!("{}  {}", left, quit),
        GameMode::TwoPlayers | GameMode::Tournament => format!("{}  {}  {}", left, right, quit),
        GameMode::FourPlayers => format!(
            "{}  {}  {}/{}: Top  {}/{}: Bottom  {}",
            left, right, keys.p3_left, keys.p3_right, keys.p4_left, keys.p4_right, quit
        ),
    }
}
