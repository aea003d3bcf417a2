//! # TUI Adapter
//!
//! The ratatui/crossterm layer. Reads key presses, translates them into
//! `core::Action` values through the key table, runs the `Effect`s that
//! `update()` returns, and draws the frame produced by `view::render`.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Loop
//!
//! ```text
//! draw (if dirty) → poll keys (≤100ms) → drain pending keys → drain results
//!        ▲                                                        │
//!        └────────────────────────────────────────────────────────┘
//! ```
//!
//! Store commands run on tokio tasks and report back through an
//! `std::sync::mpsc` channel that the loop drains without blocking, so
//! `update` and `render` only ever run on this thread.

mod debounce;
pub mod delegate;
mod event;
pub mod keys;
pub mod view;

use std::io::{self, stdout};
use std::sync::{Arc, mpsc};
use std::time::Duration;

use crossterm::cursor::{Hide, Show};
use crossterm::event::{
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use log::{debug, info, warn};
use ratatui::widgets::Paragraph;

use crate::core::action::{Action, Effect, init, update};
use crate::core::command::{self, Command};
use crate::core::config::ResolvedConfig;
use crate::core::state::App;
use crate::store::TaskStore;
use crate::tui::debounce::Debouncer;
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};
use crate::tui::keys::{InputContext, KeyBindings};

const POLL_TIMEOUT: Duration = Duration::from_millis(100);

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> io::Result<Self> {
        // Unambiguous Esc; ignored by terminals without the protocol
        execute!(
            stdout(),
            Hide,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES)
        )?;
        info!("Terminal modes enabled (hidden cursor, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), PopKeyboardEnhancementFlags, Show);
        ratatui::restore();
    }
}

/// Runs effects on behalf of the loop.
struct EffectRunner {
    store: Arc<dyn TaskStore>,
    tx: mpsc::Sender<Action>,
    debouncer: Debouncer,
}

impl EffectRunner {
    /// Feeds one action through `update` and runs what it asks for.
    /// Returns whether the dashboard should quit.
    fn dispatch(&mut self, app: &mut App, action: Action) -> bool {
        debug!("Event loop received: {:?}", action);
        let effects = update(app, action);
        self.run(effects)
    }

    fn run(&mut self, effects: Vec<Effect>) -> bool {
        let mut quit = false;
        for effect in effects {
            match effect {
                Effect::Run(command) => spawn_command(self.store.clone(), command, self.tx.clone()),
                Effect::Debounce(generation) => self.debouncer.reset(generation),
                Effect::Quit => quit = true,
            }
        }
        quit
    }
}

pub fn run(config: ResolvedConfig, store: Arc<dyn TaskStore>) -> io::Result<()> {
    info!("Dashboard starting with {} store", store.name());
    let mut app = App::from_config(&config);
    let keys = KeyBindings::default();

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();
    let mut runner = EffectRunner {
        store,
        tx: tx.clone(),
        debouncer: Debouncer::new(config.debounce, tx),
    };

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new()?;

    let (width, height) = crossterm::terminal::size()?;
    update(&mut app, Action::Resize { width, height });

    let mut should_quit = runner.run(init(&app));
    let mut needs_redraw = true;

    while !should_quit {
        if needs_redraw {
            let frame = view::render(&app);
            terminal.draw(|f| f.render_widget(Paragraph::new(frame), f.area()))?;
            needs_redraw = false;
        }

        // Process first event + drain ALL pending events before next draw
        let mut event = poll_event_timeout(POLL_TIMEOUT)?;
        while let Some(current) = event {
            needs_redraw = true;
            let action = match current {
                TuiEvent::Resize(width, height) => Some(Action::Resize { width, height }),
                TuiEvent::Key(key) => keys.resolve(InputContext::for_modal(&app.modal), &key),
            };
            if let Some(action) = action {
                should_quit |= runner.dispatch(&mut app, action);
            }
            if should_quit {
                break;
            }
            event = poll_event_immediate()?;
        }

        // Handle background task actions (store results, debounce firings)
        while !should_quit && let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            should_quit |= runner.dispatch(&mut app, action);
        }
    }

    runner.debouncer.cancel();
    info!("Dashboard shutting down");
    Ok(())
}

fn spawn_command(store: Arc<dyn TaskStore>, command: Command, tx: mpsc::Sender<Action>) {
    info!("Spawning store command: {}", command.operation());
    tokio::spawn(async move {
        let action = command::execute(store.as_ref(), command).await;
        if tx.send(action).is_err() {
            warn!("Failed to send store result: receiver dropped");
        }
    });
}
