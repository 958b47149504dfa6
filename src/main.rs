#![allow(dead_code)]

mod buffer;
mod clipboard;
mod config;
mod files;
mod input;
mod lexer;
mod repeat;
mod session;
mod theme;
mod ui;

use std::io::stdout;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{
        self, Event, KeyCode, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use ratatui::prelude::*;

use config::Config;
use input::{InputState, KeyId};
use repeat::KeyRepeater;
use session::{Command, EditSession};

const FRAME_INTERVAL: Duration = Duration::from_millis(30);

#[derive(Parser, Debug)]
#[command(name = "ced")]
#[command(author, version, about = "Small TUI code editor with C syntax highlighting", long_about = None)]
struct Args {
    /// File or directory to open
    #[arg(default_value = ".")]
    path: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::load().unwrap_or_default();

    // A file argument opens that file rooted at its parent directory;
    // a directory argument just sets the browser root.
    let (root, file) = if args.path.is_file() {
        let root = args
            .path
            .parent()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        (root, Some(args.path.clone()))
    } else {
        (args.path.clone(), None)
    };

    let mut session = EditSession::new(&root, file.as_deref(), config.editor.tab_size)?;

    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;

    // Key releases only arrive under the kitty keyboard protocol; without
    // it the repeater stays off and the terminal's own auto-repeat drives
    // held keys.
    let enhanced = supports_keyboard_enhancement().unwrap_or(false);
    if enhanced {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
    }

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut session, &config, enhanced);

    if enhanced {
        execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)?;
    }
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    Ok(())
}

/// Chords the repeater owns when key releases are available. Everything
/// else fires once per press.
fn build_repeater(delay: Duration) -> KeyRepeater<KeyId, Command> {
    let mut repeater = KeyRepeater::new(delay);
    for select in [false, true] {
        let shift = if select {
            KeyModifiers::SHIFT
        } else {
            KeyModifiers::NONE
        };
        for word in [false, true] {
            let mods = if word { shift | KeyModifiers::CONTROL } else { shift };
            repeater.register((KeyCode::Left, mods), Command::Left { word, select });
            repeater.register((KeyCode::Right, mods), Command::Right { word, select });
        }
        repeater.register((KeyCode::Up, shift), Command::Up { select });
        repeater.register((KeyCode::Down, shift), Command::Down { select });
    }
    repeater.register((KeyCode::Backspace, KeyModifiers::NONE), Command::Backspace);
    repeater.register((KeyCode::Delete, KeyModifiers::NONE), Command::DeleteForward);
    repeater
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    session: &mut EditSession,
    config: &Config,
    enhanced: bool,
) -> Result<()> {
    let delay = Duration::from_millis(config.editor.repeat_delay_ms);
    let mut repeater = build_repeater(delay);
    let mut input_state = InputState::new();

    loop {
        terminal.draw(|frame| ui::render(frame, session, config))?;

        input_state.begin_frame();
        let mut budget = FRAME_INTERVAL;
        while event::poll(budget)? {
            budget = Duration::ZERO;
            if let Event::Key(key) = event::read()? {
                if enhanced {
                    input_state.on_key(&key);
                    let id: KeyId = (key.code, key.modifiers);
                    // Repeater-owned chords fire through the tick below;
                    // everything else follows the terminal's own repeat.
                    if !repeater.is_bound(&id)
                        && matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat)
                    {
                        if let Some(cmd) = input::map_key(&key) {
                            session.dispatch(cmd);
                        }
                    }
                } else if matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
                    if let Some(cmd) = input::map_key(&key) {
                        session.dispatch(cmd);
                    }
                }
            }
        }

        if enhanced {
            let now = Instant::now();
            let fired = repeater.tick(
                now,
                |id| input_state.was_just_pressed(id),
                |id| input_state.is_down(id),
            );
            for cmd in fired {
                session.dispatch(cmd);
            }
        }

        if session.should_quit {
            break;
        }
    }
    Ok(())
}
