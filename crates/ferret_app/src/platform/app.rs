use std::io::{self, BufRead};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use ferret_core::{update, AppState, Effect, Msg, NodeKind};
use ferret_logging::{ferret_debug, ferret_info};

use super::config::AppConfig;
use super::effects::EffectRunner;
use super::ui::input::{parse_command, Command, HELP};
use super::ui::render::{PageRenderer, TerminalRenderer};

enum AppEvent {
    Input(String),
    InputClosed,
    Tick,
}

/// Runs the interactive client until the user quits or stdin closes.
pub fn run_app(config: AppConfig) -> anyhow::Result<()> {
    let (event_tx, event_rx) = mpsc::channel::<AppEvent>();
    spawn_ticker(event_tx.clone(), config.tick_interval())?;
    spawn_stdin_reader(event_tx)?;

    let runner = EffectRunner::new(config.engine_settings())?;
    let mut app = App {
        state: AppState::new(config.downloads_dir.clone()),
        runner,
        renderer: TerminalRenderer::new(io::stdout()),
        prompt_shown: false,
    };

    app.renderer.on_notice(HELP);
    app.dispatch(Msg::Navigate(config.home));

    for event in event_rx {
        match event {
            AppEvent::Tick => app.pump_engine(),
            AppEvent::Input(line) => {
                app.prompt_shown = false;
                if !app.handle_command(parse_command(&line)) {
                    break;
                }
            }
            AppEvent::InputClosed => break,
        }
        app.refresh_prompt();
    }

    ferret_info!("Shutting down");
    app.runner.shutdown();
    Ok(())
}

fn spawn_ticker(event_tx: mpsc::Sender<AppEvent>, interval: Duration) -> anyhow::Result<()> {
    thread::Builder::new()
        .name("ferret-tick".to_string())
        .spawn(move || {
            while event_tx.send(AppEvent::Tick).is_ok() {
                thread::sleep(interval);
            }
        })
        .context("spawning tick thread")?;
    Ok(())
}

fn spawn_stdin_reader(event_tx: mpsc::Sender<AppEvent>) -> anyhow::Result<()> {
    thread::Builder::new()
        .name("ferret-input".to_string())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                if event_tx.send(AppEvent::Input(line)).is_err() {
                    return;
                }
            }
            let _ = event_tx.send(AppEvent::InputClosed);
        })
        .context("spawning input thread")?;
    Ok(())
}

struct App {
    state: AppState,
    runner: EffectRunner,
    renderer: TerminalRenderer<io::Stdout>,
    prompt_shown: bool,
}

impl App {
    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        if state.consume_dirty() {
            self.prompt_shown = false;
        }
        self.state = state;
        self.runner.apply(effects, &mut self.renderer);
    }

    fn pump_engine(&mut self) {
        for msg in self.runner.drain() {
            self.dispatch(msg);
        }
    }

    /// Returns `false` when the user asked to quit.
    fn handle_command(&mut self, command: Command) -> bool {
        ferret_debug!("Command {:?}", command);
        match command {
            Command::Quit => return false,
            Command::Back => self.dispatch(Msg::Back),
            Command::Forward => self.dispatch(Msg::Forward),
            Command::Up => self.dispatch(Msg::Up),
            Command::Reload => self.dispatch(Msg::Reload),
            Command::Go(input) => self.dispatch(Msg::Navigate(input)),
            Command::Follow { number, query } => self.follow(number, query),
            Command::Help => self.renderer.on_notice(HELP),
            Command::Empty => {}
        }
        true
    }

    fn follow(&mut self, number: usize, query: Option<String>) {
        let Some(target) = self.renderer.link(number).cloned() else {
            self.notice(format!("No link {number} on this page"));
            return;
        };
        let msg = match (target.kind, query) {
            (NodeKind::Search, Some(query)) => Msg::SubmitSearch {
                base_url: target.url,
                query,
            },
            (NodeKind::Search, None) => {
                self.notice(format!("Search with: {number} <words>"));
                return;
            }
            (_, _) => Msg::Navigate(target.url),
        };
        self.dispatch(msg);
    }

    fn notice(&mut self, message: String) {
        self.runner
            .apply(vec![Effect::Notice(message)], &mut self.renderer);
    }

    fn refresh_prompt(&mut self) {
        if self.prompt_shown || self.state.view().loading {
            return;
        }
        self.renderer.prompt(self.state.current_location());
        self.prompt_shown = true;
    }
}
