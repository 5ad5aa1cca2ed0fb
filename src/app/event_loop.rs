use std::io::stdout;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, DisableBracketedPaste, EnableBracketedPaste};
use crossterm::execute;
use ratatui::DefaultTerminal;
use tracing::{debug, info};

use crate::app::{App, Model, update};
use crate::rerender::LiveHighlighter;
use crate::search::Fetcher;

impl App {
    /// Run the main event loop.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal initialization or the event loop
    /// encounters an I/O failure.
    pub fn run(&mut self) -> Result<()> {
        let mut model = Model::new(LiveHighlighter::new(self.highlight.clone()))
            .with_max_results(self.max_results)
            .with_light_background(self.light_background);
        if let Some(query) = self.initial_query.as_deref() {
            model = model.with_query(query);
        }
        let fetcher = Fetcher::new(self.source.clone());

        let mut terminal = ratatui::try_init()
            .context("Failed to initialize terminal - quoteline requires an interactive terminal")?;
        if let Err(err) = execute!(stdout(), EnableBracketedPaste) {
            ratatui::restore();
            return Err(err).context("Failed to enable bracketed paste");
        }
        info!("event loop started");

        let result = Self::event_loop(&mut terminal, &mut model, &fetcher);

        let _ = execute!(stdout(), DisableBracketedPaste);
        ratatui::restore();

        result
    }

    fn event_loop(
        terminal: &mut DefaultTerminal,
        model: &mut Model,
        fetcher: &Fetcher,
    ) -> Result<()> {
        let mut needs_render = true;

        loop {
            if Self::drain_fetch_outcomes(model, fetcher) {
                needs_render = true;
            }

            // Short poll while a search is in flight so results show promptly.
            let searching = matches!(model.results, crate::app::ResultsState::Searching { .. });
            let poll_ms = if needs_render {
                0
            } else if searching {
                20
            } else {
                250
            };
            if event::poll(Duration::from_millis(poll_ms))? {
                if let Some(msg) = Self::handle_event(event::read()?, model) {
                    Self::dispatch(model, fetcher, msg);
                    needs_render = true;
                }

                // Coalesce key repeat bursts and pastes into a single render.
                while event::poll(Duration::from_millis(0))? {
                    if let Some(msg) = Self::handle_event(event::read()?, model) {
                        Self::dispatch(model, fetcher, msg);
                        needs_render = true;
                    }
                }
            }

            if needs_render {
                terminal.draw(|frame| crate::ui::render(model, frame))?;
                needs_render = false;
            }

            if model.should_quit {
                break;
            }
        }
        Ok(())
    }

    fn dispatch(model: &mut Model, fetcher: &Fetcher, msg: crate::app::Message) {
        debug!(?msg, "message");
        let side_msg = msg.clone();
        *model = update(std::mem::take(model), msg);
        Self::handle_message_side_effects(model, fetcher, &side_msg);
    }
}
