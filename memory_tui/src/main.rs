use std::collections::HashSet;
use std::fs::File;
use std::io::stdout;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Parser;
use memory::{
    grid_columns, CardId, CardState, Controller, Element, GameConfig, JsonFileStore,
    RenderSurface, Token, TITLE,
};
use ratatui::{
    crossterm::{
        event::{self, Event, KeyCode},
        terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
        ExecutableCommand,
    },
    prelude::*,
    widgets::*,
};
use tracing::info;
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
struct Args {
    /// Path to a JSON game config
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of pairs on the board (overrides the config)
    #[arg(short, long)]
    pairs: Option<usize>,

    /// RNG seed (overrides the config)
    #[arg(long)]
    seed: Option<u64>,

    /// How long a flipped pair stays visible, in milliseconds (overrides the config)
    #[arg(short, long)]
    delay_ms: Option<u64>,

    /// Where the high score is kept
    #[arg(long, default_value = "memory_scores.json")]
    scores: PathBuf,

    /// Write logs to this file. The terminal is taken by the game.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// A log level among "off", "error", "warn", "info", "debug", "trace"
    #[arg(short, long, default_value = "info")]
    log_level: LevelFilter,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    if let Some(path) = &args.log_file {
        initialize_logging(path, args.log_level)?;
    }

    let mut config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    if args.pairs.is_some() {
        config.pairs = args.pairs;
    }
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(delay_ms) = args.delay_ms {
        config.resolve_delay_ms = delay_ms;
    }
    let store = JsonFileStore::open(&args.scores)?;
    let controller = Controller::new(&config, TuiSurface::new(), store)?;
    let mut app = App {
        controller,
        cursor: 0,
        should_quit: false,
    };

    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let result = run(&mut app);
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    result
}

fn run(app: &mut App) -> anyhow::Result<()> {
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    while !app.should_quit {
        terminal.draw(|frame| app.ui(frame))?;
        app.handle_events()?;
        app.controller.tick(Instant::now());
    }
    info!("Quit");
    Ok(())
}

fn initialize_logging(path: &Path, level: LevelFilter) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let format = tracing_subscriber::fmt::format()
        .with_target(false)
        .compact();

    let filter = Targets::new().with_default(level);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(format)
                .with_ansi(false)
                .with_writer(Arc::new(file)),
        )
        .with(filter)
        .init();
    Ok(())
}

/// Keeps what the controller wants shown, to be drawn on the next frame.
struct TuiSurface {
    cards: Vec<(Token, CardState)>,
    message: String,
    guesses: u32,
    high_score: String,
    visible: HashSet<Element>,
}

impl TuiSurface {
    fn new() -> Self {
        let visible = [
            Element::StartScreen,
            Element::Scoreboard,
            Element::HighScoreBoard,
            Element::RestartButton,
        ]
        .into_iter()
        .filter(|e| e.initially_visible())
        .collect();
        Self {
            cards: Vec::new(),
            message: String::from(TITLE),
            guesses: 0,
            high_score: String::new(),
            visible,
        }
    }

    fn is_visible(&self, element: Element) -> bool {
        self.visible.contains(&element)
    }
}

impl RenderSurface for TuiSurface {
    fn create_card(&mut self, card: CardId, token: &Token) {
        debug_assert_eq!(card.0, self.cards.len());
        self.cards.push((token.clone(), CardState::FaceDown));
    }

    fn set_card_state(&mut self, card: CardId, state: CardState) {
        if let Some((_, card_state)) = self.cards.get_mut(card.0) {
            *card_state = state;
        }
    }

    fn clear_board(&mut self) {
        self.cards.clear();
    }

    fn show_message(&mut self, text: &str) {
        self.message = String::from(text);
    }

    fn toggle_visibility(&mut self, element: Element) {
        if !self.visible.remove(&element) {
            self.visible.insert(element);
        }
    }

    fn show_guesses(&mut self, guesses: u32) {
        self.guesses = guesses;
    }

    fn show_high_score(&mut self, text: &str) {
        self.high_score = String::from(text);
    }
}

struct App {
    controller: Controller<TuiSurface, JsonFileStore>,
    cursor: usize,
    should_quit: bool,
}

impl App {
    fn handle_events(&mut self) -> anyhow::Result<()> {
        if !event::poll(Duration::from_millis(16))? {
            return Ok(());
        }
        let Event::Key(key) = event::read()? else {
            return Ok(());
        };
        if key.kind != event::KeyEventKind::Press {
            return Ok(());
        }
        let surface = self.controller.surface();
        let num_cards = surface.cards.len();
        let columns = grid_columns(num_cards).max(1);
        let on_start_screen = surface.is_visible(Element::StartScreen);
        let can_restart = surface.is_visible(Element::RestartButton);
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('s') if on_start_screen => self.controller.start(),
            KeyCode::Char('r') if can_restart => {
                self.controller.restart();
                self.cursor = 0;
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                if on_start_screen {
                    self.controller.start();
                } else {
                    self.controller.select(CardId(self.cursor), Instant::now());
                }
            }
            KeyCode::Left | KeyCode::Char('h') => {
                self.cursor = self.cursor.saturating_sub(1);
            }
            KeyCode::Right | KeyCode::Char('l') if self.cursor + 1 < num_cards => {
                self.cursor += 1;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.cursor = self.cursor.checked_sub(columns).unwrap_or(self.cursor);
            }
            KeyCode::Down | KeyCode::Char('j') if self.cursor + columns < num_cards => {
                self.cursor += columns;
            }
            _ => {}
        }
        Ok(())
    }

    fn ui(&self, frame: &mut Frame) {
        let surface = self.controller.surface();
        let main_layout = Layout::new(
            Direction::Vertical,
            [
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(1),
            ],
        )
        .split(frame.size());

        frame.render_widget(
            Paragraph::new(surface.message.as_str())
                .alignment(Alignment::Center)
                .style(Style::new().add_modifier(Modifier::BOLD))
                .block(Block::new().borders(Borders::BOTTOM)),
            main_layout[0],
        );

        if surface.is_visible(Element::StartScreen) {
            frame.render_widget(
                Paragraph::new("Press s to start").alignment(Alignment::Center),
                main_layout[1],
            );
        } else {
            frame.render_widget(
                CardsWidget {
                    cards: &surface.cards,
                    cursor: self.cursor,
                },
                main_layout[1],
            );
        }

        let mut status = Vec::new();
        if surface.is_visible(Element::Scoreboard) {
            status.push(format!("Guesses: {}", surface.guesses));
        }
        if surface.is_visible(Element::HighScoreBoard) {
            status.push(format!("Best: {}", surface.high_score));
        }
        if surface.is_visible(Element::RestartButton) {
            status.push(String::from("r: play again"));
        }
        status.push(String::from("q: quit"));
        frame.render_widget(
            Paragraph::new(status.join("   ")).alignment(Alignment::Center),
            main_layout[2],
        );
    }
}

const CARD_WIDTH: u16 = 9;
const CARD_HEIGHT: u16 = 5;

struct CardsWidget<'a> {
    cards: &'a [(Token, CardState)],
    cursor: usize,
}

impl Widget for CardsWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.cards.is_empty() {
            return;
        }
        let columns = grid_columns(self.cards.len()) as u16;
        let rows = (self.cards.len() as u16).div_ceil(columns);
        let area = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Min(0),
                Constraint::Length(CARD_WIDTH * columns),
                Constraint::Min(0),
            ])
            .split(area)[1];
        let area = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(0),
                Constraint::Length(CARD_HEIGHT * rows),
                Constraint::Min(0),
            ])
            .split(area)[1];

        for (idx, (token, state)) in self.cards.iter().enumerate() {
            let (row, col) = (idx as u16 / columns, idx as u16 % columns);
            let rect = Rect {
                x: area.x + col * CARD_WIDTH,
                y: area.y + row * CARD_HEIGHT,
                width: CARD_WIDTH,
                height: CARD_HEIGHT,
            }
            .intersection(area);
            if rect.is_empty() {
                continue;
            }
            let border_style = if idx == self.cursor {
                Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else if *state == CardState::Matched {
                Style::new().fg(Color::DarkGray)
            } else {
                Style::new()
            };
            let block = Block::new()
                .border_type(BorderType::Rounded)
                .borders(Borders::all())
                .border_style(border_style);
            let inner = block.inner(rect);
            block.render(rect, buf);

            match state {
                CardState::FaceDown => {
                    buf.set_style(inner, Style::new().fg(Color::DarkGray));
                    for y in inner.top()..inner.bottom() {
                        buf.set_string(inner.x, y, "░".repeat(inner.width as usize), Style::new());
                    }
                }
                CardState::FaceUp | CardState::Matched => match token.rgb() {
                    Some((r, g, b)) => buf.set_style(inner, Style::new().bg(Color::Rgb(r, g, b))),
                    None => {
                        let label: String =
                            token.to_string().chars().take(inner.width as usize).collect();
                        let x =
                            inner.x + inner.width.saturating_sub(label.chars().count() as u16) / 2;
                        buf.set_string(x, inner.y + inner.height / 2, label, Style::new());
                    }
                },
            }
        }
    }
}
