use anyhow::{bail, Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use std::{
    fs::File,
    io::{stdout, Stdout},
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use tetris::config::{Difficulty, SessionConfig};
use tetris::game::{Direction, GameEvent, Session, SessionState, TetrominoKind, COLUMNS, MASK_SIZE, ROWS};
use tetris::scores::{load_leaderboard, FileScoreSink, ScoreRecord, ScoreSink};

// ============================================================================
// Command Line
// ============================================================================

#[derive(Debug, Parser)]
#[command(name = "tetris")]
#[command(about = "Falling-block puzzle in the terminal")]
struct Cli {
    /// Name recorded with the final score
    #[arg(long, default_value = "player")]
    name: String,
    /// easy, normal or hard
    #[arg(long, default_value = "normal")]
    difficulty: String,
    /// Fixed seed for the piece randomizer
    #[arg(long)]
    seed: Option<u64>,
    /// JSON session config; overrides --name and --difficulty
    #[arg(long)]
    config: Option<PathBuf>,
    /// Leaderboard file scores are appended to
    #[arg(long, default_value = "scores.txt")]
    scores: PathBuf,
    /// Write logs here (RUST_LOG sets the filter)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn session_config(&self) -> Result<SessionConfig> {
        let mut config = match &self.config {
            Some(path) => SessionConfig::load(path)?,
            None => {
                let Some(difficulty) = Difficulty::from_str(&self.difficulty) else {
                    bail!("unknown difficulty '{}'", self.difficulty);
                };
                SessionConfig::for_difficulty(self.name.clone(), difficulty)
            }
        };
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        Ok(config)
    }
}

fn init_logging(path: Option<&Path>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path).with_context(|| format!("creating log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

// ============================================================================
// Visual Constants
// ============================================================================

const CELL_WIDTH: u16 = 2;
const BLOCK_CHAR: &str = "██";
const EMPTY_CHAR: &str = "  ";
const LEADERBOARD_ROWS: usize = 5;

/// Terminals report no key release, so fast-drop stays on this long after
/// the last press.
const FAST_DROP_GRACE: Duration = Duration::from_millis(250);

// ============================================================================
// Color Mapping
// ============================================================================

fn tetromino_color(kind: TetrominoKind) -> Color {
    match kind {
        TetrominoKind::Horizontal => Color::Cyan,
        TetrominoKind::Square => Color::Yellow,
        TetrominoKind::Pyramid => Color::Magenta,
        TetrominoKind::StepUpRight => Color::Green,
        TetrominoKind::StepUpLeft => Color::Red,
        TetrominoKind::LeftCorner => Color::Blue,
        TetrominoKind::RightCorner => Color::Rgb(255, 165, 0),
    }
}

// ============================================================================
// Rendering
// ============================================================================

fn render(frame: &mut Frame, session: &Session, leaderboard: &[ScoreRecord]) {
    let area = frame.size();

    render_game(frame, session, area);
    match session.state() {
        SessionState::Paused => render_paused(frame, area),
        SessionState::GameOver => render_game_over(frame, session, leaderboard, area),
        SessionState::Setup | SessionState::Running => {}
    }
}

fn render_game(frame: &mut Frame, session: &Session, area: Rect) {
    let grid_display_width = (COLUMNS as u16 * CELL_WIDTH) + 2;
    let grid_display_height = ROWS as u16 + 2;
    let side_width = 16;
    let total_width = grid_display_width + side_width + 2;
    let total_height = grid_display_height + 2;

    let main_area = centered_rect(total_width, total_height, area);

    let vertical = Layout::vertical([
        Constraint::Length(grid_display_height),
        Constraint::Fill(1),
    ])
    .split(main_area);
    let game_row = vertical[0];

    // Layout: [Grid][Next / Info]
    let horizontal = Layout::horizontal([
        Constraint::Length(grid_display_width),
        Constraint::Length(side_width),
    ])
    .split(game_row);
    let side = Layout::vertical([Constraint::Length(6), Constraint::Fill(1)]).split(horizontal[1]);

    render_grid(frame, session, horizontal[0]);
    render_preview(frame, session, side[0]);
    render_info(frame, session, side[1]);

    let controls_area = Rect {
        x: area.x,
        y: game_row.y + game_row.height,
        width: area.width,
        height: 2,
    };
    if controls_area.y + 1 < area.height {
        let controls = Paragraph::new(vec![Line::from(
            "←→/AD: Move | ↑/W: Rotate | ↓/S: Fast | Space: Drop | P: Pause | R: Restart | Q: Quit",
        )])
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(controls, controls_area);
    }
}

fn render_grid(frame: &mut Frame, session: &Session, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Tetris ")
        .title_alignment(Alignment::Center);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut colors: Vec<Vec<Option<Color>>> = vec![vec![None; COLUMNS]; ROWS];
    for (x, y, kind) in session.visible_cells() {
        colors[y][x] = Some(tetromino_color(kind));
    }

    let lines: Vec<Line> = colors
        .into_iter()
        .map(|row| {
            let spans: Vec<Span> = row
                .into_iter()
                .map(|cell| match cell {
                    Some(color) => Span::styled(BLOCK_CHAR, Style::default().fg(color)),
                    None => Span::raw(EMPTY_CHAR),
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_preview(frame: &mut Frame, session: &Session, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Next ")
        .title_alignment(Alignment::Center);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(kind) = session.next_kind() else {
        return;
    };
    let mask = kind.mask();
    let color = tetromino_color(kind);

    let mut lines: Vec<Line> = Vec::new();
    for row in 0..MASK_SIZE {
        if !(0..MASK_SIZE).any(|col| mask.is_set(row, col)) {
            continue;
        }
        let mut spans: Vec<Span> = vec![Span::raw(" ")];
        for col in 0..MASK_SIZE {
            if mask.is_set(row, col) {
                spans.push(Span::styled(BLOCK_CHAR, Style::default().fg(color)));
            } else {
                spans.push(Span::raw(EMPTY_CHAR));
            }
        }
        lines.push(Line::from(spans));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_info(frame: &mut Frame, session: &Session, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Info ")
        .title_alignment(Alignment::Center);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let (minutes, seconds) = session.clock();
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("Player", Style::default().fg(Color::Magenta))),
        Line::from(session.config().player_name.clone()),
        Line::from(""),
        Line::from(Span::styled("Score", Style::default().fg(Color::Yellow))),
        Line::from(format!("{}", session.score())),
        Line::from(""),
        Line::from(Span::styled("Time", Style::default().fg(Color::Cyan))),
        Line::from(format!("{:02}:{:02}", minutes, seconds)),
        Line::from(""),
        Line::from(Span::styled("Speed", Style::default().fg(Color::Green))),
        Line::from(format!("{} ms", session.tick_interval().as_millis())),
        Line::from(session.config().difficulty.as_str()),
    ];

    let paragraph = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(paragraph, inner);
}

fn render_game_over(frame: &mut Frame, session: &Session, leaderboard: &[ScoreRecord], area: Rect) {
    let (minutes, seconds) = session.clock();
    let mut text = vec![
        Line::from(""),
        Line::from(Span::styled("GAME OVER", Style::default().fg(Color::Red))),
        Line::from(""),
        Line::from(format!("Score: {}", session.score())),
        Line::from(format!("Time: {}m {}s", minutes, seconds)),
        Line::from(""),
    ];
    for (rank, entry) in leaderboard.iter().take(LEADERBOARD_ROWS).enumerate() {
        text.push(Line::from(format!(
            "{}. {:<10} {:>6}",
            rank + 1,
            entry.name,
            entry.score
        )));
    }
    text.push(Line::from(""));
    text.push(Line::from(Span::styled(
        "R: restart | ESC: quit",
        Style::default().fg(Color::DarkGray),
    )));

    let height = text.len() as u16 + 2;
    let paragraph = Paragraph::new(text).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Game Over ")
            .title_alignment(Alignment::Center)
            .style(Style::default().bg(Color::Black)),
    );

    let popup_area = centered_rect(30, height, area);
    frame.render_widget(paragraph, popup_area);
}

fn render_paused(frame: &mut Frame, area: Rect) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("PAUSED", Style::default().fg(Color::Yellow))),
        Line::from(""),
        Line::from(Span::styled(
            "Press P to continue",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(Span::styled(
            "Press ESC to quit",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let paragraph = Paragraph::new(text).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Paused ")
            .title_alignment(Alignment::Center)
            .style(Style::default().bg(Color::Black)),
    );

    let popup_area = centered_rect(24, 10, area);
    frame.render_widget(paragraph, popup_area);
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let horizontal = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(width.min(area.width)),
        Constraint::Fill(1),
    ])
    .split(area);

    let vertical = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height.min(area.height)),
        Constraint::Fill(1),
    ])
    .split(horizontal[1]);

    vertical[1]
}

// ============================================================================
// Main Loop
// ============================================================================

fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    session: &mut Session,
    sink: &mut FileScoreSink,
) -> Result<()> {
    let mut leaderboard: Vec<ScoreRecord> = Vec::new();
    let mut last_tick = Instant::now();
    let mut last_frame = Instant::now();
    let mut fast_drop_until: Option<Instant> = None;

    loop {
        terminal.draw(|frame| render(frame, session, &leaderboard))?;

        // Tick interval may have changed since the last tick
        let timeout = session
            .tick_interval()
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => break,
                        KeyCode::Char('p') | KeyCode::Char('P') => session.pause_game(),
                        KeyCode::Char('r') | KeyCode::Char('R') => {
                            session.start();
                            leaderboard.clear();
                            last_tick = Instant::now();
                        }
                        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => {
                            session.move_block(Direction::Left);
                        }
                        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => {
                            session.move_block(Direction::Right);
                        }
                        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => {
                            fast_drop_until = Some(Instant::now() + FAST_DROP_GRACE);
                            session.set_fast_drop(true);
                            session.move_block(Direction::Down);
                        }
                        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => {
                            session.rotate();
                        }
                        KeyCode::Char(' ') => {
                            session.hard_drop();
                        }
                        _ => {}
                    }
                }
            }
        }

        let now = Instant::now();
        session.advance_clock(now - last_frame);
        last_frame = now;
        session.set_fast_drop(fast_drop_until.is_some_and(|until| now < until));

        if last_tick.elapsed() >= session.tick_interval() {
            session.advance();
            last_tick = Instant::now();
        }

        for event in session.take_events() {
            if let GameEvent::GameOver(record) = event {
                if let Err(e) = sink.submit(&record) {
                    log::error!("could not save score: {:#}", e);
                }
                leaderboard = load_leaderboard(sink.path()).unwrap_or_else(|e| {
                    log::warn!("could not read leaderboard: {:#}", e);
                    vec![record]
                });
            }
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref())?;
    let config = cli.session_config()?;

    let mut session = Session::new(config);
    let mut sink = FileScoreSink::new(cli.scores.clone());
    session.start();

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut session, &mut sink);

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}
