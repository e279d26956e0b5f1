use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        Block, BorderType, Borders, Paragraph,
        canvas::{Canvas, Context, Line as CanvasLine, Rectangle},
    },
};

use crate::game::sprites::{BIRD_HEIGHT, BIRD_WIDTH, PIPE_WIDTH};
use crate::game::{ArenaSnapshot, BirdView, PipeView};
use crate::metrics::GameMetrics;

/// Playback state shown alongside the arena
#[derive(Debug, Clone, Copy)]
pub struct Overlay<'a> {
    pub speed: &'a str,
    pub paused: bool,
    /// Best fitness of the last evaluated generation
    pub last_best_fitness: Option<f64>,
}

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(
        &self,
        frame: &mut Frame,
        snapshot: &ArenaSnapshot,
        metrics: &GameMetrics,
        overlay: Overlay<'_>,
    ) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Arena
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        let stats = self.render_stats(chunks[0], snapshot, metrics, overlay);
        frame.render_widget(stats, chunks[0]);

        let arena_area = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(20),
                Constraint::Percentage(60),
                Constraint::Percentage(20),
            ])
            .split(chunks[1])[1];

        self.render_arena(frame, arena_area, snapshot, overlay.paused);

        let controls = self.render_controls(chunks[2]);
        frame.render_widget(controls, chunks[2]);
    }

    fn render_arena(&self, frame: &mut Frame, area: Rect, snapshot: &ArenaSnapshot, paused: bool) {
        let title = if paused { " Flappy (paused) " } else { " Flappy " };

        let canvas = Canvas::default()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(Color::White))
                    .title(title),
            )
            .marker(Marker::Braille)
            .x_bounds([0.0, snapshot.field_width as f64])
            .y_bounds([0.0, snapshot.field_height as f64])
            .paint(move |ctx| {
                let height = snapshot.field_height as f64;

                let floor_y = snapshot.floor_y as f64;
                for (index, pipe) in snapshot.pipes.iter().enumerate() {
                    draw_pipe(ctx, pipe, floor_y, height, index == snapshot.tracked_pipe);
                }

                // Floor surface plus tile seams to show it scrolling
                let floor = height - floor_y;
                ctx.draw(&CanvasLine {
                    x1: 0.0,
                    y1: floor,
                    x2: snapshot.field_width as f64,
                    y2: floor,
                    color: Color::Yellow,
                });
                for seam in snapshot.floor_tiles {
                    ctx.draw(&CanvasLine {
                        x1: seam as f64,
                        y1: floor,
                        x2: seam as f64 - 20.0,
                        y2: floor - 20.0,
                        color: Color::DarkGray,
                    });
                }

                ctx.layer();
                for bird in &snapshot.birds {
                    draw_bird(ctx, bird, height);
                }
            });

        frame.render_widget(canvas, area);
    }

    fn render_stats(
        &self,
        _area: Rect,
        snapshot: &ArenaSnapshot,
        metrics: &GameMetrics,
        overlay: Overlay<'_>,
    ) -> Paragraph<'_> {
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default().fg(Color::White);

        let last_best = overlay
            .last_best_fitness
            .map(|f| format!("{:.1}", f))
            .unwrap_or_else(|| "-".to_string());

        let text = vec![Line::from(vec![
            Span::styled("Gen: ", label),
            Span::styled(
                snapshot.generation.to_string(),
                value.add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Score: ", label),
            Span::styled(
                snapshot.score.to_string(),
                value.add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Alive: ", label),
            Span::styled(snapshot.alive().to_string(), value),
            Span::raw("    "),
            Span::styled("Best score: ", label),
            Span::styled(metrics.best_score.to_string(), value),
            Span::raw("    "),
            Span::styled("Last best fitness: ", label),
            Span::styled(last_best, value),
            Span::raw("    "),
            Span::styled("Speed: ", label),
            Span::styled(overlay.speed.to_string(), value),
            Span::raw("    "),
            Span::styled("Time: ", label),
            Span::styled(metrics.format_time(), value),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_controls(&self, _area: Rect) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("Space", Style::default().fg(Color::Cyan)),
            Span::raw(" pause | "),
            Span::styled(".", Style::default().fg(Color::Cyan)),
            Span::raw(" step | "),
            Span::styled("1-4 +/-", Style::default().fg(Color::Cyan)),
            Span::raw(" speed | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Canvas y grows upwards, the arena's grows downwards
fn draw_pipe(ctx: &mut Context<'_>, pipe: &PipeView, floor_y: f64, height: f64, tracked: bool) {
    let color = if tracked { Color::LightGreen } else { Color::Green };
    let gap_top = pipe.gap_top as f64;
    let gap_bottom = pipe.gap_bottom as f64;

    ctx.draw(&Rectangle {
        x: pipe.x as f64,
        y: height - gap_top,
        width: PIPE_WIDTH as f64,
        height: gap_top,
        color,
    });

    if floor_y > gap_bottom {
        ctx.draw(&Rectangle {
            x: pipe.x as f64,
            y: height - floor_y,
            width: PIPE_WIDTH as f64,
            height: floor_y - gap_bottom,
            color,
        });
    }
}

fn draw_bird(ctx: &mut Context<'_>, bird: &BirdView, height: f64) {
    let w = BIRD_WIDTH as f64;
    let h = BIRD_HEIGHT as f64;
    let bottom = height - bird.y as f64 - h;

    ctx.draw(&Rectangle {
        x: bird.x as f64,
        y: bottom,
        width: w,
        height: h,
        color: Color::LightYellow,
    });

    // Beak follows the tilt
    let (cx, cy) = (bird.x as f64 + w / 2.0, bottom + h / 2.0);
    let angle = (bird.tilt as f64).to_radians();
    ctx.draw(&CanvasLine {
        x1: cx,
        y1: cy,
        x2: cx + angle.cos() * w * 0.75,
        y2: cy + angle.sin() * w * 0.75,
        color: Color::LightRed,
    });
}
