//! Braille renderer. Every entity mask is blitted once per mirror offset, so
//! an object straddling an edge or corner shows up at all of its wrapped
//! positions, drawn from the same dot data the collider tests.

use std::collections::HashMap;

use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::app::{App, Speed};
use crate::entity::{Entity, Kind, SizeClass};
use crate::game::{Game, ShipState, EXPLOSION_TICKS, WORLD_HEIGHT, WORLD_WIDTH};
use crate::vec2::Vec2;

const BG: Color = Color::Rgb(5, 5, 15);
const SHIP_COLOR: Color = Color::Rgb(80, 255, 140);
const BULLET_COLOR: Color = Color::Rgb(255, 240, 80);
const EXPLOSION_COLOR: Color = Color::Rgb(255, 140, 40);

fn rock_color(size: SizeClass) -> Color {
    match size {
        SizeClass::Big => Color::Rgb(170, 150, 120),
        SizeClass::Medium => Color::Rgb(190, 170, 140),
        SizeClass::Small => Color::Rgb(210, 190, 160),
    }
}

pub fn render(frame: &mut Frame, app: &mut App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Rgb(100, 200, 255)))
        .title(" Rustroids ")
        .title_style(
            Style::default()
                .fg(Color::Rgb(130, 220, 255))
                .add_modifier(Modifier::BOLD),
        );
    let inner = block.inner(frame.area());
    frame.render_widget(block, frame.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(8),
            Constraint::Length(1),
        ])
        .split(inner);

    render_status(frame, app, chunks[0]);

    let field = chunks[1];
    if field.width > 0 && field.height > 0 {
        let lines = render_field(&app.game, field.width as usize, field.height as usize);
        frame.render_widget(Paragraph::new(lines), field);
        if let Some(text) = app.game.status_text() {
            render_banner(frame, field, text);
        }
    }

    render_help(frame, app, chunks[2]);
}

fn render_status(frame: &mut Frame, app: &App, area: Rect) {
    let game = &app.game;
    let speed = match app.speed {
        Speed::Normal => "60",
        Speed::Slow => "1",
    };
    let mut spans = vec![
        Span::styled(
            format!(" Rocks: {} ", game.asteroids.len()),
            Style::default().fg(Color::Rgb(160, 140, 120)),
        ),
        Span::styled("| ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!("Bullets: {} ", game.bullets.len()),
            Style::default().fg(Color::Yellow),
        ),
        Span::styled("| ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!("Tick: {} ", game.tick_count),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled("| ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!("FPS: {} ", speed),
            Style::default().fg(Color::Green),
        ),
    ];
    if game.paused {
        spans.push(Span::styled("| ", Style::default().fg(Color::DarkGray)));
        spans.push(Span::styled(
            "PAUSED ",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let help = if app.game.is_over() {
        Line::from(vec![
            Span::styled(
                " GAME OVER ",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                "Press ENTER to restart, Q to quit",
                Style::default().fg(Color::Gray),
            ),
        ])
    } else {
        Line::from(vec![
            Span::styled(" \u{2190}\u{2192} Rotate ", Style::default().fg(Color::DarkGray)),
            Span::styled("| ", Style::default().fg(Color::Rgb(60, 60, 60))),
            Span::styled("\u{2191} Thrust ", Style::default().fg(Color::DarkGray)),
            Span::styled("| ", Style::default().fg(Color::Rgb(60, 60, 60))),
            Span::styled(
                "Space Fire ",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::styled("| ", Style::default().fg(Color::Rgb(60, 60, 60))),
            Span::styled("P Pause ", Style::default().fg(Color::DarkGray)),
            Span::styled("| ", Style::default().fg(Color::Rgb(60, 60, 60))),
            Span::styled("S Slow / F Fast ", Style::default().fg(Color::DarkGray)),
            Span::styled("| ", Style::default().fg(Color::Rgb(60, 60, 60))),
            Span::styled("Q Quit", Style::default().fg(Color::DarkGray)),
        ])
    };
    frame.render_widget(Paragraph::new(help), area);
}

fn render_banner(frame: &mut Frame, field: Rect, text: &str) {
    let banner = Rect {
        x: field.x,
        y: field.y + field.height / 2,
        width: field.width,
        height: 1,
    };
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            text,
            Style::default()
                .fg(Color::Rgb(200, 200, 0))
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center),
        banner,
    );
}

// ── Braille field ──────────────────────────────────────────────────────

fn braille_bit(sub_x: usize, sub_y: usize) -> u8 {
    match (sub_x, sub_y) {
        (0, 0) => 0x01,
        (0, 1) => 0x02,
        (0, 2) => 0x04,
        (0, 3) => 0x40,
        (1, 0) => 0x08,
        (1, 1) => 0x10,
        (1, 2) => 0x20,
        (1, 3) => 0x80,
        _ => 0,
    }
}

fn set_dot(map: &mut HashMap<(usize, usize), u8>, bx: i32, by: i32, bw: i32, bh: i32) {
    if bx < 0 || by < 0 || bx >= bw || by >= bh {
        return;
    }
    let cx = bx as usize / 2;
    let cy = by as usize / 4;
    *map.entry((cx, cy)).or_insert(0) |= braille_bit(bx as usize % 2, by as usize % 4);
}

fn write_layer(
    grid: &mut [Vec<(char, Style)>],
    map: &HashMap<(usize, usize), u8>,
    w: usize,
    h: usize,
    color: Color,
) {
    for (&(cx, cy), &bits) in map {
        if cx < w && cy < h && bits != 0 {
            let style = Style::default().fg(color).bg(BG);
            let existing = grid[cy][cx].0 as u32;
            let merged = if (0x2800..0x2900).contains(&existing) {
                (existing - 0x2800) as u8 | bits
            } else {
                bits
            };
            let ch = char::from_u32(0x2800 + merged as u32).unwrap_or(' ');
            grid[cy][cx] = (ch, style);
        }
    }
}

/// Blit one entity's current mask at every mirror position.
fn draw_entity(
    map: &mut HashMap<(usize, usize), u8>,
    entity: &Entity,
    game: &Game,
    bsx: f32,
    bsy: f32,
    bw: i32,
    bh: i32,
) {
    let (hw, hh) = entity.half_extents();
    for offset in entity.mirror_offsets(&game.space) {
        let origin = entity.pos + offset - Vec2::new(hw, hh);
        for (mx, my) in entity.mask().opaque_dots() {
            let wx = origin.x + mx as f32 + 0.5;
            let wy = origin.y + my as f32 + 0.5;
            set_dot(map, (wx * bsx) as i32, (wy * bsy) as i32, bw, bh);
        }
    }
}

fn draw_explosion(
    map: &mut HashMap<(usize, usize), u8>,
    center: Vec2,
    frame: u32,
    bsx: f32,
    bsy: f32,
    bw: i32,
    bh: i32,
) {
    let progress = frame as f32 / EXPLOSION_TICKS as f32;
    let radius = 2.0 + progress * 10.0;
    for i in 0..32 {
        let angle = i as f32 / 32.0 * std::f32::consts::TAU;
        let wx = center.x + angle.cos() * radius;
        let wy = center.y + angle.sin() * radius;
        set_dot(map, (wx * bsx) as i32, (wy * bsy) as i32, bw, bh);
    }
}

fn render_field(game: &Game, w: usize, h: usize) -> Vec<Line<'static>> {
    let bw = (w * 2) as i32;
    let bh = (h * 4) as i32;
    let bsx = bw as f32 / WORLD_WIDTH;
    let bsy = bh as f32 / WORLD_HEIGHT;

    let mut grid: Vec<Vec<(char, Style)>> = vec![vec![(' ', Style::default().bg(BG)); w]; h];

    // Sparse fixed starfield behind everything.
    for (yi, row) in grid.iter_mut().enumerate() {
        for (xi, cell) in row.iter_mut().enumerate() {
            let hash = ((xi * 7 + yi * 13 + 37) * 31) % 250;
            if hash < 2 {
                let b = 35 + (hash as u8) * 15;
                *cell = ('.', Style::default().fg(Color::Rgb(b, b, b + 8)).bg(BG));
            }
        }
    }

    for rock in &game.asteroids {
        let Kind::Asteroid(size) = rock.kind else {
            continue;
        };
        let mut map = HashMap::new();
        draw_entity(&mut map, rock, game, bsx, bsy, bw, bh);
        write_layer(&mut grid, &map, w, h, rock_color(size));
    }

    for bullet in &game.bullets {
        let mut map = HashMap::new();
        draw_entity(&mut map, bullet, game, bsx, bsy, bw, bh);
        write_layer(&mut grid, &map, w, h, BULLET_COLOR);
    }

    match game.ship_state {
        ShipState::Flying => {
            let mut map = HashMap::new();
            draw_entity(&mut map, &game.ship, game, bsx, bsy, bw, bh);
            write_layer(&mut grid, &map, w, h, SHIP_COLOR);
        }
        ShipState::Exploding { frame } => {
            let mut map = HashMap::new();
            draw_explosion(&mut map, game.ship.pos, frame, bsx, bsy, bw, bh);
            write_layer(&mut grid, &map, w, h, EXPLOSION_COLOR);
        }
        ShipState::Removed => {}
    }

    grid.into_iter()
        .map(|row| {
            let spans: Vec<Span<'static>> = row
                .into_iter()
                .map(|(ch, style)| Span::styled(String::from(ch), style))
                .collect();
            Line::from(spans)
        })
        .collect()
}
