//! Rendering layer: all terminal I/O lives here.
//!
//! Each function receives a mutable writer and an immutable view of the
//! play field. No game logic is performed; this module only translates
//! render items into terminal commands. One world unit is one cell.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color as TermColor, Print},
    terminal,
    QueueableCommand,
};
use space_raiders::catalog::{Color, ImageId};
use space_raiders::entities::PlayerId;
use space_raiders::playfield::{PlayField, RenderItem};

const C_BORDER: TermColor = TermColor::DarkBlue;
const C_HUD_SCORE: TermColor = TermColor::Yellow;
const C_MESSAGE: TermColor = TermColor::White;
const C_HINT: TermColor = TermColor::DarkGrey;

/// Rows above the play field reserved for the HUD.
pub const HUD_ROWS: u16 = 1;

/// Round status shown over the field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Banner {
    None,
    Victory,
    GameOver,
}

pub struct Hud<'a> {
    pub scores: &'a [(PlayerId, u32)],
    pub messages: Vec<&'a str>,
    pub banner: Banner,
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(out: &mut W, field: &PlayField, hud: &Hud<'_>) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let bounds = field.bounds();
    let (width, height) = (bounds.x as u16, bounds.y as u16);

    draw_border(out, width, height)?;
    draw_hud(out, width, hud)?;
    for item in field.render_items() {
        draw_item(out, &item, width, height)?;
    }
    draw_messages(out, height, &hud.messages)?;

    match hud.banner {
        Banner::None => {}
        Banner::Victory => draw_banner(out, width, height, "YOU  WIN", TermColor::Green)?,
        Banner::GameOver => draw_banner(out, width, height, "GAME  OVER", TermColor::Red)?,
    }

    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, height + HUD_ROWS + 1))?;
    out.flush()?;
    Ok(())
}

// ── Frame ─────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, width: u16, height: u16) -> std::io::Result<()> {
    out.queue(style::SetForegroundColor(C_BORDER))?;
    out.queue(cursor::MoveTo(0, height + HUD_ROWS))?;
    out.queue(Print("─".repeat(width as usize)))?;
    Ok(())
}

fn draw_hud<W: Write>(out: &mut W, width: u16, hud: &Hud<'_>) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    let line = hud
        .scores
        .iter()
        .map(|(id, score)| format!("P{}:{:>6}", id.0 + 1, score))
        .collect::<Vec<_>>()
        .join("   ");
    out.queue(Print(&line))?;

    let hint = "← → / A D : Move   P : Pause   Q : Quit";
    let hx = width.saturating_sub(hint.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(hx, 0))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(hint))?;
    Ok(())
}

fn draw_messages<W: Write>(out: &mut W, height: u16, messages: &[&str]) -> std::io::Result<()> {
    out.queue(style::SetForegroundColor(C_MESSAGE))?;
    for (i, msg) in messages.iter().rev().take(3).enumerate() {
        let row = (height + HUD_ROWS).saturating_sub(1 + i as u16);
        out.queue(cursor::MoveTo(1, row))?;
        out.queue(Print(msg))?;
    }
    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn sprite(image: ImageId) -> &'static [&'static str] {
    match image {
        ImageId::Null => &[],
        ImageId::Player1 => &["  ▲  ", "▟███▙"],
        ImageId::Player2 => &["  ▲  ", "▛███▜"],
        ImageId::PlayerLaser => &["│"],
        ImageId::PlayerLaserLeft => &["\\"],
        ImageId::PlayerLaserRight => &["/"],
        ImageId::AlienLaser => &["↓"],
        ImageId::Alien => &["▄▀█▀▄", "▀ ▀ ▀"],
        ImageId::BetterAlien => &[" ▄█▄ ", "█▀█▀█", "▀   ▀"],
        ImageId::Explosion => &["\\|/", "-*-", "/|\\"],
        ImageId::Wall => &["▄▄▄▄▄▄", "██████"],
        ImageId::SpeedPowerUp => &["╭───╮", "│ S │", "╰───╯"],
        ImageId::FirePowerUp => &["╭───╮", "│ F │", "╰───╯"],
        ImageId::DoublePowerUp => &["╭───╮", "│ D │", "╰───╯"],
        ImageId::TriplePowerUp => &["╭───╮", "│ T │", "╰───╯"],
        ImageId::InvulnerabilityPowerUp => &["╭───╮", "│ I │", "╰───╯"],
        ImageId::Bomb => &["╭───╮", "│ B │", "╰───╯"],
    }
}

fn term_color(color: Color) -> TermColor {
    match color {
        Color::White => TermColor::Grey,
        Color::Red => TermColor::DarkRed,
        Color::RedIntense => TermColor::Red,
        Color::Green => TermColor::DarkGreen,
        Color::GreenIntense => TermColor::Green,
        Color::Blue => TermColor::DarkBlue,
        Color::BlueIntense => TermColor::Blue,
        Color::LightBlueIntense => TermColor::Cyan,
        Color::Yellow => TermColor::DarkYellow,
        Color::YellowIntense => TermColor::Yellow,
        Color::Purple => TermColor::DarkMagenta,
        Color::PurpleIntense => TermColor::Magenta,
    }
}

/// Draw a sprite centered on the item's position, clipped to the field.
fn draw_item<W: Write>(out: &mut W, item: &RenderItem, width: u16, height: u16) -> std::io::Result<()> {
    let rows = sprite(item.visual.image);
    if rows.is_empty() {
        return Ok(());
    }
    let cols = rows[0].chars().count() as i32;
    let left = item.pos.x.round() as i32 - cols / 2;
    let top = item.pos.y.round() as i32 - rows.len() as i32 / 2;

    out.queue(style::SetForegroundColor(term_color(item.visual.color)))?;
    for (dy, row) in rows.iter().enumerate() {
        let y = top + dy as i32;
        if y < 0 || y >= height as i32 || left < 0 || left + cols > width as i32 {
            continue;
        }
        out.queue(cursor::MoveTo(left as u16, y as u16 + HUD_ROWS))?;
        out.queue(Print(*row))?;
    }
    Ok(())
}

// ── Overlay ───────────────────────────────────────────────────────────────────

fn draw_banner<W: Write>(out: &mut W, width: u16, height: u16, title: &str, color: TermColor) -> std::io::Result<()> {
    let lines = [
        "╔════════════════════╗".to_string(),
        format!("║{:^20}║", title),
        "╚════════════════════╝".to_string(),
    ];
    let cx = width / 2;
    let start_row = (height / 2).saturating_sub(2);

    out.queue(style::SetForegroundColor(color))?;
    for (i, line) in lines.iter().enumerate() {
        let col = cx.saturating_sub(line.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, start_row + i as u16))?;
        out.queue(Print(line))?;
    }

    let hint = "R - Play Again  Q - Quit";
    let col = cx.saturating_sub(hint.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, start_row + lines.len() as u16))?;
    out.queue(style::SetForegroundColor(TermColor::White))?;
    out.queue(Print(hint))?;
    Ok(())
}
