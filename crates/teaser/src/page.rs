//! Static page content drawn over the particle background.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Paragraph, Wrap},
};
use teaser_background::relative_luminance;
use teaser_core::{Rgb, SchemePreference};

use crate::links::{NEW_TAB, SocialLink};

const BRAND: &str = "⚔ MEMEBATTLES";
const PILL: &str = "BNB Chain • Launchpad • Leagues";
const BADGE: &str = "⚔ The arena opens soon";
const HEADLINE: &str = "MemeBattles is";
const HEADLINE_ACCENT: &str = " coming soon";
const LEAD: &str = "A creator-first meme launchpad where every launch becomes a competition: \
UpVotes drive discovery and on-chain leagues turn launches into repeatable events.";

/// Feature cards as (title, text).
const CARDS: [(&str, &str); 3] = [
    (
        "Launch in seconds",
        "Create a campaign, watch the bonding curve fill, and graduate into liquidity.",
    ),
    (
        "UpVote-driven discovery",
        "Transparent, paid promotion that pushes real demand into ranking and visibility.",
    ),
    (
        "Weekly & monthly leagues",
        "Recurring finals and winners that create content beats and bring communities back.",
    ),
];

/// Widest the hero column gets.
const HERO_WIDTH: u16 = 96;
const BUTTON_WIDTH: u16 = 23;
const LEAD_HEIGHT: u16 = 3;
const CARD_HEIGHT: u16 = 6;

/// Brand accent (amber).
const ACCENT: Color = Color::Rgb(230, 170, 60);

/// Everything the page needs to draw itself.
#[derive(Debug, Clone)]
pub struct PageView<'a> {
    pub links: &'a [SocialLink],
    /// Footer status text, hidden when empty.
    pub status: &'a str,
    pub year: i32,
    /// Color behind the page, when known.
    pub backdrop: Option<Rgb>,
    pub scheme: SchemePreference,
    /// Transient message replacing the key help.
    pub notice: Option<&'a str>,
}

/// Text colors readable over the backdrop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Palette {
    text: Color,
    muted: Color,
}

impl Palette {
    fn for_backdrop(backdrop: Option<Rgb>) -> Self {
        match backdrop.map(|rgb| relative_luminance(rgb) < 0.5) {
            Some(true) => Self {
                text: Color::Rgb(236, 236, 240),
                muted: Color::Rgb(150, 150, 165),
            },
            Some(false) => Self {
                text: Color::Rgb(24, 24, 28),
                muted: Color::Rgb(95, 95, 110),
            },
            None => Self {
                text: Color::Reset,
                muted: Color::DarkGray,
            },
        }
    }
}

/// Render the page into the whole frame.
pub fn render(frame: &mut Frame, view: &PageView) {
    let palette = Palette::for_backdrop(view.backdrop);
    let area = frame.area();

    let hero_height = 1 + 1 + 1 + 1 + LEAD_HEIGHT + 1 + 3 + 1 + CARD_HEIGHT;
    let [header, _, hero, _, footer] = Layout::vertical([
        Constraint::Length(1),           // Brand header
        Constraint::Fill(1),             // Top padding
        Constraint::Length(hero_height), // Hero
        Constraint::Fill(1),             // Bottom padding
        Constraint::Length(1),           // Footer
    ])
    .areas(area);

    render_header(frame, header, palette);
    let [_, column, _] = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(HERO_WIDTH.min(area.width)),
        Constraint::Fill(1),
    ])
    .areas(hero);
    render_hero(frame, column, view, palette);
    render_footer(frame, footer, view, palette);
}

fn render_header(frame: &mut Frame, area: Rect, palette: Palette) {
    let brand = Line::from(BRAND).style(Style::new().fg(ACCENT).add_modifier(Modifier::BOLD));
    frame.render_widget(Paragraph::new(brand), inset(area));

    let pill = Line::from(format!("[ {PILL} ]")).style(Style::new().fg(palette.muted));
    frame.render_widget(Paragraph::new(pill).alignment(Alignment::Right), inset(area));
}

fn render_hero(frame: &mut Frame, area: Rect, view: &PageView, palette: Palette) {
    let [badge, _, headline, _, lead, _, buttons, _, cards] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(LEAD_HEIGHT),
        Constraint::Length(1),
        Constraint::Length(3),
        Constraint::Length(1),
        Constraint::Length(CARD_HEIGHT),
    ])
    .areas(area);

    frame.render_widget(
        Line::from(BADGE).style(Style::new().fg(ACCENT)).centered(),
        badge,
    );

    let title = Line::from(vec![
        Span::styled(HEADLINE, Style::new().fg(palette.text).bold()),
        Span::styled(HEADLINE_ACCENT, Style::new().fg(ACCENT).bold()),
    ])
    .centered();
    frame.render_widget(title, headline);

    let lead_text = Paragraph::new(LEAD)
        .style(Style::new().fg(palette.muted))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(lead_text, lead);

    render_buttons(frame, buttons, view.links, palette);
    render_cards(frame, cards, palette);
}

/// Text shown on a link button; `index` is zero-based.
pub fn button_label(index: usize, link: &SocialLink) -> String {
    if link.is_disabled() {
        format!("{} {} (soon)", link.icon.glyph(), link.label)
    } else {
        let external = if link.target == Some(NEW_TAB) { " ↗" } else { "" };
        format!("{} {} {}{external}", index + 1, link.icon.glyph(), link.label)
    }
}

fn render_buttons(frame: &mut Frame, area: Rect, links: &[SocialLink], palette: Palette) {
    let slots = Layout::horizontal(links.iter().map(|_| Constraint::Length(BUTTON_WIDTH)))
        .flex(Flex::Center)
        .spacing(1)
        .split(area);

    for (index, (link, slot)) in links.iter().zip(slots.iter()).enumerate() {
        let (text_style, border_style) = if link.is_disabled() {
            (
                Style::new().fg(palette.muted).add_modifier(Modifier::DIM),
                Style::new().fg(palette.muted).add_modifier(Modifier::DIM),
            )
        } else {
            (Style::new().fg(palette.text).bold(), Style::new().fg(ACCENT))
        };
        let button = Paragraph::new(Line::from(button_label(index, link)).style(text_style))
            .alignment(Alignment::Center)
            .block(Block::bordered().border_style(border_style));
        frame.render_widget(button, *slot);
    }
}

fn render_cards(frame: &mut Frame, area: Rect, palette: Palette) {
    let slots = Layout::horizontal([Constraint::Fill(1); CARDS.len()])
        .spacing(1)
        .split(area);

    for ((title, text), slot) in CARDS.iter().zip(slots.iter()) {
        let block = Block::bordered()
            .border_style(Style::new().fg(palette.muted))
            .title(Line::from(format!(" {title} ")).style(Style::new().fg(ACCENT).bold()));
        let card = Paragraph::new(*text)
            .style(Style::new().fg(palette.text))
            .wrap(Wrap { trim: true })
            .block(block);
        frame.render_widget(card, *slot);
    }
}

fn render_footer(frame: &mut Frame, area: Rect, view: &PageView, palette: Palette) {
    let area = inset(area);
    let copyright = Line::from(format!("© {} MemeBattles. All rights reserved.", view.year))
        .style(Style::new().fg(palette.muted));
    frame.render_widget(Paragraph::new(copyright), area);

    let center = match view.notice {
        Some(notice) => Line::from(notice.to_string()).style(Style::new().fg(ACCENT)),
        None => Line::from(vec![
            "q".bold().fg(ACCENT),
            " quit  ".fg(palette.muted),
            "s".bold().fg(ACCENT),
            Span::styled(
                format!(" scheme: {}  ", view.scheme.label()),
                Style::new().fg(palette.muted),
            ),
            "1-4".bold().fg(ACCENT),
            " open link".fg(palette.muted),
        ]),
    };
    frame.render_widget(Paragraph::new(center).alignment(Alignment::Center), area);

    if !view.status.is_empty() {
        let status = Line::from(view.status.to_string()).style(Style::new().fg(palette.muted));
        frame.render_widget(Paragraph::new(status).alignment(Alignment::Right), area);
    }
}

/// Area shrunk by one column on each side.
fn inset(area: Rect) -> Rect {
    let margin = 1.min(area.width / 2);
    Rect {
        x: area.x + margin,
        width: area.width - 2 * margin,
        ..area
    }
}
