use ratatui::style::{Color, Modifier, Style};

use crate::model::UiConfig;
use crate::parse::HighlightTag;

/// Parsed color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    pub highlight: Color,
    pub dim: Color,
    pub red: Color,
    pub yellow: Color,
    pub green: Color,
    pub cyan: Color,
    pub purple: Color,
    pub blue: Color,
    pub selection_bg: Color,
    pub search_match_bg: Color,
    pub search_match_fg: Color,
    pub context: Color,
    pub project: Color,
    pub due_date: Color,
    pub date: Color,
    pub completed: Color,
    /// Priorities A through F; lower priorities use `text`
    pub priorities: [Color; 6],
}

impl Default for Theme {
    fn default() -> Self {
        let red = Color::Rgb(0xFF, 0x44, 0x44);
        let yellow = Color::Rgb(0xFF, 0xD7, 0x00);
        let green = Color::Rgb(0x44, 0xFF, 0x88);
        let cyan = Color::Rgb(0x44, 0xDD, 0xFF);
        let purple = Color::Rgb(0xCC, 0x66, 0xFF);
        let blue = Color::Rgb(0x44, 0x88, 0xFF);
        let dim = Color::Rgb(0x7D, 0x78, 0xBF);

        Theme {
            background: Color::Rgb(0x0C, 0x00, 0x1B),
            text: Color::Rgb(0xB0, 0xAA, 0xFF),
            text_bright: Color::Rgb(0xFF, 0xFF, 0xFF),
            highlight: Color::Rgb(0xFB, 0x41, 0x96),
            dim,
            red,
            yellow,
            green,
            cyan,
            purple,
            blue,
            selection_bg: Color::Rgb(0x3D, 0x14, 0x38),
            search_match_bg: Color::Rgb(0x40, 0xE0, 0xD0),
            search_match_fg: Color::Rgb(0x0C, 0x00, 0x1B),
            context: purple,
            project: cyan,
            due_date: yellow,
            date: dim,
            completed: Color::Rgb(0x5A, 0x56, 0x8C),
            priorities: [red, yellow, green, cyan, blue, purple],
        }
    }
}

/// Parse a hex color string like "#FF4444" into an RGB Color
fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

impl Theme {
    /// Create a theme from the `[ui.colors]` config, falling back to defaults
    pub fn from_config(ui: &UiConfig) -> Self {
        let mut theme = Theme::default();

        for (key, value) in &ui.colors {
            let Some(color) = parse_hex_color(value) else {
                log::warn!("ignoring color {} = {:?}: not #RRGGBB", key, value);
                continue;
            };
            match key.as_str() {
                "background" => theme.background = color,
                "text" => theme.text = color,
                "text_bright" => theme.text_bright = color,
                "highlight" => theme.highlight = color,
                "dim" => theme.dim = color,
                "red" => theme.red = color,
                "yellow" => theme.yellow = color,
                "green" => theme.green = color,
                "cyan" => theme.cyan = color,
                "purple" => theme.purple = color,
                "blue" => theme.blue = color,
                "selection_bg" => theme.selection_bg = color,
                "search_match_bg" => theme.search_match_bg = color,
                "search_match_fg" => theme.search_match_fg = color,
                "context" => theme.context = color,
                "project" => theme.project = color,
                "due_date" => theme.due_date = color,
                "date" => theme.date = color,
                "completed" => theme.completed = color,
                other => match other
                    .strip_prefix("priority_")
                    .and_then(|p| priority_slot(p.chars().next()?))
                {
                    Some(slot) if other.len() == "priority_a".len() => {
                        theme.priorities[slot] = color
                    }
                    _ => log::warn!("unknown theme color: {}", other),
                },
            }
        }

        theme
    }

    /// Color for a priority letter; `None` past F
    pub fn priority_color(&self, priority: char) -> Option<Color> {
        priority_slot(priority).map(|slot| self.priorities[slot])
    }

    /// Foreground style for a highlighted fragment of a task line
    pub fn style_for(&self, tag: HighlightTag) -> Style {
        let base = Style::default().bg(self.background);
        match tag {
            HighlightTag::Plain => base.fg(self.text),
            HighlightTag::Completed => base
                .fg(self.completed)
                .add_modifier(Modifier::CROSSED_OUT),
            HighlightTag::Priority(p) => base
                .fg(self.priority_color(p).unwrap_or(self.text_bright))
                .add_modifier(Modifier::BOLD),
            HighlightTag::CompletionDate | HighlightTag::CreationDate => base.fg(self.date),
            HighlightTag::Context => base.fg(self.context),
            HighlightTag::Project => base.fg(self.project),
            HighlightTag::DueDate => base.fg(self.due_date),
            HighlightTag::SearchMatch => Style::default()
                .fg(self.search_match_fg)
                .bg(self.search_match_bg),
        }
    }
}

fn priority_slot(priority: char) -> Option<usize> {
    match priority.to_ascii_uppercase() {
        p @ 'A'..='F' => Some(p as usize - 'A' as usize),
        _ => None,
    }
}
