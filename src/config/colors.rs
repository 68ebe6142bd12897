use std::collections::HashMap;

use derive_deref::{Deref, DerefMut};
use ratatui::style::{Color, Modifier, Style};
use serde::{Deserialize, Deserializer};

use crate::app::Mode;

/// Named styles per input mode, written as `"bold blue on gray3"`.
#[derive(Clone, Debug, Default, Deref, DerefMut)]
pub struct Styles(pub HashMap<Mode, HashMap<String, Style>>);

impl<'de> Deserialize<'de> for Styles {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let parsed = HashMap::<Mode, HashMap<String, String>>::deserialize(deserializer)?;

        let styles = parsed
            .into_iter()
            .map(|(mode, inner)| {
                let inner = inner
                    .into_iter()
                    .map(|(name, style)| (name, parse_style(&style)))
                    .collect();
                (mode, inner)
            })
            .collect();

        Ok(Styles(styles))
    }
}

pub fn parse_style(line: &str) -> Style {
    // ASCII lowering keeps byte offsets valid for `line`
    let split = line.to_ascii_lowercase().find("on ").unwrap_or(line.len());
    let (foreground, background) = line.split_at(split);
    let foreground = process_color_string(foreground);
    let background = process_color_string(background.get(3..).unwrap_or_default());

    let mut style = Style::default();
    if let Some(fg) = parse_color(&foreground.0) {
        style = style.fg(fg);
    }
    if let Some(bg) = parse_color(&background.0) {
        style = style.bg(bg);
    }
    style.add_modifier(foreground.1 | background.1)
}

fn process_color_string(color_str: &str) -> (String, Modifier) {
    let mut modifiers = Modifier::empty();
    let mut words = Vec::new();
    for word in color_str.to_lowercase().split_whitespace() {
        match word {
            "bold" => modifiers |= Modifier::BOLD,
            "dim" => modifiers |= Modifier::DIM,
            "italic" => modifiers |= Modifier::ITALIC,
            "underline" | "underlined" => modifiers |= Modifier::UNDERLINED,
            "inverse" | "reversed" => modifiers |= Modifier::REVERSED,
            other => words.push(other.to_string()),
        }
    }
    (words.join(""), modifiers)
}

fn parse_color(s: &str) -> Option<Color> {
    let s = s.trim();
    if let Some(index) = s.strip_prefix("color") {
        return index.parse::<u8>().ok().map(Color::Indexed);
    }
    if let Some(level) = s.strip_prefix("gray").filter(|l| !l.is_empty()) {
        let level = level.parse::<u8>().ok().filter(|l| *l < 24)?;
        return Some(Color::Indexed(232 + level));
    }
    if let Some(rgb) = s.strip_prefix("rgb") {
        let digits: Vec<u8> = rgb
            .chars()
            .map(|c| c.to_digit(10).map(|d| d as u8))
            .collect::<Option<_>>()?;
        if let [r, g, b] = digits[..]
            && r < 6
            && g < 6
            && b < 6
        {
            return Some(Color::Indexed(16 + 36 * r + 6 * g + b));
        }
        return None;
    }
    let color = match s {
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "gray" | "grey" => Color::Gray,
        "darkgray" | "darkgrey" => Color::DarkGray,
        "lightred" => Color::LightRed,
        "lightgreen" => Color::LightGreen,
        "lightyellow" => Color::LightYellow,
        "lightblue" => Color::LightBlue,
        "lightmagenta" => Color::LightMagenta,
        "lightcyan" => Color::LightCyan,
        "white" => Color::White,
        _ => return None,
    };
    Some(color)
}
