//! Ampersand colour-markup decoding.
//!
//! Configuration strings use legacy `&` codes: `&0`-`&f` select a colour,
//! `&k`-`&o` toggle obfuscated/bold/strikethrough/underline/italic and `&r`
//! resets. Selecting a colour clears any active format flags, matching how
//! game clients interpret legacy text. Unknown codes are kept verbatim.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The sixteen legacy chat colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatColor {
    Black,
    DarkBlue,
    DarkGreen,
    DarkAqua,
    DarkRed,
    DarkPurple,
    Gold,
    Gray,
    DarkGray,
    Blue,
    Green,
    Aqua,
    Red,
    LightPurple,
    Yellow,
    White,
}

impl ChatColor {
    pub fn from_code(code: char) -> Option<Self> {
        let color = match code.to_ascii_lowercase() {
            '0' => ChatColor::Black,
            '1' => ChatColor::DarkBlue,
            '2' => ChatColor::DarkGreen,
            '3' => ChatColor::DarkAqua,
            '4' => ChatColor::DarkRed,
            '5' => ChatColor::DarkPurple,
            '6' => ChatColor::Gold,
            '7' => ChatColor::Gray,
            '8' => ChatColor::DarkGray,
            '9' => ChatColor::Blue,
            'a' => ChatColor::Green,
            'b' => ChatColor::Aqua,
            'c' => ChatColor::Red,
            'd' => ChatColor::LightPurple,
            'e' => ChatColor::Yellow,
            'f' => ChatColor::White,
            _ => return None,
        };
        Some(color)
    }

    pub fn code(self) -> char {
        match self {
            ChatColor::Black => '0',
            ChatColor::DarkBlue => '1',
            ChatColor::DarkGreen => '2',
            ChatColor::DarkAqua => '3',
            ChatColor::DarkRed => '4',
            ChatColor::DarkPurple => '5',
            ChatColor::Gold => '6',
            ChatColor::Gray => '7',
            ChatColor::DarkGray => '8',
            ChatColor::Blue => '9',
            ChatColor::Green => 'a',
            ChatColor::Aqua => 'b',
            ChatColor::Red => 'c',
            ChatColor::LightPurple => 'd',
            ChatColor::Yellow => 'e',
            ChatColor::White => 'f',
        }
    }
}

/// Text decoration flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextStyle {
    pub color: Option<ChatColor>,
    #[serde(default)]
    pub obfuscated: bool,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub strikethrough: bool,
    #[serde(default)]
    pub underlined: bool,
    #[serde(default)]
    pub italic: bool,
}

impl TextStyle {
    pub fn colored(color: ChatColor) -> Self {
        Self {
            color: Some(color),
            ..Default::default()
        }
    }

    fn apply_format(&mut self, code: char) -> bool {
        match code.to_ascii_lowercase() {
            'k' => self.obfuscated = true,
            'l' => self.bold = true,
            'm' => self.strikethrough = true,
            'n' => self.underlined = true,
            'o' => self.italic = true,
            _ => return false,
        }
        true
    }
}

/// A run of text sharing one style.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextSpan {
    pub text: String,
    pub style: TextStyle,
}

/// Styled text made of consecutive spans.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FormattedText {
    pub spans: Vec<TextSpan>,
}

impl FormattedText {
    /// Unstyled text.
    pub fn plain_text(text: impl Into<String>) -> Self {
        Self::styled(text, TextStyle::default())
    }

    /// Text in a single colour.
    pub fn colored(text: impl Into<String>, color: ChatColor) -> Self {
        Self::styled(text, TextStyle::colored(color))
    }

    fn styled(text: impl Into<String>, style: TextStyle) -> Self {
        let text = text.into();
        if text.is_empty() {
            return Self::default();
        }
        Self {
            spans: vec![TextSpan { text, style }],
        }
    }

    /// Append another piece, merging with the last span when styles match.
    pub fn append(mut self, other: FormattedText) -> Self {
        for span in other.spans {
            self.push(span.text, span.style);
        }
        self
    }

    fn push(&mut self, text: String, style: TextStyle) {
        if text.is_empty() {
            return;
        }
        match self.spans.last_mut() {
            Some(last) if last.style == style => last.text.push_str(&text),
            _ => self.spans.push(TextSpan { text, style }),
        }
    }

    /// Text with all styling removed.
    pub fn plain(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Render with `§` section-sign codes for hosts that take legacy strings.
    pub fn to_legacy(&self) -> String {
        let mut out = String::new();
        for span in &self.spans {
            let style = &span.style;
            match style.color {
                Some(color) => {
                    out.push('§');
                    out.push(color.code());
                }
                None if !out.is_empty() => out.push_str("§r"),
                None => {}
            }
            for (on, code) in [
                (style.obfuscated, 'k'),
                (style.bold, 'l'),
                (style.strikethrough, 'm'),
                (style.underlined, 'n'),
                (style.italic, 'o'),
            ] {
                if on {
                    out.push('§');
                    out.push(code);
                }
            }
            out.push_str(&span.text);
        }
        out
    }
}

impl fmt::Display for FormattedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.plain())
    }
}

/// Decode `&`-prefixed markup into styled text.
pub fn decode(input: &str) -> FormattedText {
    let mut out = FormattedText::default();
    let mut style = TextStyle::default();
    let mut buf = String::new();
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '&' {
            buf.push(ch);
            continue;
        }
        let Some(&code) = chars.peek() else {
            buf.push(ch);
            break;
        };

        let mut next = style;
        let recognised = if let Some(color) = ChatColor::from_code(code) {
            next = TextStyle::colored(color);
            true
        } else if code.eq_ignore_ascii_case(&'r') {
            next = TextStyle::default();
            true
        } else {
            next.apply_format(code)
        };

        if recognised {
            chars.next();
            out.push(std::mem::take(&mut buf), style);
            style = next;
        } else {
            buf.push(ch);
        }
    }
    out.push(buf, style);
    out
}

/// Substitute `{player}` in a template and decode it.
pub fn render_template(template: &str, player_name: &str) -> FormattedText {
    decode(&template.replace("{player}", player_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_colors_into_spans() {
        let text = decode("&aWelcome, &bSteve&a!");
        assert_eq!(text.plain(), "Welcome, Steve!");
        assert_eq!(text.spans.len(), 3);
        assert_eq!(text.spans[0].style.color, Some(ChatColor::Green));
        assert_eq!(text.spans[1].text, "Steve");
        assert_eq!(text.spans[1].style.color, Some(ChatColor::Aqua));
    }

    #[test]
    fn color_code_clears_formats_but_format_keeps_color() {
        let text = decode("&6&lGold bold&e yellow");
        assert_eq!(text.spans[0].style.color, Some(ChatColor::Gold));
        assert!(text.spans[0].style.bold);
        assert_eq!(text.spans[1].style.color, Some(ChatColor::Yellow));
        assert!(!text.spans[1].style.bold);
    }

    #[test]
    fn reset_and_unknown_codes() {
        let text = decode("&cRed&r plain &zodd &");
        assert_eq!(text.plain(), "Red plain &zodd &");
        assert_eq!(text.spans[1].style, TextStyle::default());
    }

    #[test]
    fn uppercase_codes_are_accepted() {
        let text = decode("&AGreen");
        assert_eq!(text.spans[0].style.color, Some(ChatColor::Green));
    }

    #[test]
    fn legacy_rendering() {
        let text = decode("&7Starter &lgear");
        assert_eq!(text.to_legacy(), "§7Starter §7§lgear");
    }

    #[test]
    fn template_substitutes_player() {
        let text = render_template("&e{player} &7joined", "Alex");
        assert_eq!(text.plain(), "Alex joined");
    }
}
