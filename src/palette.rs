// Copyright (c) 2026 rezky_nightky

use crossterm::style::Color;

/// Named drop colors accepted on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DropColor {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    BrightBlack,
    BrightRed,
    BrightGreen,
    BrightYellow,
    BrightBlue,
    BrightMagenta,
    BrightCyan,
    BrightWhite,
    /// The terminal's default foreground.
    Reset,
}

pub const DEFAULT_COLORS: [DropColor; 2] = [DropColor::Blue, DropColor::BrightBlue];

const ALL: [DropColor; 17] = [
    DropColor::Black,
    DropColor::Red,
    DropColor::Green,
    DropColor::Yellow,
    DropColor::Blue,
    DropColor::Magenta,
    DropColor::Cyan,
    DropColor::White,
    DropColor::BrightBlack,
    DropColor::BrightRed,
    DropColor::BrightGreen,
    DropColor::BrightYellow,
    DropColor::BrightBlue,
    DropColor::BrightMagenta,
    DropColor::BrightCyan,
    DropColor::BrightWhite,
    DropColor::Reset,
];

impl DropColor {
    pub fn all() -> &'static [DropColor] {
        &ALL
    }

    pub fn name(self) -> &'static str {
        match self {
            DropColor::Black => "black",
            DropColor::Red => "red",
            DropColor::Green => "green",
            DropColor::Yellow => "yellow",
            DropColor::Blue => "blue",
            DropColor::Magenta => "magenta",
            DropColor::Cyan => "cyan",
            DropColor::White => "white",
            DropColor::BrightBlack => "b_black",
            DropColor::BrightRed => "b_red",
            DropColor::BrightGreen => "b_green",
            DropColor::BrightYellow => "b_yellow",
            DropColor::BrightBlue => "b_blue",
            DropColor::BrightMagenta => "b_magenta",
            DropColor::BrightCyan => "b_cyan",
            DropColor::BrightWhite => "b_white",
            DropColor::Reset => "reset",
        }
    }

    fn base(self) -> Option<Color> {
        match self {
            DropColor::Black | DropColor::BrightBlack => Some(Color::Black),
            DropColor::Red | DropColor::BrightRed => Some(Color::DarkRed),
            DropColor::Green | DropColor::BrightGreen => Some(Color::DarkGreen),
            DropColor::Yellow | DropColor::BrightYellow => Some(Color::DarkYellow),
            DropColor::Blue | DropColor::BrightBlue => Some(Color::DarkBlue),
            DropColor::Magenta | DropColor::BrightMagenta => Some(Color::DarkMagenta),
            DropColor::Cyan | DropColor::BrightCyan => Some(Color::DarkCyan),
            DropColor::White | DropColor::BrightWhite => Some(Color::Grey),
            DropColor::Reset => None,
        }
    }

    pub fn is_bright(self) -> bool {
        matches!(
            self,
            DropColor::BrightBlack
                | DropColor::BrightRed
                | DropColor::BrightGreen
                | DropColor::BrightYellow
                | DropColor::BrightBlue
                | DropColor::BrightMagenta
                | DropColor::BrightCyan
                | DropColor::BrightWhite
        )
    }

    /// Foreground and bold attribute. Bright variants are the base SGR color
    /// with bold set, which is how most terminals brighten the 8 base colors.
    pub fn style(self) -> (Option<Color>, bool) {
        (self.base(), self.is_bright())
    }
}

/// Matches names exactly as listed by `--list-colors`. `bright-<name>` is
/// accepted for `b_<name>` and `Reset` for `reset`.
pub fn parse_drop_color(s: &str) -> Result<DropColor, String> {
    if s == "Reset" {
        return Ok(DropColor::Reset);
    }
    let name = match s.strip_prefix("bright-") {
        Some(base) => format!("b_{}", base),
        None => s.to_string(),
    };
    DropColor::all()
        .iter()
        .copied()
        .find(|c| c.name() == name)
        .ok_or_else(|| format!("invalid color: {} (see --list-colors)", s))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_name_parses_back_to_itself() {
        for &c in DropColor::all() {
            assert_eq!(parse_drop_color(c.name()), Ok(c));
        }
    }

    #[test]
    fn listed_aliases_are_accepted() {
        assert_eq!(parse_drop_color("bright-blue"), Ok(DropColor::BrightBlue));
        assert_eq!(parse_drop_color("b_cyan"), Ok(DropColor::BrightCyan));
        assert_eq!(parse_drop_color("Reset"), Ok(DropColor::Reset));
    }

    #[test]
    fn names_match_exactly() {
        for s in ["BLUE", "B_Cyan", " reset ", "bright_red", "Bright-red", "bright-b_red"] {
            assert!(parse_drop_color(s).is_err(), "{s} should be rejected");
        }
    }

    #[test]
    fn unknown_names_are_rejected() {
        assert!(parse_drop_color("purple").is_err());
        assert!(parse_drop_color("b_reset").is_err());
        assert!(parse_drop_color("bright-reset").is_err());
        assert!(parse_drop_color("").is_err());
    }

    #[test]
    fn bright_variants_share_base_and_set_bold() {
        assert_eq!(DropColor::Blue.style(), (Some(Color::DarkBlue), false));
        assert_eq!(DropColor::BrightBlue.style(), (Some(Color::DarkBlue), true));
        assert_eq!(DropColor::Reset.style(), (None, false));
    }
}
