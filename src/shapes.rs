// Copyright (c) 2026 rezky_nightky

pub const SPLASH: char = 'o';

pub const UNICODE_SHAPES: &[char] = &[
    '|', '│', '┃', '╽', '╿', '║', '┆', '┇', '┊', '┋', '╵', '╹', '╻',
];

/// Single-byte shapes for terminals without a UTF-8 locale.
pub const ASCII_SHAPES: &[char] = &['|', '!', ':', '\'', '`'];

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Charset {
    /// ASCII when LANG does not mention UTF, unicode otherwise
    Auto,
    Unicode,
    Ascii,
}

pub fn default_to_ascii() -> bool {
    let lang = std::env::var("LANG").unwrap_or_default();
    !lang.to_ascii_uppercase().contains("UTF")
}

pub fn drop_shapes(charset: Charset, default_to_ascii: bool) -> &'static [char] {
    match charset {
        Charset::Unicode => UNICODE_SHAPES,
        Charset::Ascii => ASCII_SHAPES,
        Charset::Auto if default_to_ascii => ASCII_SHAPES,
        Charset::Auto => UNICODE_SHAPES,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_follows_locale() {
        assert_eq!(drop_shapes(Charset::Auto, true), ASCII_SHAPES);
        assert_eq!(drop_shapes(Charset::Auto, false), UNICODE_SHAPES);
        assert_eq!(drop_shapes(Charset::Unicode, true), UNICODE_SHAPES);
    }

    #[test]
    fn splash_is_not_a_falling_shape() {
        assert!(!UNICODE_SHAPES.contains(&SPLASH));
        assert!(!ASCII_SHAPES.contains(&SPLASH));
        assert!(ASCII_SHAPES.iter().all(|c| c.is_ascii()));
    }
}
