//! Color representations for cell styling.

/// One of the 16 standard ANSI named colors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum NamedColor {
    /// ANSI black.
    Black,
    /// ANSI red.
    Red,
    /// ANSI green.
    Green,
    /// ANSI yellow.
    Yellow,
    /// ANSI blue.
    Blue,
    /// ANSI magenta.
    Magenta,
    /// ANSI cyan.
    Cyan,
    /// ANSI white.
    White,
    /// Bright black (often rendered as gray).
    BrightBlack,
    /// Bright red.
    BrightRed,
    /// Bright green.
    BrightGreen,
    /// Bright yellow.
    BrightYellow,
    /// Bright blue.
    BrightBlue,
    /// Bright magenta.
    BrightMagenta,
    /// Bright cyan.
    BrightCyan,
    /// Bright white.
    BrightWhite,
}

/// A color applied to a cell's foreground or background.
///
/// Colors are stored at full fidelity (24-bit RGB where possible) and
/// downgraded to the terminal's actual [`crate::terminal::ColorSupport`]
/// level only at render time, so a single styled tree can target any
/// terminal without widgets needing to know about palette limits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    /// 24-bit true color.
    Rgb {
        /// Red channel.
        r: u8,
        /// Green channel.
        g: u8,
        /// Blue channel.
        b: u8,
    },
    /// A 256-color palette index.
    Indexed(u8),
    /// One of the 16 standard named colors.
    Named(NamedColor),
    /// Explicit reset to the terminal's default color.
    Reset,
}

impl Color {
    /// Construct an RGB color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::Rgb { r, g, b }
    }

    /// Parse a color from a dynamic text representation, per spec.md §9's
    /// "Dynamic colour inputs" design note: application code may describe
    /// colors as hex strings, named colors, or `rgb(...)` calls, resolved
    /// here into the crate's normalized internal representation. Returns
    /// `None` for anything unrecognized rather than guessing.
    ///
    /// Recognised forms:
    /// - `#rgb` / `#rrggbb` (leading `#` required)
    /// - one of the sixteen ANSI names, case-insensitive, with an optional
    ///   `bright-` prefix (`red`, `bright-red`, `brightred`)
    /// - `rgb(r, g, b)` with decimal 0-255 components
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if let Some(hex) = input.strip_prefix('#') {
            return parse_hex(hex);
        }
        if let Some(inner) = input
            .strip_prefix("rgb(")
            .or_else(|| input.strip_prefix("rgb ("))
            .and_then(|rest| rest.strip_suffix(')'))
        {
            return parse_rgb_fn(inner);
        }
        parse_named(input)
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    let expand = |c: u8| c * 0x11;
    match hex.len() {
        3 => {
            let r = u8::from_str_radix(&hex[0..1], 16).ok()?;
            let g = u8::from_str_radix(&hex[1..2], 16).ok()?;
            let b = u8::from_str_radix(&hex[2..3], 16).ok()?;
            Some(Color::Rgb {
                r: expand(r),
                g: expand(g),
                b: expand(b),
            })
        }
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(Color::Rgb { r, g, b })
        }
        _ => None,
    }
}

fn parse_rgb_fn(inner: &str) -> Option<Color> {
    let mut parts = inner.split(',').map(|p| p.trim().parse::<u8>());
    let r = parts.next()?.ok()?;
    let g = parts.next()?.ok()?;
    let b = parts.next()?.ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(Color::Rgb { r, g, b })
}

fn parse_named(input: &str) -> Option<Color> {
    let normalized = input.to_ascii_lowercase().replace(['-', '_'], "");
    let named = match normalized.as_str() {
        "black" => NamedColor::Black,
        "red" => NamedColor::Red,
        "green" => NamedColor::Green,
        "yellow" => NamedColor::Yellow,
        "blue" => NamedColor::Blue,
        "magenta" => NamedColor::Magenta,
        "cyan" => NamedColor::Cyan,
        "white" => NamedColor::White,
        "brightblack" | "gray" | "grey" => NamedColor::BrightBlack,
        "brightred" => NamedColor::BrightRed,
        "brightgreen" => NamedColor::BrightGreen,
        "brightyellow" => NamedColor::BrightYellow,
        "brightblue" => NamedColor::BrightBlue,
        "brightmagenta" => NamedColor::BrightMagenta,
        "brightcyan" => NamedColor::BrightCyan,
        "brightwhite" => NamedColor::BrightWhite,
        "reset" | "default" => return Some(Color::Reset),
        _ => return None,
    };
    Some(Color::Named(named))
}
