use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The face of a card. Exactly two cards in a deck share a token, and two
/// cards match iff their tokens are equal.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Token {
    /// A 24-bit RGB color, written as `#rrggbb`.
    Color(u32),
    /// A free-form label.
    Label(String),
}

/// The largest value a [`Token::Color`] can hold.
pub const MAX_COLOR: u32 = 0xFF_FF_FF;

impl Token {
    /// Splits a color token into its red, green and blue channels.
    ///
    /// Returns `None` for labels.
    pub fn rgb(&self) -> Option<(u8, u8, u8)> {
        match *self {
            Token::Color(c) => Some(((c >> 16) as u8, (c >> 8) as u8, c as u8)),
            Token::Label(_) => None,
        }
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Color(c) => write!(f, "#{:06x}", c),
            Token::Label(label) => write!(f, "{}", label),
        }
    }
}

/// The error type for the [`FromStr`] instance of [`Token`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenFromStrErr {
    Empty,
    InvalidColor,
}

impl std::error::Error for TokenFromStrErr {}

impl std::fmt::Display for TokenFromStrErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenFromStrErr::Empty => write!(f, "A token cannot be empty"),
            TokenFromStrErr::InvalidColor => {
                write!(f, "A token starting with '#' must be followed by six hex digits")
            }
        }
    }
}

impl FromStr for Token {
    type Err = TokenFromStrErr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(TokenFromStrErr::Empty);
        }
        match s.strip_prefix('#') {
            Some(hex) => {
                if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
                    return Err(TokenFromStrErr::InvalidColor);
                }
                u32::from_str_radix(hex, 16)
                    .map(Token::Color)
                    .map_err(|_| TokenFromStrErr::InvalidColor)
            }
            None => Ok(Token::Label(String::from(s))),
        }
    }
}

/// Shorthand for creating tokens from a string.
///
/// `#` followed by six hex digits makes a [color](Token::Color), anything
/// else a [label](Token::Label).
///
/// This macro is just calling the [`FromStr`] instance of [`Token`].
/// ```
/// # use memory::{token, Token};
/// assert_eq!(token!("#ff0080"), Token::Color(0xff0080));
/// assert_eq!(token!("A"), Token::Label(String::from("A")));
/// ```
#[macro_export]
macro_rules! token {
    ($s:literal) => {
        <$crate::Token as std::str::FromStr>::from_str($s)
            .expect("Invalid token given to token! macro")
    };
}
// The import is for using the macro in other modules, see https://stackoverflow.com/a/31749071/1726797
#[allow(unused_imports)]
pub(crate) use token;

#[cfg(test)]
mod tests {
    use quickcheck::quickcheck;

    use super::*;

    quickcheck! {
        fn display_then_parse(token: Token) -> bool {
            token.to_string().parse::<Token>() == Ok(token)
        }
    }

    #[test]
    fn parse_colors_and_labels() {
        assert_eq!(token!("#0000ff"), Token::Color(0x0000ff));
        assert_eq!(token!("#ABCDEF"), Token::Color(0xabcdef));
        assert_eq!(token!("apple"), Token::Label(String::from("apple")));
        assert_eq!("".parse::<Token>(), Err(TokenFromStrErr::Empty));
        assert_eq!("#12345".parse::<Token>(), Err(TokenFromStrErr::InvalidColor));
        assert_eq!("#12345g".parse::<Token>(), Err(TokenFromStrErr::InvalidColor));
        assert_eq!("#+12345".parse::<Token>(), Err(TokenFromStrErr::InvalidColor));
    }

    #[test]
    fn color_channels() {
        assert_eq!(token!("#102030").rgb(), Some((0x10, 0x20, 0x30)));
        assert_eq!(token!("x").rgb(), None);
        assert_eq!(Token::Color(7).to_string(), "#000007");
    }
}
