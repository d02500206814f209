use crate::Token;

/// The error type for building a [`Deck`](crate::Deck) or a
/// [`DeckSource`](crate::DeckSource).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeckError {
    NoPairs,
    TooManyPairs { requested: usize },
    DuplicateLabel(String),
    /// A token did not appear exactly twice.
    UnpairedToken { token: Token, count: usize },
}

impl std::error::Error for DeckError {}

impl std::fmt::Display for DeckError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeckError::NoPairs => write!(f, "A deck needs at least one pair of cards"),
            DeckError::TooManyPairs { requested } => write!(
                f,
                "Requested {} pairs, but there are only {} distinct colors",
                requested,
                crate::MAX_COLOR
            ),
            DeckError::DuplicateLabel(label) => {
                write!(f, "The label '{}' was given more than once", label)
            }
            DeckError::UnpairedToken { token, count } => write!(
                f,
                "The token {} appears {} times, but every token must appear exactly twice",
                token, count
            ),
        }
    }
}

/// The error type for turning a [`GameConfig`](crate::GameConfig) into a game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    InvalidDeck(DeckError),
    PairsDisagreeWithLabels { pairs: usize, labels: usize },
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidDeck(err) => Some(err),
            _ => None,
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidDeck(_) => write!(f, "The configured deck is invalid"),
            ConfigError::PairsDisagreeWithLabels { pairs, labels } => write!(
                f,
                "The config asks for {} pairs but lists {} labels",
                pairs, labels
            ),
        }
    }
}

impl From<DeckError> for ConfigError {
    fn from(err: DeckError) -> Self {
        ConfigError::InvalidDeck(err)
    }
}
