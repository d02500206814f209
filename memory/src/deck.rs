use std::collections::{BTreeMap, BTreeSet};

use rand::seq::index;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{DeckError, Token, MAX_COLOR};

/// Shuffles `items` in place with the Fisher-Yates algorithm.
///
/// Every permutation is equally likely, given a uniform `rng`.
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        // j is drawn from [0, i], inclusive
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
}

/// The tokens of one game, in board order.
///
/// Never empty, and every token appears exactly twice. Serialized as the
/// plain list of tokens, which is validated when deserializing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Token>", into = "Vec<Token>")]
pub struct Deck {
    tokens: Vec<Token>,
}

impl Deck {
    /// Builds a deck from tokens in the given order, without shuffling.
    pub fn from_tokens_unshuffled(tokens: Vec<Token>) -> Result<Self, DeckError> {
        if tokens.is_empty() {
            return Err(DeckError::NoPairs);
        }
        let mut counts = BTreeMap::<&Token, usize>::new();
        for token in &tokens {
            *counts.entry(token).or_insert(0) += 1;
        }
        if let Some((token, &count)) = counts.iter().find(|&(_, &count)| count != 2) {
            return Err(DeckError::UnpairedToken {
                token: (*token).clone(),
                count,
            });
        }
        Ok(Self { tokens })
    }

    /// A shuffled deck of `pairs` distinct random colors.
    pub fn random_colors<R: Rng + ?Sized>(pairs: usize, rng: &mut R) -> Result<Self, DeckError> {
        Ok(DeckSource::random_colors(pairs)?.generate(rng))
    }

    /// A shuffled deck with one pair per label.
    pub fn from_labels<R: Rng + ?Sized>(labels: &[String], rng: &mut R) -> Result<Self, DeckError> {
        Ok(DeckSource::labels(labels.to_vec())?.generate(rng))
    }

    /// Returns the same tokens in a new random order.
    pub fn shuffled<R: Rng + ?Sized>(mut self, rng: &mut R) -> Self {
        shuffle(&mut self.tokens, rng);
        self
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Always false, kept for symmetry with [`len()`](Self::len).
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn pair_count(&self) -> usize {
        self.tokens.len() / 2
    }
}

impl TryFrom<Vec<Token>> for Deck {
    type Error = DeckError;

    fn try_from(tokens: Vec<Token>) -> Result<Self, Self::Error> {
        Deck::from_tokens_unshuffled(tokens)
    }
}

impl From<Deck> for Vec<Token> {
    fn from(deck: Deck) -> Self {
        deck.tokens
    }
}

/// `pairs` distinct colors, in random order.
fn distinct_colors<R: Rng + ?Sized>(pairs: usize, rng: &mut R) -> Vec<u32> {
    index::sample(rng, MAX_COLOR as usize, pairs)
        .into_iter()
        .map(|c| c as u32)
        .collect()
}

fn check_pair_count(pairs: usize) -> Result<(), DeckError> {
    if pairs == 0 {
        Err(DeckError::NoPairs)
    } else if pairs > MAX_COLOR as usize {
        Err(DeckError::TooManyPairs { requested: pairs })
    } else {
        Ok(())
    }
}

fn check_labels(labels: &[String]) -> Result<(), DeckError> {
    if labels.is_empty() {
        return Err(DeckError::NoPairs);
    }
    let mut seen = BTreeSet::new();
    for label in labels {
        if !seen.insert(label) {
            return Err(DeckError::DuplicateLabel(label.clone()));
        }
    }
    Ok(())
}

/// Produces a fresh deck for every game.
///
/// All validation happens when the source is built, so generating a deck
/// cannot fail.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeckSource {
    /// New random colors for every game.
    RandomColors { pairs: usize },
    /// The same labels, reshuffled for every game.
    Labels(Vec<String>),
    /// The same deck in the same order for every game.
    Fixed(Deck),
}

impl DeckSource {
    pub fn random_colors(pairs: usize) -> Result<Self, DeckError> {
        check_pair_count(pairs)?;
        Ok(DeckSource::RandomColors { pairs })
    }

    pub fn labels(labels: Vec<String>) -> Result<Self, DeckError> {
        check_labels(&labels)?;
        Ok(DeckSource::Labels(labels))
    }

    pub fn fixed(deck: Deck) -> Self {
        DeckSource::Fixed(deck)
    }

    pub fn pair_count(&self) -> usize {
        match self {
            DeckSource::RandomColors { pairs } => *pairs,
            DeckSource::Labels(labels) => labels.len(),
            DeckSource::Fixed(deck) => deck.pair_count(),
        }
    }

    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Deck {
        let mut tokens = match self {
            DeckSource::Fixed(deck) => return deck.clone(),
            DeckSource::RandomColors { pairs } => distinct_colors(*pairs, rng)
                .into_iter()
                .flat_map(|c| [Token::Color(c), Token::Color(c)])
                .collect::<Vec<_>>(),
            DeckSource::Labels(labels) => labels
                .iter()
                .flat_map(|l| [Token::Label(l.clone()), Token::Label(l.clone())])
                .collect(),
        };
        shuffle(&mut tokens, rng);
        Deck { tokens }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use quickcheck::quickcheck;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::token;

    fn counts(tokens: &[Token]) -> BTreeMap<Token, usize> {
        let mut counts = BTreeMap::new();
        for token in tokens {
            *counts.entry(token.clone()).or_insert(0) += 1;
        }
        counts
    }

    quickcheck! {
        fn shuffle_is_a_permutation(items: Vec<u16>, seed: u64) -> bool {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut shuffled = items.clone();
            shuffle(&mut shuffled, &mut rng);
            let mut sorted_before = items;
            sorted_before.sort();
            shuffled.sort();
            sorted_before == shuffled
        }
    }

    quickcheck! {
        fn every_color_appears_twice(pairs: u8, seed: u64) -> bool {
            let pairs = pairs as usize % 40 + 1;
            let mut rng = StdRng::seed_from_u64(seed);
            let deck = Deck::random_colors(pairs, &mut rng).unwrap();
            let counts = counts(deck.tokens());
            deck.len() == 2 * pairs
                && deck.pair_count() == pairs
                && counts.len() == pairs
                && counts.values().all(|&c| c == 2)
        }
    }

    quickcheck! {
        fn generated_decks_are_valid(pairs: u8, seed: u64) -> bool {
            let pairs = pairs as usize % 40 + 1;
            let mut rng = StdRng::seed_from_u64(seed);
            let deck = DeckSource::random_colors(pairs).unwrap().generate(&mut rng);
            Deck::from_tokens_unshuffled(deck.tokens().to_vec()).is_ok()
                && deck.pair_count() == pairs
        }
    }

    #[test]
    fn shuffle_reaches_every_position() {
        // With the off-by-one variant (j in [0, i)) the last element can never stay in place.
        let mut rng = StdRng::seed_from_u64(7);
        let mut stayed = false;
        for _ in 0..200 {
            let mut items = [0, 1, 2];
            shuffle(&mut items, &mut rng);
            stayed |= items[2] == 2;
        }
        assert!(stayed);
    }

    #[test]
    fn shuffle_trivial_inputs() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut empty: [u8; 0] = [];
        shuffle(&mut empty, &mut rng);
        let mut one = [9];
        shuffle(&mut one, &mut rng);
        assert_eq!(one, [9]);
    }

    #[test]
    fn unshuffled_deck_keeps_order() {
        let tokens = vec![token!("A"), token!("B"), token!("A"), token!("B")];
        let deck = Deck::from_tokens_unshuffled(tokens.clone()).unwrap();
        assert_eq!(deck.tokens(), &tokens[..]);
        assert_eq!(deck.pair_count(), 2);
    }

    #[test]
    fn reject_invalid_decks() {
        assert_eq!(Deck::from_tokens_unshuffled(vec![]), Err(DeckError::NoPairs));
        assert_eq!(
            Deck::from_tokens_unshuffled(vec![token!("A"), token!("A"), token!("A"), token!("B")]),
            Err(DeckError::UnpairedToken {
                token: token!("A"),
                count: 3
            })
        );
        assert_eq!(DeckSource::random_colors(0), Err(DeckError::NoPairs));
        assert_eq!(
            DeckSource::labels(vec![String::from("x"), String::from("x")]),
            Err(DeckError::DuplicateLabel(String::from("x")))
        );
    }

    #[test]
    fn deserialized_decks_are_validated() {
        let json = r#"[{"label":"A"},{"label":"B"},{"label":"A"},{"label":"B"}]"#;
        let deck: Deck = serde_json::from_str(json).unwrap();
        assert_eq!(deck.pair_count(), 2);
        assert_eq!(
            serde_json::from_str::<Deck>(&serde_json::to_string(&deck).unwrap()).unwrap(),
            deck
        );

        assert!(serde_json::from_str::<Deck>(r#"[{"label":"A"},{"label":"B"}]"#).is_err());
        assert!(serde_json::from_str::<Deck>("[]").is_err());
    }

    #[test]
    fn many_distinct_colors() {
        let mut rng = StdRng::seed_from_u64(5);
        let pairs = 1 << 20;
        let mut colors = distinct_colors(pairs, &mut rng);
        assert!(colors.iter().all(|&c| c < MAX_COLOR));
        colors.sort_unstable();
        colors.dedup();
        assert_eq!(colors.len(), pairs);
    }

    #[test]
    fn reshuffled_deck_keeps_its_tokens() {
        let mut rng = StdRng::seed_from_u64(21);
        let deck = Deck::random_colors(6, &mut rng).unwrap();
        let reshuffled = deck.clone().shuffled(&mut rng);
        assert_eq!(counts(deck.tokens()), counts(reshuffled.tokens()));
    }

    #[test]
    fn label_decks() {
        let labels = vec![String::from("cat"), String::from("dog"), String::from("owl")];
        let mut rng = StdRng::seed_from_u64(3);
        let deck = Deck::from_labels(&labels, &mut rng).unwrap();
        let counts = counts(deck.tokens());
        assert_eq!(counts.len(), 3);
        assert_eq!(counts.get(&token!("dog")), Some(&2));
    }

    #[test]
    fn regenerating_gives_fresh_decks() {
        let source = DeckSource::random_colors(8).unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        let first = source.generate(&mut rng);
        let second = source.generate(&mut rng);
        assert_ne!(first, second);

        let fixed = DeckSource::fixed(first.clone());
        assert_eq!(fixed.generate(&mut rng), first);
        assert_eq!(fixed.pair_count(), 8);
    }
}
