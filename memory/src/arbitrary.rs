use quickcheck::{Arbitrary, Gen};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::{Deck, DeckSource, Token, MAX_COLOR};

/// A deck together with a sequence of player actions.
#[derive(Clone, Debug)]
pub struct PlayInput {
    pub deck: Deck,
    /// `Some(i)` selects card `i` (possibly out of range), `None` lets the
    /// pending resolution fire.
    pub steps: Vec<Option<usize>>,
}

impl Arbitrary for PlayInput {
    fn arbitrary(g: &mut Gen) -> Self {
        let pairs = usize::arbitrary(g) % 6 + 1;
        let mut rng = StdRng::seed_from_u64(u64::arbitrary(g));
        let deck = if bool::arbitrary(g) {
            DeckSource::random_colors(pairs).unwrap().generate(&mut rng)
        } else {
            let labels = (0..pairs).map(|i| format!("L{}", i)).collect();
            DeckSource::labels(labels).unwrap().generate(&mut rng)
        };

        let num_steps = usize::arbitrary(g) % 80;
        let steps = (0..num_steps)
            .map(|_| {
                // Roughly one resolution per two selections, with the occasional out of range card
                if u8::arbitrary(g) % 3 == 0 {
                    None
                } else {
                    Some(usize::arbitrary(g) % (deck.len() + 1))
                }
            })
            .collect();
        PlayInput { deck, steps }
    }
}

impl Arbitrary for Token {
    fn arbitrary(g: &mut Gen) -> Self {
        if bool::arbitrary(g) {
            Token::Color(u32::arbitrary(g) % (MAX_COLOR + 1))
        } else {
            // Labels must be nonempty and must not look like a color
            let len = usize::arbitrary(g) % 8 + 1;
            let chars = ['a', 'b', 'z', 'Q', '7', '#', ' ', 'é', '🂠'];
            let mut label: String = (0..len).map(|_| *g.choose(&chars).unwrap()).collect();
            if label.starts_with('#') {
                label.insert(0, 'x');
            }
            Token::Label(label)
        }
    }
}
