use crate::{Pointer, Token};
use quickcheck::{Arbitrary, Gen};

impl Arbitrary for Token<'static> {
    fn arbitrary(g: &mut Gen) -> Self {
        Self::new(String::arbitrary(g))
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        Box::new(self.decoded().to_owned().shrink().map(Self::new))
    }
}

impl Arbitrary for Pointer {
    fn arbitrary(g: &mut Gen) -> Self {
        let size = usize::arbitrary(g) % g.size().max(1);
        Self::from_tokens((0..size).map(|_| Token::arbitrary(g)).collect::<Vec<_>>())
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        let tokens: Vec<Token<'static>> = self.tokens().cloned().collect();
        Box::new((0..tokens.len()).map(move |skip| {
            Self::from_tokens(
                tokens
                    .iter()
                    .enumerate()
                    .filter_map(|(i, t)| (i != skip).then(|| t.clone()))
                    .collect::<Vec<_>>(),
            )
        }))
    }
}
