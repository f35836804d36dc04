use crate::{index::Index, ParseIndexError};
use std::{borrow::Cow, fmt};

const ENCODED_TILDE: &str = "~0";
const ENCODED_SLASH: &str = "~1";

const ENC_PREFIX: char = '~';
const TILDE_ENC: char = '0';
const SLASH_ENC: char = '1';

/*
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
╔══════════════════════════════════════════════════════════════════════════════╗
║                                                                              ║
║                                    Token                                     ║
║                                   ¯¯¯¯¯¯¯                                    ║
╚══════════════════════════════════════════════════════════════════════════════╝
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
*/

/// A `Token` is a segment of a JSON [`Pointer`](crate::Pointer), preceded by
/// `'/'` (`%x2F`).
///
/// `Token`s represent either a key of a record or mapping, or an index into a
/// sequence. They are stored decoded, so `"a~1b"` in a pointer expression is
/// held as the token `"a/b"`, and are only encoded again when the pointer is
/// rendered as text.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Token<'a> {
    inner: Cow<'a, str>,
}

impl<'a> Token<'a> {
    /// Constructs a `Token` from a decoded string.
    ///
    /// # Examples
    ///
    /// ```
    /// # use jspointer::Token;
    /// assert_eq!(Token::new("/foo/~bar").encoded(), "~1foo~1~0bar");
    /// ```
    pub fn new(s: impl Into<Cow<'a, str>>) -> Self {
        Self { inner: s.into() }
    }

    /// Constructs a `Token` from an RFC 6901 encoded string, replacing `~1`
    /// with `/` and `~0` with `~` in a single pass.
    ///
    /// A `~` followed by anything other than `0` or `1` is kept as is.
    ///
    /// This function does not allocate if `s` contains no `~`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use jspointer::Token;
    /// assert_eq!(Token::from_encoded("~1foo~1~0bar").decoded(), "/foo/~bar");
    /// assert_eq!(Token::from_encoded("~01").decoded(), "~1");
    /// ```
    pub fn from_encoded(s: &'a str) -> Self {
        let Some(i) = s.find(ENC_PREFIX) else {
            return Self { inner: s.into() };
        };
        let mut decoded = String::with_capacity(s.len());
        decoded.push_str(&s[..i]);
        let mut chars = s[i..].chars().peekable();
        while let Some(c) = chars.next() {
            if c != ENC_PREFIX {
                decoded.push(c);
                continue;
            }
            match chars.peek() {
                Some(&TILDE_ENC) => {
                    decoded.push('~');
                    chars.next();
                }
                Some(&SLASH_ENC) => {
                    decoded.push('/');
                    chars.next();
                }
                _ => decoded.push(c),
            }
        }
        Self {
            inner: Cow::Owned(decoded),
        }
    }

    /// Converts into an owned copy of this token.
    ///
    /// If the token is not already owned, this will clone the referenced string
    /// slice.
    pub fn into_owned(self) -> Token<'static> {
        Token {
            inner: Cow::Owned(self.inner.into_owned()),
        }
    }

    /// Extracts an owned copy of this token.
    pub fn to_owned(&self) -> Token<'static> {
        Token {
            inner: Cow::Owned(self.inner.clone().into_owned()),
        }
    }

    /// Returns the decoded string representation of the `Token`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use jspointer::Token;
    /// assert_eq!(Token::new("~bar").decoded(), "~bar");
    /// ```
    pub fn decoded(&self) -> &str {
        &self.inner
    }

    /// Returns the encoded string representation of the `Token`: `~` becomes
    /// `~0`, then `/` becomes `~1`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use jspointer::Token;
    /// assert_eq!(Token::new("~bar").encoded(), "~0bar");
    /// assert_eq!(Token::new("bar").encoded(), "bar");
    /// ```
    pub fn encoded(&self) -> Cow<'_, str> {
        if self.inner.bytes().any(|b| b == b'/' || b == b'~') {
            Cow::Owned(
                self.inner
                    .replace('~', ENCODED_TILDE)
                    .replace('/', ENCODED_SLASH),
            )
        } else {
            // if there is nothing to encode, we don't need to allocate!
            Cow::Borrowed(&self.inner)
        }
    }

    /// Attempts to parse the given `Token` as a sequence index.
    ///
    /// Only non-empty strings of ASCII digits are accepted.
    ///
    /// ## Examples
    ///
    /// ```
    /// # use jspointer::{Index, Token};
    /// assert_eq!(Token::new("0").to_index(), Ok(Index(0)));
    /// assert_eq!(Token::new("2").to_index(), Ok(Index(2)));
    /// assert!(Token::new("a").to_index().is_err());
    /// assert!(Token::new("+1").to_index().is_err());
    /// ```
    /// ## Errors
    /// Returns [`ParseIndexError`] if the token is not a valid index.
    pub fn to_index(&self) -> Result<Index, ParseIndexError> {
        Index::try_from(self.decoded())
    }
}

macro_rules! impl_from_num {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Token<'static> {
                fn from(v: $ty) -> Self {
                    Token::new(v.to_string())
                }
            }
        )*
    };
}
impl_from_num!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);

impl<'a> From<&'a str> for Token<'a> {
    fn from(value: &'a str) -> Self {
        Token::new(value)
    }
}

impl<'a> From<&'a String> for Token<'a> {
    fn from(value: &'a String) -> Self {
        Token::new(value.as_str())
    }
}

impl From<String> for Token<'static> {
    fn from(value: String) -> Self {
        Token::new(value)
    }
}

impl<'a> From<&Token<'a>> for Token<'a> {
    fn from(value: &Token<'a>) -> Self {
        value.clone()
    }
}

impl AsRef<str> for Token<'_> {
    fn as_ref(&self) -> &str {
        self.decoded()
    }
}

impl PartialEq<str> for Token<'_> {
    fn eq(&self, other: &str) -> bool {
        self.decoded() == other
    }
}

impl PartialEq<&str> for Token<'_> {
    fn eq(&self, other: &&str) -> bool {
        self.decoded() == *other
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.decoded())
    }
}

/*
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
╔══════════════════════════════════════════════════════════════════════════════╗
║                                                                              ║
║                                    Tests                                     ║
║                                   ¯¯¯¯¯¯¯                                    ║
╚══════════════════════════════════════════════════════════════════════════════╝
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
*/

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    #[test]
    fn from() {
        assert_eq!(Token::from("/").encoded(), "~1");
        assert_eq!(Token::from("~/").encoded(), "~0~1");
        assert_eq!(Token::from(34u32).encoded(), "34");
        assert_eq!(Token::from(34u64).encoded(), "34");
        assert_eq!(Token::from(String::from("foo")).encoded(), "foo");
        assert_eq!(Token::from(&Token::new("foo")).encoded(), "foo");
    }

    #[test]
    fn to_index() {
        assert_eq!(Token::new("0").to_index(), Ok(Index(0)));
        assert_eq!(Token::new("2").to_index(), Ok(Index(2)));
        assert!(Token::new("a").to_index().is_err());
        assert!(Token::new("-").to_index().is_err());
        assert!(Token::new("-1").to_index().is_err());
        assert!(Token::new(" 1").to_index().is_err());
    }

    #[test]
    fn new() {
        assert_eq!(Token::new("~1").encoded(), "~01");
        assert_eq!(Token::new("a/b").encoded(), "a~1b");
        assert_eq!(Token::new("a/b").decoded(), "a/b");
    }

    #[test]
    fn from_encoded() {
        assert_eq!(Token::from_encoded("~1").decoded(), "/");
        assert_eq!(Token::from_encoded("~0~1").decoded(), "~/");
        assert_eq!(Token::from_encoded("a~1b").decoded(), "a/b");
        assert_eq!(Token::from_encoded("m~0n").decoded(), "m~n");
        // each escape is replaced exactly once
        assert_eq!(Token::from_encoded("~01").decoded(), "~1");
        assert_eq!(Token::from_encoded("~00").decoded(), "~0");
        // unknown escapes are left alone
        assert_eq!(Token::from_encoded("a~b").decoded(), "a~b");
        assert_eq!(Token::from_encoded("a~").decoded(), "a~");
        assert_eq!(Token::from_encoded("").decoded(), "");
    }

    #[test]
    fn from_encoded_keeps_multibyte_text() {
        assert_eq!(Token::from_encoded("é~1ü").decoded(), "é/ü");
        assert_eq!(Token::from_encoded("~é~0").decoded(), "~é~");
        assert_eq!(Token::from_encoded("日本~1語~").decoded(), "日本/語~");
        assert_eq!(Token::from_encoded("🦀~0🦀").decoded(), "🦀~🦀");
    }

    #[test]
    fn from_encoded_does_not_allocate_without_escapes() {
        let token = Token::from_encoded("plain");
        assert!(matches!(token.inner, Cow::Borrowed(_)));
    }

    #[test]
    fn into_owned() {
        let token = Token::from_encoded("foo~0").into_owned();
        assert_eq!(token.encoded(), "foo~0");
        assert_eq!(token.decoded(), "foo~");
    }

    #[quickcheck]
    fn encode_decode(s: String) -> bool {
        let token = Token::new(s);
        let encoded = token.encoded().into_owned();
        Token::from_encoded(&encoded) == token
    }

    #[test]
    fn display() {
        assert_eq!(Token::new("a/b").to_string(), "a/b");
    }
}
