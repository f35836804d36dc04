use core::{
    any::Any,
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::{
    assign::assign_node,
    resolve::resolve_node,
    AssignError, Found, Node, ParseError, ResolveError, Token, Tokens,
};

/*
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
╔══════════════════════════════════════════════════════════════════════════════╗
║                                                                              ║
║                                   Pointer                                    ║
║                                  ¯¯¯¯¯¯¯¯¯                                   ║
╚══════════════════════════════════════════════════════════════════════════════╝
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
*/

/// A JSON Pointer is a sequence of zero or more reference tokens, each
/// prefixed by a `'/'` character when written out.
///
/// A `Pointer` is parsed once and never changes afterwards. Its tokens are
/// held decoded; [`Pointer::expression`] encodes them again. The byte offset
/// of each token in the parsed text is kept too, so errors point into the
/// text the caller wrote even when it used an escape that does not
/// round-trip (`~` followed by anything but `0` or `1`).
///
/// See [RFC 6901 for more
/// information](https://datatracker.ietf.org/doc/html/rfc6901).
///
/// ## Example
/// ```rust
/// use jspointer::Pointer;
/// use serde_json::json;
///
/// let data = json!({ "foo": { "bar": "baz" } });
/// let ptr = Pointer::parse("/foo/bar").unwrap();
/// let found = ptr.get(&data).unwrap();
/// assert_eq!(found.downcast_ref::<serde_json::Value>(), Some(&json!("baz")));
/// ```
#[derive(Clone, Default)]
pub struct Pointer {
    tokens: Vec<Token<'static>>,
    // byte offset of each token's leading slash
    offsets: Vec<usize>,
}

impl Pointer {
    /// Attempts to parse a string into a `Pointer`.
    ///
    /// The empty string is the root pointer; anything else must start with
    /// `'/'`. Empty segments are kept, so `"/"` addresses the key `""`.
    ///
    /// ## Errors
    /// Returns [`ParseError::NoLeadingSlash`] if `s` is neither empty nor
    /// starts with `'/'`.
    pub fn parse(s: &str) -> Result<Self, ParseError> {
        if s.is_empty() {
            return Ok(Self::root());
        }
        let Some(rest) = s.strip_prefix('/') else {
            return Err(ParseError::NoLeadingSlash);
        };
        let mut ptr = Self::root();
        let mut offset = 0;
        for segment in rest.split('/') {
            ptr.tokens.push(Token::from_encoded(segment).into_owned());
            ptr.offsets.push(offset);
            offset += 1 + segment.len();
        }
        Ok(ptr)
    }

    /// Creates a root pointer, which addresses the whole document.
    pub fn root() -> Self {
        Self::default()
    }

    /// Creates a `Pointer` from decoded tokens.
    ///
    /// ## Example
    /// ```rust
    /// use jspointer::Pointer;
    /// let ptr = Pointer::from_tokens(["a/b", "m~n"]);
    /// assert_eq!(ptr.expression(), "/a~1b/m~0n");
    /// ```
    pub fn from_tokens<'t>(tokens: impl IntoIterator<Item: Into<Token<'t>>>) -> Self {
        let mut ptr = Self::root();
        let mut offset = 0;
        for token in tokens {
            let token = Into::<Token<'t>>::into(token).into_owned();
            ptr.offsets.push(offset);
            offset += 1 + token.encoded().len();
            ptr.tokens.push(token);
        }
        ptr
    }

    /// Returns `true` if the `Pointer` has no tokens (`""`).
    pub fn is_root(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Returns the number of tokens in the `Pointer`.
    pub fn count(&self) -> usize {
        self.tokens.len()
    }

    /// Returns an iterator of the decoded `Token`s in the `Pointer`.
    pub fn tokens(&self) -> Tokens<'_> {
        Tokens::new(self.tokens.iter())
    }

    /// Returns the `Token` at `index`, if any.
    pub fn token(&self, index: usize) -> Option<&Token<'static>> {
        self.tokens.get(index)
    }

    /// Returns the first `Token` in the `Pointer`.
    pub fn first(&self) -> Option<&Token<'static>> {
        self.tokens.first()
    }

    /// Returns the last `Token` in the `Pointer`.
    pub fn last(&self) -> Option<&Token<'static>> {
        self.tokens.last()
    }

    /// Returns the byte offset of the leading slash of the token at `index`
    /// within the text the `Pointer` was parsed from.
    ///
    /// Pointers built with [`Pointer::from_tokens`] measure offsets in
    /// [`Pointer::expression`].
    ///
    /// ## Example
    /// ```rust
    /// use jspointer::Pointer;
    /// let ptr = Pointer::parse("/a~b/x").unwrap();
    /// assert_eq!(ptr.offset(1), Some(4));
    /// assert_eq!(ptr.expression(), "/a~0b/x");
    /// ```
    pub fn offset(&self, index: usize) -> Option<usize> {
        self.offsets.get(index).copied()
    }

    /// Tokens paired with their offsets.
    pub(crate) fn positioned(
        &self,
    ) -> impl DoubleEndedIterator<Item = (usize, &Token<'static>)> + '_ {
        self.offsets.iter().copied().zip(self.tokens.iter())
    }

    /// Renders the pointer as RFC 6901 text.
    ///
    /// `Pointer::parse(x)?.expression() == x` holds for every `x` in which
    /// each `~` is followed by `0` or `1`.
    pub fn expression(&self) -> String {
        let mut s = String::new();
        for token in &self.tokens {
            s.push('/');
            s.push_str(&token.encoded());
        }
        s
    }

    /// Locates the value this `Pointer` addresses within `root`.
    ///
    /// ## Errors
    /// Returns [`ResolveError`] if the path does not exist in `root`.
    pub fn get<'v>(&self, root: &'v dyn Node) -> Result<Found<'v>, ResolveError> {
        resolve_node(self, root)
    }

    /// Overwrites the value this `Pointer` addresses within `root` with
    /// `value`.
    ///
    /// The target must already exist; nothing is created along the way. The
    /// root pointer replaces `root` itself.
    ///
    /// ## Example
    /// ```rust
    /// use jspointer::Pointer;
    /// use serde_json::json;
    ///
    /// let mut data = json!({ "a": [{ "b": 1, "c": 2 }] });
    /// let ptr = Pointer::parse("/a/0/c").unwrap();
    /// ptr.set(&mut data, json!(999)).unwrap();
    /// assert_eq!(data, json!({ "a": [{ "b": 1, "c": 999 }] }));
    /// ```
    ///
    /// ## Errors
    /// Returns [`AssignError`] if the path does not exist in `root`, or if the
    /// target can not be overwritten with `value`.
    pub fn set<V: Any>(&self, root: &mut dyn Node, value: V) -> Result<(), AssignError> {
        assign_node(self, root, Box::new(value))
    }
}

impl fmt::Display for Pointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for token in &self.tokens {
            write!(f, "/{}", token.encoded())?;
        }
        Ok(())
    }
}

impl PartialEq for Pointer {
    fn eq(&self, other: &Self) -> bool {
        self.tokens == other.tokens
    }
}

impl Eq for Pointer {}

impl PartialOrd for Pointer {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pointer {
    fn cmp(&self, other: &Self) -> Ordering {
        self.tokens.cmp(&other.tokens)
    }
}

impl Hash for Pointer {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.tokens.hash(state);
    }
}

impl fmt::Debug for Pointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{self}\"")
    }
}

impl FromStr for Pointer {
    type Err = ParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for Pointer {
    type Error = ParseError;
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl TryFrom<String> for Pointer {
    type Error = ParseError;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl PartialEq<str> for Pointer {
    fn eq(&self, other: &str) -> bool {
        self.expression() == other
    }
}

impl PartialEq<&str> for Pointer {
    fn eq(&self, other: &&str) -> bool {
        self.expression() == *other
    }
}

impl<'t> FromIterator<Token<'t>> for Pointer {
    fn from_iter<T: IntoIterator<Item = Token<'t>>>(iter: T) -> Self {
        Self::from_tokens(iter)
    }
}

impl Serialize for Pointer {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Pointer {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Pointer::parse(&s).map_err(serde::de::Error::custom)
    }
}

/*
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
╔══════════════════════════════════════════════════════════════════════════════╗
║                                                                              ║
║                                    Tests                                     ║
║                                   ¯¯¯¯¯¯¯                                    ║
╚══════════════════════════════════════════════════════════════════════════════╝
░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░░
*/

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Kind, ResolveError};
    use quickcheck_macros::quickcheck;
    use serde_json::{json, Value};

    fn rfc_data() -> Value {
        json!({
            "foo": ["bar", "baz"],
            "obj": { "a": 1, "b": 2, "c": [3, 4], "d": [{ "e": 9 }, { "f": [50, 51] }] },
            "": 0,
            "a/b": 1,
            "c%d": 2,
            "e^f": 3,
            "g|h": 4,
            "i\\j": 5,
            "k\"l": 6,
            " ": 7,
            "m~n": 8
        })
    }

    fn get(ptr: &str, data: &Value) -> Value {
        Pointer::parse(ptr)
            .unwrap()
            .get(data)
            .unwrap()
            .downcast_ref::<Value>()
            .cloned()
            .unwrap()
    }

    #[test]
    fn rfc_examples() {
        let data = rfc_data();
        assert_eq!(get("", &data), data);
        assert_eq!(get("/foo", &data), json!(["bar", "baz"]));
        assert_eq!(get("/foo/0", &data), json!("bar"));
        assert_eq!(get("/", &data), json!(0));
        assert_eq!(get("/a~1b", &data), json!(1));
        assert_eq!(get("/c%d", &data), json!(2));
        assert_eq!(get("/e^f", &data), json!(3));
        assert_eq!(get("/g|h", &data), json!(4));
        assert_eq!(get("/i\\j", &data), json!(5));
        assert_eq!(get("/k\"l", &data), json!(6));
        assert_eq!(get("/ ", &data), json!(7));
        assert_eq!(get("/m~0n", &data), json!(8));
    }

    #[test]
    fn escaping_round_trips() {
        for expr in ["/a~1b", "/m~0n", "/a~1b/m~0n", "", "/", "//", "/~01"] {
            let ptr = Pointer::parse(expr).unwrap();
            assert_eq!(ptr.expression(), expr);
            assert_eq!(ptr.to_string(), expr);
        }
    }

    #[test]
    fn parse_tokens() {
        let ptr = Pointer::parse("/a~1b/m~0n").unwrap();
        let tokens: Vec<&str> = ptr.tokens().map(Token::decoded).collect();
        assert_eq!(tokens, vec!["a/b", "m~n"]);

        let ptr = Pointer::parse("/").unwrap();
        assert_eq!(ptr.count(), 1);
        assert_eq!(ptr.first().unwrap(), "");

        let ptr = Pointer::parse("//").unwrap();
        assert_eq!(ptr.count(), 2);

        let ptr = Pointer::parse("").unwrap();
        assert!(ptr.is_root());
        assert_eq!(ptr.count(), 0);
        assert_eq!(ptr.first(), None);
    }

    #[test]
    fn parse_requires_leading_slash() {
        assert_eq!(Pointer::parse("foo"), Err(ParseError::NoLeadingSlash));
        assert_eq!(Pointer::parse(" /foo"), Err(ParseError::NoLeadingSlash));
        assert!("foo".parse::<Pointer>().is_err());
        assert!(Pointer::try_from("/foo").is_ok());
        assert!(Pointer::try_from(String::from("/foo")).is_ok());
    }

    #[test]
    fn accessors() {
        let ptr = Pointer::parse("/foo/bar/baz").unwrap();
        assert_eq!(ptr.first().unwrap(), "foo");
        assert_eq!(ptr.last().unwrap(), "baz");
        assert_eq!(ptr.token(1).unwrap(), "bar");
        assert_eq!(ptr.token(3), None);
        assert_eq!(ptr.tokens().len(), 3);
        assert_eq!(ptr.tokens().next_back().unwrap(), "baz");
        assert_eq!(ptr, "/foo/bar/baz");
    }

    #[test]
    fn from_tokens() {
        let ptr = Pointer::from_tokens(["foo", "", "a/b"]);
        assert_eq!(ptr.expression(), "/foo//a~1b");
        let ptr: Pointer = [Token::from(0u8), Token::new("~")].into_iter().collect();
        assert_eq!(ptr.expression(), "/0/~0");
        assert_eq!(Pointer::from_tokens(Vec::<String>::new()), Pointer::root());
    }

    #[test]
    fn whole_document() {
        let data = rfc_data();
        let found = Pointer::root().get(&data).unwrap();
        assert_eq!(found.kind, Kind::Mapping);
        assert_eq!(found.downcast_ref::<Value>(), Some(&data));
    }

    #[test]
    fn get_nested() {
        let data = rfc_data();
        assert_eq!(get("/obj/a", &data), json!(1));
        assert_eq!(get("/obj/b", &data), json!(2));
        assert_eq!(get("/obj/c/0", &data), json!(3));
        assert_eq!(get("/obj/c/1", &data), json!(4));
        assert_eq!(get("/obj/d/1/f/0", &data), json!(50));
    }

    #[test]
    fn get_out_of_bounds() {
        let data = json!({ "foo": ["x", "y"] });
        let err = Pointer::parse("/foo/5").unwrap().get(&data).unwrap_err();
        assert!(err.is_out_of_bounds());
        assert_eq!(err.offset(), 4);
    }

    #[test]
    fn set_then_get() {
        let mut data = json!({ "a": [{ "b": 1, "c": 2 }], "d": 3 });
        let ptr = Pointer::parse("/a/0/c").unwrap();
        ptr.set(&mut data, json!(999)).unwrap();
        assert_eq!(get("/a/0/c", &data), json!(999));
        assert_eq!(get("/a/0/b", &data), json!(1));
    }

    #[test]
    fn set_missing_key_is_not_found() {
        let mut data = json!({ "a": {} });
        let ptr = Pointer::parse("/a/b").unwrap();
        let err = ptr.set(&mut data, json!(1)).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(data, json!({ "a": {} }));
    }

    #[test]
    fn not_found_error() {
        let data = rfc_data();
        let err = Pointer::parse("/obj/zzz").unwrap().get(&data).unwrap_err();
        assert_eq!(err, ResolveError::NotFound { offset: 4 });
    }

    #[test]
    fn offsets_follow_parsed_text() {
        let ptr = Pointer::parse("/a~b/x").unwrap();
        assert_eq!(ptr.offset(0), Some(0));
        assert_eq!(ptr.offset(1), Some(4));
        assert_eq!(ptr.offset(2), None);
        assert_eq!(ptr, Pointer::from_tokens(["a~b", "x"]));
        assert_eq!(Pointer::from_tokens(["a~b", "x"]).offset(1), Some(5));

        let data = json!({ "a~b": {} });
        let err = ptr.get(&data).unwrap_err();
        assert_eq!(err, ResolveError::NotFound { offset: 4 });

        let ptr = Pointer::parse("/~x/~01/").unwrap();
        let offsets: Vec<_> = (0..ptr.count()).filter_map(|i| ptr.offset(i)).collect();
        assert_eq!(offsets, [0, 3, 7]);
    }

    #[test]
    fn serde() {
        let ptr = Pointer::parse("/a~1b/0").unwrap();
        let json = serde_json::to_string(&ptr).unwrap();
        assert_eq!(json, "\"/a~1b/0\"");
        let back: Pointer = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ptr);
        assert!(serde_json::from_str::<Pointer>("\"nope\"").is_err());
    }

    #[quickcheck]
    fn expression_round_trips(ptr: Pointer) -> bool {
        let expr = ptr.expression();
        Pointer::parse(&expr).map_or(false, |p| p == ptr && p.expression() == expr)
    }
}
