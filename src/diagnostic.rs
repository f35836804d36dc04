//! Error reporting data structures and miette integration.
//!
//! Errors produced while parsing or following a [`Pointer`](crate::Pointer)
//! only carry offsets. Pairing one with the pointer expression it refers to
//! yields a [`Report`], which can point at the offending token:
//!
//! ```rust
//! use jspointer::{Diagnose, Pointer};
//! use serde_json::json;
//!
//! let data = json!({ "list": [1, 2] });
//! let ptr = Pointer::parse("/list/7").unwrap();
//! let report = ptr.get(&data).diagnose(ptr.expression()).unwrap_err();
//! assert_eq!(report.subject(), "/list/7");
//! assert!(report.is_out_of_bounds());
//! ```

use core::{fmt, ops::Deref};

use crate::{AssignError, CanNotSetError, ParseError, ResolveError};

/// Implemented by errors which can be converted into a [`Report`].
pub trait Diagnostic: Sized {
    /// The value which caused the error.
    type Subject: Deref;

    /// Combine the error with its subject to generate a [`Report`].
    fn into_report(self, subject: impl Into<Self::Subject>) -> Report<Self> {
        Report {
            source: self,
            subject: subject.into(),
        }
    }

    /// The docs.rs URL for this error
    fn url() -> &'static str;

    /// Returns the labels for the given subject if applicable.
    fn labels(&self, subject: &Self::Subject) -> Option<Box<dyn Iterator<Item = Label>>>;
}

/// A label for a span within a json pointer.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Label {
    text: String,
    offset: usize,
    len: usize,
}

impl Label {
    /// Creates a new instance of a [`Label`] from its parts
    pub fn new(text: String, offset: usize, len: usize) -> Self {
        Self { text, offset, len }
    }

    /// The message attached to the span.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Byte offset of the span within the subject.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Byte length of the span.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the span is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[cfg(feature = "miette")]
impl From<Label> for miette::LabeledSpan {
    fn from(value: Label) -> Self {
        miette::LabeledSpan::new(Some(value.text), value.offset, value.len)
    }
}

/// An error wrapper which includes the subject of the failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report<D: Diagnostic> {
    source: D,
    subject: D::Subject,
}

impl<D: Diagnostic> Report<D> {
    /// The value which caused the error.
    pub fn subject(&self) -> &<D::Subject as Deref>::Target {
        &self.subject
    }

    /// The error which occurred.
    pub fn original(&self) -> &D {
        &self.source
    }

    /// The original parts of the [`Report`].
    pub fn decompose(self) -> (D, D::Subject) {
        (self.source, self.subject)
    }

    /// Labels marking the part of the subject that caused the error.
    pub fn labels(&self) -> impl Iterator<Item = Label> {
        self.source.labels(&self.subject).into_iter().flatten()
    }
}

impl<D: Diagnostic> Deref for Report<D> {
    type Target = D;

    fn deref(&self) -> &Self::Target {
        &self.source
    }
}

impl<D: Diagnostic + fmt::Display> fmt::Display for Report<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.source, f)
    }
}

impl<D> std::error::Error for Report<D>
where
    D: Diagnostic + fmt::Debug + std::error::Error + 'static,
    D::Subject: fmt::Debug,
{
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

#[cfg(feature = "miette")]
impl<D> miette::Diagnostic for Report<D>
where
    D: Diagnostic + fmt::Debug + std::error::Error + 'static,
    D::Subject: fmt::Debug + miette::SourceCode,
{
    fn url<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(D::url()))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.subject)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = miette::LabeledSpan> + '_>> {
        Some(Box::new(self.source.labels(&self.subject)?.map(Into::into)))
    }
}

macro_rules! impl_diagnostic_url {
    (enum $type:ident) => {
        $crate::diagnostic::impl_diagnostic_url!("enum", $type)
    };
    (struct $type:ident) => {
        $crate::diagnostic::impl_diagnostic_url!("struct", $type)
    };
    ($kind:literal, $type:ident) => {
        concat!(
            "https://docs.rs/jspointer/",
            env!("CARGO_PKG_VERSION"),
            "/jspointer/",
            $kind,
            ".",
            stringify!($type),
            ".html",
        )
    };
}
pub(crate) use impl_diagnostic_url;

/// Span of the token whose leading slash sits at `offset`, slash included.
fn token_span(subject: &str, offset: usize) -> Option<(usize, usize)> {
    let rest = subject.get(offset..)?.strip_prefix('/')?;
    let len = rest.find('/').unwrap_or(rest.len());
    Some((offset, len + 1))
}

fn token_label(
    subject: &str,
    offset: usize,
    text: String,
) -> Option<Box<dyn Iterator<Item = Label>>> {
    let (offset, len) = token_span(subject, offset)?;
    Some(Box::new(core::iter::once(Label::new(text, offset, len))))
}

impl Diagnostic for ParseError {
    type Subject = String;

    fn url() -> &'static str {
        impl_diagnostic_url!(enum ParseError)
    }

    fn labels(&self, subject: &Self::Subject) -> Option<Box<dyn Iterator<Item = Label>>> {
        match self {
            Self::NoLeadingSlash => {
                let len = subject.chars().next().map_or(0, char::len_utf8);
                Some(Box::new(core::iter::once(Label::new(
                    "must start with a slash ('/')".into(),
                    self.offset(),
                    len,
                ))))
            }
        }
    }
}

impl Diagnostic for ResolveError {
    type Subject = String;

    fn url() -> &'static str {
        impl_diagnostic_url!(enum ResolveError)
    }

    fn labels(&self, subject: &Self::Subject) -> Option<Box<dyn Iterator<Item = Label>>> {
        let text = match self {
            Self::FailedToParseIndex { .. } => "not a sequence index".to_string(),
            Self::OutOfBounds { source, .. } => {
                format!("out of bounds (length: {})", source.length)
            }
            Self::NotFound { .. } => "not found".to_string(),
            Self::KeyConversion { source, .. } => {
                format!("can not be converted to {}", source.key_type)
            }
        };
        token_label(subject, self.offset(), text)
    }
}

impl Diagnostic for AssignError {
    type Subject = String;

    fn url() -> &'static str {
        impl_diagnostic_url!(enum AssignError)
    }

    fn labels(&self, subject: &Self::Subject) -> Option<Box<dyn Iterator<Item = Label>>> {
        let text = match self {
            Self::FailedToParseIndex { .. } => "not a sequence index".to_string(),
            Self::OutOfBounds { source, .. } => {
                format!("out of bounds (length: {})", source.length)
            }
            Self::NotFound { .. } => "not found".to_string(),
            Self::KeyConversion { source, .. } => {
                format!("can not be converted to {}", source.key_type)
            }
            Self::CanNotSet {
                source: CanNotSetError::ReadOnly { .. },
                ..
            } => "read-only".to_string(),
            Self::CanNotSet {
                source: CanNotSetError::TypeMismatch { expected },
                ..
            } => format!("expects a value of type `{expected}`"),
        };
        token_label(subject, self.offset(), text)
    }
}

/// Extension for `Result`s whose error is a [`Diagnostic`].
pub trait Diagnose<T> {
    /// The error type of the result.
    type Error: Diagnostic;

    /// Wraps the error, if any, in a [`Report`] about `subject`.
    #[allow(clippy::missing_errors_doc)]
    fn diagnose(
        self,
        subject: impl Into<<Self::Error as Diagnostic>::Subject>,
    ) -> Result<T, Report<Self::Error>>;

    /// Like [`Diagnose::diagnose`], computing the subject only on error.
    #[allow(clippy::missing_errors_doc)]
    fn diagnose_with<F, S>(self, f: F) -> Result<T, Report<Self::Error>>
    where
        F: FnOnce() -> S,
        S: Into<<Self::Error as Diagnostic>::Subject>;
}

impl<T, E> Diagnose<T> for Result<T, E>
where
    E: Diagnostic,
{
    type Error = E;

    fn diagnose(
        self,
        subject: impl Into<<Self::Error as Diagnostic>::Subject>,
    ) -> Result<T, Report<Self::Error>> {
        self.map_err(|error| error.into_report(subject))
    }

    fn diagnose_with<F, S>(self, f: F) -> Result<T, Report<Self::Error>>
    where
        F: FnOnce() -> S,
        S: Into<<Self::Error as Diagnostic>::Subject>,
    {
        self.map_err(|error| error.into_report(f()))
    }
}
