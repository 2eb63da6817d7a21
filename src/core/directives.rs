use crate::constants;
use crate::core::source::Source;
use crate::utils::BufferWriter;
use bytes::BytesMut;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::{
    borrow::Cow,
    fmt,
    sync::{Arc, OnceLock},
};

/// How the values of a directive are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectiveKind {
    /// Keywords of the directive plus host/scheme/wildcard expressions.
    SourceList,
    /// A closed keyword vocabulary, no source expressions.
    Sandbox,
    /// Raw URIs, never keywords.
    ReportUri,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectiveRule {
    kind: DirectiveKind,
    keywords: SmallVec<[Cow<'static, str>; 4]>,
}

impl DirectiveRule {
    pub fn new<I, K>(kind: DirectiveKind, keywords: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<Cow<'static, str>>,
    {
        Self {
            kind,
            keywords: keywords.into_iter().map(Into::into).collect(),
        }
    }

    #[inline]
    pub fn kind(&self) -> DirectiveKind {
        self.kind
    }

    #[inline]
    pub fn keywords(&self) -> &[Cow<'static, str>] {
        &self.keywords
    }

    #[inline]
    pub fn is_keyword(&self, value: &str) -> bool {
        self.keywords.iter().any(|keyword| keyword == value)
    }
}

/// Read-only lookup table from directive name to the rule its values obey.
///
/// The table is built once and shared behind an [`Arc`]; nothing mutates it
/// after [`DirectiveTableBuilder::build`].
#[derive(Debug, Clone, Default)]
pub struct DirectiveTable {
    rules: FxHashMap<Cow<'static, str>, DirectiveRule>,
}

static CSP1_TABLE: OnceLock<Arc<DirectiveTable>> = OnceLock::new();

impl DirectiveTable {
    /// The CSP 1.0 directive set, shared process-wide.
    pub fn csp1() -> Arc<Self> {
        CSP1_TABLE
            .get_or_init(|| Arc::new(Self::build_csp1()))
            .clone()
    }

    #[inline]
    pub fn builder() -> DirectiveTableBuilder {
        DirectiveTableBuilder::default()
    }

    fn build_csp1() -> Self {
        use constants::*;

        const FETCH_KEYWORDS: [&str; 2] = [NONE_KEYWORD, SELF_KEYWORD];

        Self::builder()
            .report_uri(REPORT_URI)
            .sandbox(
                SANDBOX,
                [ALLOW_FORMS, ALLOW_SAME_ORIGIN, ALLOW_SCRIPTS, ALLOW_TOP_NAVIGATION],
            )
            .source_list(CONNECT_SRC, FETCH_KEYWORDS)
            .source_list(DEFAULT_SRC, FETCH_KEYWORDS)
            .source_list(FONT_SRC, FETCH_KEYWORDS)
            .source_list(FRAME_SRC, FETCH_KEYWORDS)
            .source_list(IMG_SRC, FETCH_KEYWORDS)
            .source_list(MEDIA_SRC, FETCH_KEYWORDS)
            .source_list(OBJECT_SRC, FETCH_KEYWORDS)
            .source_list(
                SCRIPT_SRC,
                [NONE_KEYWORD, SELF_KEYWORD, UNSAFE_EVAL_KEYWORD, UNSAFE_INLINE_KEYWORD],
            )
            .source_list(STYLE_SRC, [NONE_KEYWORD, SELF_KEYWORD, UNSAFE_INLINE_KEYWORD])
            .build()
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<&DirectiveRule> {
        self.rules.get(name)
    }

    /// Like [`get`](Self::get), also returning the table's own copy of the name.
    #[inline]
    pub fn get_key_value(&self, name: &str) -> Option<(&Cow<'static, str>, &DirectiveRule)> {
        self.rules.get_key_value(name)
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(|name| name.as_ref())
    }
}

#[derive(Debug, Default)]
pub struct DirectiveTableBuilder {
    rules: FxHashMap<Cow<'static, str>, DirectiveRule>,
}

impl DirectiveTableBuilder {
    pub fn rule(mut self, name: impl Into<Cow<'static, str>>, rule: DirectiveRule) -> Self {
        self.rules.insert(name.into(), rule);
        self
    }

    pub fn source_list<I, K>(self, name: impl Into<Cow<'static, str>>, keywords: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<Cow<'static, str>>,
    {
        self.rule(name, DirectiveRule::new(DirectiveKind::SourceList, keywords))
    }

    pub fn sandbox<I, K>(self, name: impl Into<Cow<'static, str>>, keywords: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<Cow<'static, str>>,
    {
        self.rule(name, DirectiveRule::new(DirectiveKind::Sandbox, keywords))
    }

    pub fn report_uri(self, name: impl Into<Cow<'static, str>>) -> Self {
        self.rule(
            name,
            DirectiveRule::new(DirectiveKind::ReportUri, std::iter::empty::<&'static str>()),
        )
    }

    #[inline]
    pub fn build(self) -> DirectiveTable {
        DirectiveTable { rules: self.rules }
    }
}

/// A named directive with its validated, deduplicated sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    name: Cow<'static, str>,
    sources: SmallVec<[Source; 4]>,
}

impl Directive {
    #[inline]
    pub(crate) fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            sources: SmallVec::new(),
        }
    }

    pub(crate) fn push(&mut self, source: Source) -> &mut Self {
        if !self.sources.contains(&source) {
            self.sources.push(source);
        }
        self
    }

    /// Drops every source whose author form is listed in `removed`.
    pub(crate) fn subtract<S: AsRef<str>>(&mut self, removed: &[S]) -> &mut Self {
        self.sources
            .retain(|source| !removed.iter().any(|value| source.matches_raw(value.as_ref())));
        self
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    #[inline]
    pub fn raw_values(&self) -> impl Iterator<Item = &str> {
        self.sources.iter().map(Source::raw)
    }

    #[inline]
    pub fn contains_raw(&self, value: &str) -> bool {
        self.sources.iter().any(|source| source.matches_raw(value))
    }

    #[inline]
    pub fn estimated_size(&self) -> usize {
        self.name.len()
            + self
                .sources
                .iter()
                .map(|s| s.estimated_size() + 1)
                .sum::<usize>()
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        for source in &self.sources {
            write!(f, " {}", source)?;
        }
        Ok(())
    }
}

impl BufferWriter for Directive {
    fn write_to_buffer(&self, buffer: &mut BytesMut) {
        buffer.extend_from_slice(self.name.as_bytes());
        for source in &self.sources {
            buffer.extend_from_slice(b" ");
            source.write_to_buffer(buffer);
        }
    }
}
