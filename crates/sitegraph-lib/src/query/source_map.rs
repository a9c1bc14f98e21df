//! Query texts registered with a compiler, addressed by [`SourceId`].

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct SourceId(pub(crate) u32);

impl SourceId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Where a query text came from.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum SourceKind {
    /// Passed as a string, e.g. `sitegraph exec -q`.
    Inline,
    Stdin,
    /// A query file, or a page component the query was extracted from.
    File(String),
}

impl SourceKind {
    /// Name used for the source in error reports and diagnostics maps.
    pub fn display_name(&self) -> &str {
        match self {
            SourceKind::Inline => "<query>",
            SourceKind::Stdin => "<stdin>",
            SourceKind::File(path) => path,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Source<'q> {
    pub id: SourceId,
    pub kind: &'q SourceKind,
    pub content: &'q str,
}

impl<'q> Source<'q> {
    pub fn as_str(&self) -> &'q str {
        self.content
    }

    pub fn display_name(&self) -> &'q str {
        self.kind.display_name()
    }
}

#[derive(Clone, Debug, Default)]
pub struct SourceMap {
    kinds: Vec<SourceKind>,
    texts: Vec<String>,
}

impl SourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inline(content: &str) -> Self {
        let mut map = Self::new();
        map.add_inline(content);
        map
    }

    fn add(&mut self, kind: SourceKind, content: &str) -> SourceId {
        let id = SourceId(self.kinds.len() as u32);
        self.kinds.push(kind);
        self.texts.push(content.to_owned());
        id
    }

    pub fn add_inline(&mut self, content: &str) -> SourceId {
        self.add(SourceKind::Inline, content)
    }

    pub fn add_stdin(&mut self, content: &str) -> SourceId {
        self.add(SourceKind::Stdin, content)
    }

    pub fn add_file(&mut self, path: &str, content: &str) -> SourceId {
        self.add(SourceKind::File(path.to_owned()), content)
    }

    pub fn get(&self, id: SourceId) -> Option<Source<'_>> {
        let kind = self.kinds.get(id.index())?;
        let content = self.texts.get(id.index())?;
        Some(Source { id, kind, content })
    }

    pub fn content(&self, id: SourceId) -> Option<&str> {
        self.get(id).map(|s| s.content)
    }

    pub fn kind(&self, id: SourceId) -> Option<&SourceKind> {
        self.kinds.get(id.index())
    }

    /// The path of a file source; `None` for inline and stdin sources.
    pub fn path(&self, id: SourceId) -> Option<&str> {
        match self.kind(id)? {
            SourceKind::File(path) => Some(path),
            SourceKind::Inline | SourceKind::Stdin => None,
        }
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Sources in the order they were added.
    pub fn iter(&self) -> impl Iterator<Item = Source<'_>> {
        (0..self.len()).filter_map(|i| self.get(SourceId(i as u32)))
    }
}
