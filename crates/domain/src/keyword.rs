use crate::text;

/// Ordered list of values with alias keywords.
///
/// A name matches a row if its folded form contains one of the row's folded
/// keywords. Rows are checked in order and the first match wins, so more
/// specific rows (`"leg press"`) have to precede general ones (`"press"`).
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordTable<T> {
    rows: Vec<(T, Vec<String>)>,
}

impl<T> KeywordTable<T> {
    #[must_use]
    pub fn new(rows: impl IntoIterator<Item = (T, Vec<String>)>) -> Self {
        let mut table = Self { rows: vec![] };
        for (value, keywords) in rows {
            table.push(value, keywords);
        }
        table
    }

    /// Appends a row, keywords that fold to an empty string are dropped.
    pub fn push(&mut self, value: T, keywords: impl IntoIterator<Item = impl AsRef<str>>) {
        let keywords = keywords
            .into_iter()
            .map(|k| text::fold(k.as_ref()))
            .filter(|k| !k.is_empty())
            .collect::<Vec<_>>();
        self.rows.push((value, keywords));
    }

    #[must_use]
    pub fn classify(&self, name: &str) -> Option<&T> {
        self.classify_folded(&text::fold(name))
    }

    /// Like `classify`, but the most recently pushed row wins.
    #[must_use]
    pub fn classify_newest(&self, name: &str) -> Option<&T> {
        let folded = text::fold(name);
        self.rows
            .iter()
            .rev()
            .find(|(_, keywords)| keywords.iter().any(|k| folded.contains(k.as_str())))
            .map(|(value, _)| value)
    }

    #[must_use]
    pub fn classify_folded(&self, folded: &str) -> Option<&T> {
        self.rows
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| folded.contains(k.as_str())))
            .map(|(value, _)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&T, &[String])> {
        self.rows.iter().map(|(value, keywords)| (value, keywords.as_slice()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<T: Clone> KeywordTable<T> {
    #[must_use]
    pub fn from_static(rows: &[(T, &[&str])]) -> Self {
        Self::new(rows.iter().map(|(value, keywords)| {
            (
                value.clone(),
                keywords.iter().map(|k| (*k).to_string()).collect(),
            )
        }))
    }
}

impl<T> Default for KeywordTable<T> {
    fn default() -> Self {
        Self { rows: vec![] }
    }
}
