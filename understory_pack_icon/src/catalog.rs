// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Browsing icons: sorted listings and text filters.

use smallvec::SmallVec;

use crate::{IconKind, IconPack, IconSource};

/// An icon as listed in a catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconEntry {
    /// The icon.
    pub kind: IconKind,
    /// Human readable description; defaults to the icon name.
    pub description: String,
}

impl IconEntry {
    /// Creates an entry described by its own name.
    #[must_use]
    pub fn new(kind: IconKind) -> Self {
        let description = kind.name.clone();
        Self { kind, description }
    }

    /// Replaces the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Characters that separate terms which must all match.
const AND_SEPARATORS: [char; 4] = ['+', ',', ';', '&'];
/// Character that separates alternatives within a term.
const OR_SEPARATOR: char = '|';

/// A parsed search filter.
///
/// The text is split into terms on `+`, `,`, `;` or `&`, all of which must
/// match. Each term may list alternatives separated by `|`, any one of which
/// suffices. An alternative matches when it occurs, ignoring case, in an
/// entry's name or description. Alternatives are trimmed, so a blank one
/// such as the second half of `up| ` matches every entry, while a term made
/// only of separators, like the `|` in `arrow+|`, matches nothing. Blank
/// filters match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IconFilter {
    terms: Vec<SmallVec<[String; 2]>>,
}

impl IconFilter {
    /// Parses filter text.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        if text.trim().is_empty() {
            return Self::default();
        }
        let terms = text
            .split(AND_SEPARATORS)
            .filter(|term| !term.is_empty())
            .map(|term| {
                term.split(OR_SEPARATOR)
                    .filter(|alt| !alt.is_empty())
                    .map(|alt| alt.trim().to_lowercase())
                    .collect::<SmallVec<[String; 2]>>()
            })
            .collect();
        Self { terms }
    }

    /// Whether the filter has no terms and so accepts everything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Whether `entry` passes the filter.
    #[must_use]
    pub fn matches(&self, entry: &IconEntry) -> bool {
        if self.is_empty() {
            return true;
        }
        let name = entry.kind.name.to_lowercase();
        let description = entry.description.to_lowercase();
        self.terms.iter().all(|alternatives| {
            alternatives
                .iter()
                .any(|alt| name.contains(alt.as_str()) || description.contains(alt.as_str()))
        })
    }
}

/// Sorts entries by icon name, ignoring case.
pub fn sort_entries(entries: &mut [IconEntry]) {
    entries.sort_by_cached_key(|entry| entry.kind.name.to_lowercase());
}

/// Every icon of `pack` known to `source`, sorted by name ignoring case.
#[must_use]
pub fn sorted_kinds(source: &dyn IconSource, pack: IconPack) -> Vec<IconKind> {
    let mut kinds: Vec<_> = source
        .icon_names(pack)
        .map(|name| IconKind::new(pack, name))
        .collect();
    kinds.sort_by_cached_key(|kind| kind.name.to_lowercase());
    kinds
}

/// A sorted, filterable listing of icons.
#[derive(Debug, Clone, Default)]
pub struct IconCatalog {
    entries: Vec<IconEntry>,
    filter: IconFilter,
    visible: Vec<usize>,
}

impl IconCatalog {
    /// Creates a catalog from `entries`, sorting them.
    #[must_use]
    pub fn new(mut entries: Vec<IconEntry>) -> Self {
        sort_entries(&mut entries);
        let visible = (0..entries.len()).collect();
        Self {
            entries,
            filter: IconFilter::default(),
            visible,
        }
    }

    /// Lists the given packs of `source`, one pack after another.
    #[must_use]
    pub fn from_source(source: &dyn IconSource, packs: &[IconPack]) -> Self {
        let entries = packs
            .iter()
            .flat_map(|pack| sorted_kinds(source, *pack))
            .map(IconEntry::new)
            .collect::<Vec<_>>();
        // Entries are already sorted within each pack; keep the pack grouping.
        let visible = (0..entries.len()).collect();
        Self {
            entries,
            filter: IconFilter::default(),
            visible,
        }
    }

    /// Every entry, regardless of the filter.
    #[must_use]
    pub fn entries(&self) -> &[IconEntry] {
        &self.entries
    }

    /// The active filter.
    #[must_use]
    pub fn filter(&self) -> &IconFilter {
        &self.filter
    }

    /// Applies `text` as the filter, returning the number of matching entries.
    pub fn set_filter(&mut self, text: &str) -> usize {
        self.filter = IconFilter::parse(text);
        self.visible.clear();
        self.visible.extend(
            self.entries
                .iter()
                .enumerate()
                .filter(|(_, entry)| self.filter.matches(entry))
                .map(|(i, _)| i),
        );
        tracing::debug!(filter = text, matches = self.visible.len(), "filtered icons");
        self.visible.len()
    }

    /// Number of entries passing the filter.
    #[must_use]
    pub fn len(&self) -> usize {
        self.visible.len()
    }

    /// Whether no entry passes the filter.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }

    /// The `index`th entry passing the filter.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&IconEntry> {
        self.entries.get(*self.visible.get(index)?)
    }

    /// Entries passing the filter, in order.
    pub fn iter(&self) -> impl Iterator<Item = &IconEntry> + '_ {
        self.visible.iter().map(|&i| &self.entries[i])
    }
}

#[cfg(test)]
mod tests {
    use super::{IconCatalog, IconEntry, IconFilter, sort_entries, sorted_kinds};
    use crate::{IconDataTable, IconKind, IconPack};

    fn entry(name: &str) -> IconEntry {
        IconEntry::new(IconKind::new(IconPack::BoxIcons, name))
    }

    #[test]
    fn blank_filters_match_everything() {
        for text in ["", "   ", "+,;&"] {
            let filter = IconFilter::parse(text);
            assert!(filter.is_empty(), "{text:?} should parse to an empty filter");
            assert!(filter.matches(&entry("Anything")));
        }
        assert!(IconFilter::parse(" | ").matches(&entry("Anything")));
    }

    #[test]
    fn blank_alternative_matches_everything() {
        let filter = IconFilter::parse("up| ");
        assert!(!filter.is_empty());
        assert!(filter.matches(&entry("ArrowLeft")));

        let filter = IconFilter::parse("arrow+ |down");
        assert!(filter.matches(&entry("ArrowLeft")));
        assert!(!filter.matches(&entry("ChevronLeft")), "the other term still applies");

        let filter = IconFilter::parse("arrow+|");
        assert!(!filter.matches(&entry("ArrowLeft")), "a term without alternatives never matches");
    }

    #[test]
    fn and_terms_must_all_match() {
        let filter = IconFilter::parse("arrow+down");
        assert!(filter.matches(&entry("ArrowDownBold")));
        assert!(!filter.matches(&entry("ArrowUp")));
        assert!(IconFilter::parse("arrow, down").matches(&entry("ArrowDown")));
        assert!(IconFilter::parse("arrow;down&bold").matches(&entry("ArrowDownBold")));
    }

    #[test]
    fn or_alternatives_any_match() {
        let filter = IconFilter::parse("up | down");
        assert!(filter.matches(&entry("ArrowUp")));
        assert!(filter.matches(&entry("ChevronDown")));
        assert!(!filter.matches(&entry("ArrowLeft")));

        let filter = IconFilter::parse("arrow+up|left");
        assert!(filter.matches(&entry("ArrowLeft")));
        assert!(!filter.matches(&entry("ChevronLeft")));
    }

    #[test]
    fn description_is_searched_too() {
        let filter = IconFilter::parse("alarm");
        let clock = entry("Clock").with_description("Alarm clock");
        assert!(filter.matches(&clock));
        assert!(!filter.matches(&entry("Clock")));
    }

    #[test]
    fn sorting_ignores_case() {
        let mut entries = vec![entry("beta"), entry("Alpha"), entry("alpine"), entry("Beat")];
        sort_entries(&mut entries);
        let names: Vec<_> = entries.iter().map(|e| e.kind.name.as_str()).collect();
        assert_eq!(names, ["Alpha", "alpine", "Beat", "beta"]);
    }

    #[test]
    fn catalog_filters_into_a_dense_listing() {
        let mut table = IconDataTable::new();
        for name in ["Bell", "ArrowUp", "arrowDown", "Alarm"] {
            table.insert(IconKind::new(IconPack::BoxIcons, name), "M0 0L1 1");
        }
        table.insert(IconKind::new(IconPack::Lucide, "Anchor"), "M0 0L1 1");

        let names: Vec<_> = sorted_kinds(&table, IconPack::BoxIcons)
            .into_iter()
            .map(|kind| kind.name)
            .collect();
        assert_eq!(names, ["Alarm", "arrowDown", "ArrowUp", "Bell"]);

        let mut catalog = IconCatalog::from_source(&table, &[IconPack::BoxIcons, IconPack::Lucide]);
        assert_eq!(catalog.len(), 5);
        assert_eq!(catalog.get(4).map(|e| e.kind.pack), Some(IconPack::Lucide));

        assert_eq!(catalog.set_filter("arrow"), 2);
        assert_eq!(catalog.get(1).map(|e| e.kind.name.as_str()), Some("ArrowUp"));
        assert_eq!(catalog.get(2), None);
        assert_eq!(catalog.set_filter(""), 5);
        assert_eq!(catalog.iter().count(), catalog.entries().len());
    }
}
