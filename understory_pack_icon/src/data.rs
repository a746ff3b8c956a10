// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Icon path data tables.

use hashbrown::HashMap;

use crate::{IconKind, IconPack};

/// Name reserved for the "no icon" placeholder; never stored as an icon.
pub const PLACEHOLDER_NAME: &str = "None";

/// Supplies SVG path data for icons.
pub trait IconSource {
    /// Path data for `kind`, if the source knows it.
    fn path_data(&self, kind: &IconKind) -> Option<&str>;

    /// Names of every icon in `pack`, in no particular order.
    fn icon_names(&self, pack: IconPack) -> Box<dyn Iterator<Item = &str> + '_>;
}

/// Path data keyed by pack and icon name.
///
/// Packs are loaded independently, typically once each at startup, and the
/// table is then shared read-only.
#[derive(Debug, Clone, Default)]
pub struct IconDataTable {
    packs: HashMap<IconPack, HashMap<String, String>>,
}

impl IconDataTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `data` for `kind`, returning the data it replaced.
    ///
    /// Entries named [`PLACEHOLDER_NAME`] are ignored.
    pub fn insert(&mut self, kind: IconKind, data: impl Into<String>) -> Option<String> {
        if kind.name == PLACEHOLDER_NAME {
            return None;
        }
        self.packs
            .entry(kind.pack)
            .or_default()
            .insert(kind.name, data.into())
    }

    /// Path data for `kind`.
    #[must_use]
    pub fn get(&self, kind: &IconKind) -> Option<&str> {
        self.packs
            .get(&kind.pack)?
            .get(&kind.name)
            .map(String::as_str)
    }

    /// Total number of icons across all packs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.packs.values().map(HashMap::len).sum()
    }

    /// Whether the table holds no icons.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of icons in `pack`.
    #[must_use]
    pub fn pack_len(&self, pack: IconPack) -> usize {
        self.packs.get(&pack).map_or(0, HashMap::len)
    }

    /// Packs with at least one icon, in [`IconPack::ALL`] order.
    pub fn packs(&self) -> impl Iterator<Item = IconPack> + '_ {
        IconPack::ALL
            .iter()
            .copied()
            .filter(|pack| self.pack_len(*pack) > 0)
    }

    /// Every icon kind in `pack`, in no particular order.
    pub fn kinds(&self, pack: IconPack) -> impl Iterator<Item = IconKind> + '_ {
        self.packs
            .get(&pack)
            .into_iter()
            .flat_map(move |icons| icons.keys().map(move |name| IconKind::new(pack, name.as_str())))
    }

    /// Builds a table holding the icons of `pack` from a JSON object that maps
    /// icon names to path data.
    #[cfg(feature = "json")]
    pub fn from_json(pack: IconPack, json: &str) -> Result<Self, crate::IconError> {
        let mut table = Self::new();
        table.load_json(pack, json)?;
        Ok(table)
    }

    /// Adds the icons of `pack` from a JSON object that maps icon names to path
    /// data, returning how many icons were loaded.
    ///
    /// Nothing is inserted unless the whole document is valid.
    #[cfg(feature = "json")]
    pub fn load_json(&mut self, pack: IconPack, json: &str) -> Result<usize, crate::IconError> {
        let object: serde_json::Map<String, serde_json::Value> = serde_json::from_str(json)?;
        let mut icons = HashMap::with_capacity(object.len());
        for (name, value) in object {
            let serde_json::Value::String(data) = value else {
                return Err(crate::IconError::InvalidEntry { pack, name });
            };
            if name != PLACEHOLDER_NAME {
                icons.insert(name, data);
            }
        }
        let loaded = icons.len();
        self.packs.entry(pack).or_default().extend(icons);
        tracing::debug!(%pack, loaded, "loaded icon data");
        Ok(loaded)
    }
}

impl IconSource for IconDataTable {
    fn path_data(&self, kind: &IconKind) -> Option<&str> {
        self.get(kind)
    }

    fn icon_names(&self, pack: IconPack) -> Box<dyn Iterator<Item = &str> + '_> {
        match self.packs.get(&pack) {
            Some(icons) => Box::new(icons.keys().map(String::as_str)),
            None => Box::new(core::iter::empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{IconDataTable, IconSource};
    use crate::{IconKind, IconPack};

    #[test]
    fn insert_and_lookup_per_pack() {
        let mut table = IconDataTable::new();
        let alarm = IconKind::new(IconPack::BoxIcons, "RegularAlarm");
        assert_eq!(table.insert(alarm.clone(), "M0 0L1 1"), None);
        assert_eq!(table.insert(alarm.clone(), "M0 0L2 2").as_deref(), Some("M0 0L1 1"));
        assert_eq!(table.insert(IconKind::new(IconPack::BoxIcons, "None"), "M0 0"), None);
        table.insert(IconKind::new(IconPack::Lucide, "RegularAlarm"), "M1 1");

        assert_eq!(table.get(&alarm), Some("M0 0L2 2"));
        assert_eq!(
            table.path_data(&IconKind::new(IconPack::Lucide, "RegularAlarm")),
            Some("M1 1"),
            "same name in another pack is a different icon"
        );
        assert_eq!(table.len(), 2);
        assert_eq!(table.pack_len(IconPack::BoxIcons), 1);
        assert_eq!(
            table.packs().collect::<Vec<_>>(),
            [IconPack::BoxIcons, IconPack::Lucide]
        );
        assert_eq!(table.kinds(IconPack::BoxIcons).collect::<Vec<_>>(), [alarm]);
        assert_eq!(table.icon_names(IconPack::Octicons).count(), 0);
    }

    #[cfg(feature = "json")]
    #[test]
    fn json_tables_skip_placeholder() {
        let json = r#"{ "None": "", "Alarm": "M0 0L10 10", "Bell": "M1 1H5V5Z" }"#;
        let table = IconDataTable::from_json(IconPack::BoxIcons, json).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.get(&IconKind::new(IconPack::BoxIcons, "Bell")),
            Some("M1 1H5V5Z")
        );
    }

    #[cfg(feature = "json")]
    #[test]
    fn json_errors_leave_table_untouched() {
        let mut table = IconDataTable::new();
        assert!(matches!(
            table.load_json(IconPack::BoxIcons, r#"{ "Alarm": "M0 0", "Bad": 3 }"#),
            Err(crate::IconError::InvalidEntry { name, .. }) if name == "Bad"
        ));
        assert!(matches!(
            table.load_json(IconPack::BoxIcons, "[1, 2]"),
            Err(crate::IconError::Json(_))
        ));
        assert!(table.is_empty());
    }
}
