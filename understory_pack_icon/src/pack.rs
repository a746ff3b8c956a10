// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The closed set of icon packs.

use core::fmt;
use core::str::FromStr;

use crate::IconError;

macro_rules! icon_packs {
    ($($(#[$meta:meta])* $variant:ident => $name:literal,)*) => {
        /// One of the supported icon packs.
        ///
        /// Every icon belongs to exactly one pack; the pack decides which data
        /// table its path data comes from.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum IconPack {
            $($(#[$meta])* $variant,)*
        }

        impl IconPack {
            /// Every pack, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant,)*];

            /// Stable display name of the pack, as used in icon identifiers.
            #[must_use]
            pub const fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)*
                }
            }
        }
    };
}

icon_packs! {
    /// Bootstrap Icons.
    BootstrapIcons => "BootstrapIcons",
    /// Boxicons.
    BoxIcons => "BoxIcons",
    /// Circum Icons.
    CircumIcons => "CircumIcons",
    /// Visual Studio Code icons.
    Codicons => "Codicons",
    /// Coolicons.
    Coolicons => "Coolicons",
    /// Entypo+.
    Entypo => "Entypo",
    /// Eva Icons.
    EvaIcons => "EvaIcons",
    /// Feather.
    FeatherIcons => "FeatherIcons",
    /// File type icons.
    FileIcons => "FileIcons",
    /// Audio related icons.
    Fontaudio => "Fontaudio",
    /// Font Awesome.
    FontAwesome => "FontAwesome",
    /// Fontisto.
    Fontisto => "Fontisto",
    /// Fork Awesome.
    ForkAwesome => "ForkAwesome",
    /// Game Icons.
    GameIcons => "GameIcons",
    /// Ionicons.
    Ionicons => "Ionicons",
    /// Jam Icons.
    JamIcons => "JamIcons",
    /// Lucide.
    Lucide => "Lucide",
    /// Material Design Icons.
    Material => "Material",
    /// Google Material Design icons.
    MaterialDesign => "MaterialDesign",
    /// Material Design Icons, light variant.
    MaterialLight => "MaterialLight",
    /// Memory pixel icons.
    MemoryIcons => "MemoryIcons",
    /// Microns.
    Microns => "Microns",
    /// Modern UI icons.
    Modern => "Modern",
    /// GitHub Octicons.
    Octicons => "Octicons",
    /// Phosphor Icons.
    PhosphorIcons => "PhosphorIcons",
    /// Picol icons.
    PicolIcons => "PicolIcons",
    /// Pixelart Icons.
    PixelartIcons => "PixelartIcons",
    /// Radix Icons.
    RadixIcons => "RadixIcons",
    /// Remix Icon.
    RemixIcon => "RemixIcon",
    /// RPG Awesome.
    RpgAwesome => "RPGAwesome",
    /// Simple Icons.
    SimpleIcons => "SimpleIcons",
    /// Typicons.
    Typicons => "Typicons",
    /// Unicons.
    Unicons => "Unicons",
    /// Vaadin Icons.
    VaadinIcons => "VaadinIcons",
    /// Weather Icons.
    WeatherIcons => "WeatherIcons",
    /// Zondicons.
    Zondicons => "Zondicons",
}

impl IconPack {
    /// Looks a pack up by its [`name`](Self::name), ignoring ASCII case.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|pack| pack.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for IconPack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for IconPack {
    type Err = IconError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| IconError::UnknownPack(s.into()))
    }
}
