use std::sync::Arc;

use crate::shared::{Coordinate, Identifiable, Locale};

/// A rail station as loaded from the station dataset. Immutable once loaded.
#[derive(Debug, Default, Clone)]
pub struct Station {
    /// Position of the station in the dataset, used for O(1) lookups.
    pub index: u32,
    /// Stable, unique key (e.g. `SEOUL`).
    pub code: Arc<str>,
    /// Display names indexed by [`Locale`] declaration order.
    pub names: [Arc<str>; 4],
    pub(crate) normalized_names: [Arc<str>; 4],
    pub coordinate: Coordinate,
    pub region: Option<Arc<str>>,
    /// Served by express (KTX/SRT) trains.
    pub is_primary_hub: bool,
    pub is_active: bool,
}

impl Station {
    const fn slot(locale: Locale) -> usize {
        match locale {
            Locale::Ko => 0,
            Locale::En => 1,
            Locale::Ja => 2,
            Locale::Zh => 3,
        }
    }

    /// Localized name, falling back to the English name when the locale has none.
    pub fn name_in(&self, locale: Locale) -> &str {
        let name = &self.names[Self::slot(locale)];
        if name.is_empty() {
            &self.names[Self::slot(Locale::En)]
        } else {
            name
        }
    }

    pub(crate) fn set_normalized_names(&mut self) {
        self.normalized_names = Locale::ALL.map(|locale| self.name_in(locale).to_lowercase().into());
    }
}

impl Identifiable for Station {
    fn id(&self) -> &str {
        &self.code
    }

    fn name(&self, locale: Locale) -> &str {
        self.name_in(locale)
    }

    fn normalized_name(&self, locale: Locale) -> &str {
        &self.normalized_names[Self::slot(locale)]
    }
}

/// A station projected onto a single display language.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalizedStation {
    pub code: Arc<str>,
    pub name: Arc<str>,
    pub locale: Locale,
    pub coordinate: Coordinate,
    pub region: Option<Arc<str>>,
    pub is_primary_hub: bool,
    pub is_active: bool,
}

impl Station {
    pub fn localized(&self, locale: Locale) -> LocalizedStation {
        LocalizedStation {
            code: self.code.clone(),
            name: self.name_in(locale).into(),
            locale,
            coordinate: self.coordinate,
            region: self.region.clone(),
            is_primary_hub: self.is_primary_hub,
            is_active: self.is_active,
        }
    }
}
