//! Division → district → upazila lookup over the embedded address book.

use serde::Deserialize;

const ADDRESS_JSON: &str = include_str!("../data/address.json");

#[derive(Debug, Clone, Deserialize)]
pub struct AddressBook {
    divisions: Vec<Division>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Division {
    pub name: String,
    pub districts: Vec<District>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct District {
    pub name: String,
    pub upazilas: Vec<String>,
}

impl AddressBook {
    /// The address book compiled into the binary.
    pub fn embedded() -> Result<Self, serde_json::Error> {
        Self::from_json(ADDRESS_JSON)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let book: Self = serde_json::from_str(json)?;
        log::debug!("address book: {} divisions", book.divisions.len());
        Ok(book)
    }

    pub fn divisions(&self) -> Vec<&str> {
        self.divisions.iter().map(|d| d.name.as_str()).collect()
    }

    pub fn districts(&self, division: &str) -> Vec<&str> {
        self.division(division)
            .map(|d| d.districts.iter().map(|d| d.name.as_str()).collect())
            .unwrap_or_default()
    }

    pub fn upazilas(&self, division: &str, district: &str) -> Vec<&str> {
        self.division(division)
            .and_then(|d| d.districts.iter().find(|d| d.name == district))
            .map(|d| d.upazilas.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    fn division(&self, name: &str) -> Option<&Division> {
        self.divisions.iter().find(|d| d.name == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Division,
    District,
    Upazila,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::Division, Level::District, Level::Upazila];

    pub fn label(self) -> &'static str {
        match self {
            Level::Division => "Division",
            Level::District => "District",
            Level::Upazila => "Upazila",
        }
    }

    pub fn next(self) -> Option<Level> {
        match self {
            Level::Division => Some(Level::District),
            Level::District => Some(Level::Upazila),
            Level::Upazila => None,
        }
    }

    pub fn previous(self) -> Option<Level> {
        match self {
            Level::Division => None,
            Level::District => Some(Level::Division),
            Level::Upazila => Some(Level::District),
        }
    }
}

/// The chosen division, district and upazila.
///
/// A level can only be set once its parent is, and changing a level clears
/// every level below it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressSelection {
    division: Option<String>,
    district: Option<String>,
    upazila: Option<String>,
}

impl AddressSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self, level: Level) -> Option<&str> {
        match level {
            Level::Division => self.division.as_deref(),
            Level::District => self.district.as_deref(),
            Level::Upazila => self.upazila.as_deref(),
        }
    }

    /// Choices for `level`. Empty until the parent level is chosen.
    pub fn options<'a>(&self, book: &'a AddressBook, level: Level) -> Vec<&'a str> {
        match level {
            Level::Division => book.divisions(),
            Level::District => match &self.division {
                Some(division) => book.districts(division),
                None => Vec::new(),
            },
            Level::Upazila => match (&self.division, &self.district) {
                (Some(division), Some(district)) => book.upazilas(division, district),
                _ => Vec::new(),
            },
        }
    }

    /// Choose `value` at `level`. Returns false when it is not one of the
    /// level's options. Choosing a different value clears the children.
    pub fn select(&mut self, book: &AddressBook, level: Level, value: &str) -> bool {
        if !self.options(book, level).contains(&value) {
            log::debug!("{} {:?} not available", level.label(), value);
            return false;
        }
        if self.value(level) != Some(value) {
            if let Some(child) = level.next() {
                self.clear(child);
            }
            *self.slot(level) = Some(value.to_string());
        }
        true
    }

    /// Clear `level` and every level below it.
    pub fn clear(&mut self, level: Level) {
        *self.slot(level) = None;
        if let Some(child) = level.next() {
            self.clear(child);
        }
    }

    pub fn is_complete(&self) -> bool {
        self.upazila.is_some()
    }

    /// "Savar, Dhaka, Dhaka", most specific first.
    pub fn label(&self) -> String {
        Level::ALL
            .iter()
            .rev()
            .filter_map(|level| self.value(*level))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn slot(&mut self, level: Level) -> &mut Option<String> {
        match level {
            Level::Division => &mut self.division,
            Level::District => &mut self.district,
            Level::Upazila => &mut self.upazila,
        }
    }
}
