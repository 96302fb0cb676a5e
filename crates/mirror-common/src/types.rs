//! Core types shared by the mirror pipeline and its stores

use serde::{Deserialize, Serialize};

/// Separator used when a list attribute is flattened into one column
pub const LIST_SEPARATOR: &str = ",";

/// Outcome of fetching a single id from the remote source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResult<T> {
    /// The source returned an entity for this id
    Found(T),
    /// Nothing exists at this id; used as an end-of-data signal
    NotFound,
}

impl<T> FetchResult<T> {
    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchResult::NotFound)
    }

    pub fn found(self) -> Option<T> {
        match self {
            FetchResult::Found(item) => Some(item),
            FetchResult::NotFound => None,
        }
    }
}

/// A person as persisted by the mirror
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonRecord {
    pub name: String,
    pub gender: String,
    pub hair_color: String,
    pub eye_color: String,
    pub skin_color: String,
    pub birth_year: String,
    pub homeworld: String,
    pub height: String,
    pub mass: String,
    pub films: Vec<String>,
    pub species: Vec<String>,
    pub starships: Vec<String>,
    pub vehicles: Vec<String>,
}

/// Column-shaped form of a [`PersonRecord`]
///
/// List attributes are comma-joined. An empty list becomes an empty
/// string, and an empty string reads back as an empty list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonRow {
    pub name: String,
    pub gender: String,
    pub hair_color: String,
    pub eye_color: String,
    pub skin_color: String,
    pub birth_year: String,
    pub homeworld: String,
    pub height: String,
    pub mass: String,
    pub films: String,
    pub species: String,
    pub starships: String,
    pub vehicles: String,
}

impl PersonRecord {
    pub fn to_row(&self) -> PersonRow {
        PersonRow {
            name: self.name.clone(),
            gender: self.gender.clone(),
            hair_color: self.hair_color.clone(),
            eye_color: self.eye_color.clone(),
            skin_color: self.skin_color.clone(),
            birth_year: self.birth_year.clone(),
            homeworld: self.homeworld.clone(),
            height: self.height.clone(),
            mass: self.mass.clone(),
            films: join_list(&self.films),
            species: join_list(&self.species),
            starships: join_list(&self.starships),
            vehicles: join_list(&self.vehicles),
        }
    }
}

impl From<PersonRow> for PersonRecord {
    fn from(row: PersonRow) -> Self {
        Self {
            films: split_list(&row.films),
            species: split_list(&row.species),
            starships: split_list(&row.starships),
            vehicles: split_list(&row.vehicles),
            name: row.name,
            gender: row.gender,
            hair_color: row.hair_color,
            eye_color: row.eye_color,
            skin_color: row.skin_color,
            birth_year: row.birth_year,
            homeworld: row.homeworld,
            height: row.height,
            mass: row.mass,
        }
    }
}

/// Flatten a list attribute into its stored column value
pub fn join_list(items: &[String]) -> String {
    items.join(LIST_SEPARATOR)
}

/// Inverse of [`join_list`]
pub fn split_list(column: &str) -> Vec<String> {
    if column.is_empty() {
        return Vec::new();
    }
    column.split(LIST_SEPARATOR).map(str::to_string).collect()
}
