//! Wire model for SWAPI people

use mirror_common::PersonRecord;
use serde::{Deserialize, Serialize};

/// One person as served by the people endpoint
///
/// Only `name` is mandatory. swapi.tech omits the film/species/starship/vehicle
/// lists, so every other field falls back to empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPerson {
    pub name: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub hair_color: String,
    #[serde(default)]
    pub eye_color: String,
    #[serde(default)]
    pub skin_color: String,
    #[serde(default)]
    pub birth_year: String,
    #[serde(default)]
    pub homeworld: String,
    #[serde(default)]
    pub height: String,
    #[serde(default)]
    pub mass: String,
    #[serde(default)]
    pub films: Vec<String>,
    #[serde(default)]
    pub species: Vec<String>,
    #[serde(default)]
    pub starships: Vec<String>,
    #[serde(default)]
    pub vehicles: Vec<String>,
}

/// Response body of `GET {people}/{id}`
///
/// swapi.dev returns the person document directly; swapi.tech wraps it as
/// `{"result": {"properties": {...}}}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum PersonPayload {
    Envelope { result: EnvelopeResult },
    Flat(RawPerson),
}

#[derive(Debug, Deserialize)]
pub struct EnvelopeResult {
    pub properties: RawPerson,
}

impl PersonPayload {
    pub fn into_person(self) -> RawPerson {
        match self {
            PersonPayload::Envelope { result } => result.properties,
            PersonPayload::Flat(person) => person,
        }
    }
}

impl From<RawPerson> for PersonRecord {
    fn from(raw: RawPerson) -> Self {
        Self {
            name: raw.name,
            gender: raw.gender,
            hair_color: raw.hair_color,
            eye_color: raw.eye_color,
            skin_color: raw.skin_color,
            birth_year: raw.birth_year,
            homeworld: raw.homeworld,
            height: raw.height,
            mass: raw.mass,
            films: raw.films,
            species: raw.species,
            starships: raw.starships,
            vehicles: raw.vehicles,
        }
    }
}
