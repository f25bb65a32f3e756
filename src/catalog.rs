//! Round content supplied at construction
//!
//! A catalog is an ordered list of rounds, each pairing one class with three
//! candidate interfaces and the index of the one it implements. Catalogs are
//! validated once when built or deserialized; a `Catalog` value is always
//! non-empty with in-range answers.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::TRIPLE_SIZE;

/// Fatal configuration problems, reported once at startup
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog has no rounds")]
    Empty,

    #[error("round {round}: correct index {index} is outside its interface triple")]
    CorrectIndexOutOfRange { round: usize, index: usize },

    #[error("invalid catalog json: {0}")]
    Json(#[from] serde_json::Error),
}

/// The class shown for a round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDef {
    pub title: String,
    #[serde(default)]
    pub properties: Vec<String>,
    #[serde(default)]
    pub methods: Vec<String>,
}

/// One candidate interface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceDef {
    pub name: String,
    #[serde(default)]
    pub requirements: Vec<String>,
}

/// A class, its three candidate interfaces and which one is correct
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundDef {
    pub class: ClassDef,
    pub interfaces: [InterfaceDef; TRIPLE_SIZE],
    /// Offset of the correct interface within `interfaces`
    pub correct: usize,
}

#[derive(Deserialize)]
struct RawCatalog {
    rounds: Vec<RoundDef>,
}

/// Validated, immutable round content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawCatalog")]
pub struct Catalog {
    rounds: Vec<RoundDef>,
}

impl TryFrom<RawCatalog> for Catalog {
    type Error = CatalogError;

    fn try_from(raw: RawCatalog) -> Result<Self, Self::Error> {
        Catalog::new(raw.rounds)
    }
}

impl Catalog {
    /// Build a catalog, rejecting empty content and out-of-range answers
    pub fn new(rounds: Vec<RoundDef>) -> Result<Self, CatalogError> {
        if rounds.is_empty() {
            return Err(CatalogError::Empty);
        }
        if let Some((round, def)) = rounds
            .iter()
            .enumerate()
            .find(|(_, r)| r.correct >= TRIPLE_SIZE)
        {
            return Err(CatalogError::CorrectIndexOutOfRange {
                round,
                index: def.correct,
            });
        }
        Ok(Self { rounds })
    }

    /// Parse and validate a catalog from JSON (`{"rounds": [...]}`).
    /// Malformed JSON is `Json`; well-formed but invalid content keeps its
    /// own variant.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let raw: RawCatalog = serde_json::from_str(json)?;
        Catalog::new(raw.rounds)
    }

    pub fn rounds(&self) -> &[RoundDef] {
        &self.rounds
    }

    pub fn len(&self) -> usize {
        self.rounds.len()
    }

    /// Never true for a validated catalog
    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }
}

fn class(title: &str, properties: &[&str], methods: &[&str]) -> ClassDef {
    ClassDef {
        title: title.to_string(),
        properties: properties.iter().map(|s| s.to_string()).collect(),
        methods: methods.iter().map(|s| s.to_string()).collect(),
    }
}

fn iface(name: &str, requirements: &[&str]) -> InterfaceDef {
    InterfaceDef {
        name: name.to_string(),
        requirements: requirements.iter().map(|s| s.to_string()).collect(),
    }
}

impl Default for Catalog {
    /// The built-in C# tutorial: five classes, one correct interface each
    fn default() -> Self {
        let rounds = vec![
            RoundDef {
                class: class(
                    "Dog",
                    &["string Name", "int Age", "string Breed"],
                    &["Bark()", "Fetch()", "Sleep()"],
                ),
                interfaces: [
                    iface("IVehicle", &["Model", "Year", "Start", "Stop"]),
                    iface("IPet", &["Name", "Age", "Fetch"]),
                    iface("IReadable", &["Title", "Read"]),
                ],
                correct: 1,
            },
            RoundDef {
                class: class(
                    "Car",
                    &["string Model", "int Year", "string Color"],
                    &["Start()", "Stop()", "Drive()"],
                ),
                interfaces: [
                    iface("IVehicle", &["Model", "Year", "Start", "Stop"]),
                    iface("IAnimal", &["Name", "Age", "Bark"]),
                    iface("IReadable", &["Title", "Read"]),
                ],
                correct: 0,
            },
            RoundDef {
                class: class(
                    "Book",
                    &["string Title", "string Author", "int Pages"],
                    &["Read()", "Close()", "Bookmark()"],
                ),
                interfaces: [
                    iface("IPet", &["Name", "Age", "Fetch"]),
                    iface("IVehicle", &["Model", "Drive"]),
                    iface("IReadable", &["Title", "Author", "Read"]),
                ],
                correct: 2,
            },
            RoundDef {
                class: class(
                    "Person",
                    &["string Name", "int Age", "string Email"],
                    &["Work()", "Eat()", "Sleep()"],
                ),
                interfaces: [
                    iface("IDevice", &["Brand", "TurnOn", "TurnOff"]),
                    iface("IWorker", &["Name", "Work"]),
                    iface("ILiving", &["Age", "Eat", "Sleep"]),
                ],
                correct: 2,
            },
            RoundDef {
                class: class(
                    "Computer",
                    &["string Brand", "int RAM", "string OS"],
                    &["TurnOn()", "TurnOff()", "Process()"],
                ),
                interfaces: [
                    iface("IVehicle", &["Model", "Drive"]),
                    iface("IDevice", &["Brand", "TurnOn", "TurnOff"]),
                    iface("IAnimal", &["Name", "Age", "Bark"]),
                ],
                correct: 1,
            },
        ];
        Self { rounds }
    }
}
