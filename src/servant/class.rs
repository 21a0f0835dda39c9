//! Servant class taxonomy

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ServantClass {
    Saber,
    Archer,
    Lancer,
    Rider,
    Assassin,
    Caster,
    Berserker,
    Avenger,
    AlterEgo,
    MoonCancer,
    Foreigner,
    Shielder,
    Unknown,
}

impl ServantClass {
    /// Every class, `Unknown` last.
    pub const ALL: [ServantClass; 13] = [
        ServantClass::Saber,
        ServantClass::Archer,
        ServantClass::Lancer,
        ServantClass::Rider,
        ServantClass::Assassin,
        ServantClass::Caster,
        ServantClass::Berserker,
        ServantClass::Avenger,
        ServantClass::AlterEgo,
        ServantClass::MoonCancer,
        ServantClass::Foreigner,
        ServantClass::Shielder,
        ServantClass::Unknown,
    ];

    /// Classes that ship with a template, in matching priority order.
    pub const TEMPLATE_ORDER: [ServantClass; 3] = [
        ServantClass::Caster,
        ServantClass::Archer,
        ServantClass::Lancer,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ServantClass::Saber => "Saber",
            ServantClass::Archer => "Archer",
            ServantClass::Lancer => "Lancer",
            ServantClass::Rider => "Rider",
            ServantClass::Assassin => "Assassin",
            ServantClass::Caster => "Caster",
            ServantClass::Berserker => "Berserker",
            ServantClass::Avenger => "Avenger",
            ServantClass::AlterEgo => "Alter Ego",
            ServantClass::MoonCancer => "Moon Cancer",
            ServantClass::Foreigner => "Foreigner",
            ServantClass::Shielder => "Shielder",
            ServantClass::Unknown => "Unknown",
        }
    }

    /// File stem of the template image for this class (`caster` -> `caster.png`)
    pub fn file_stem(&self) -> String {
        self.name().replace(' ', "").to_lowercase()
    }

    /// Parse a template file stem back into a class
    pub fn from_file_stem(stem: &str) -> Option<Self> {
        let stem = stem.to_lowercase();
        Self::ALL
            .into_iter()
            .filter(|class| *class != ServantClass::Unknown)
            .find(|class| class.file_stem() == stem)
    }

    pub fn is_known(&self) -> bool {
        *self != ServantClass::Unknown
    }
}

impl fmt::Display for ServantClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
