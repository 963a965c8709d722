use serde::{Deserialize, Serialize};

use super::CatalogEntry;

/// 노즐(부족팽창 제트) 모델.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NozzleModel {
    Birch,
    Birch2,
    EwanMoody,
    Molkov,
    Yuce,
}

impl CatalogEntry for NozzleModel {
    const ALL: &'static [Self] = &[
        NozzleModel::Birch,
        NozzleModel::Birch2,
        NozzleModel::EwanMoody,
        NozzleModel::Molkov,
        NozzleModel::Yuce,
    ];
    const FALLBACK: Self = NozzleModel::Yuce;

    fn ordinal(self) -> u8 {
        match self {
            NozzleModel::Birch => 0,
            NozzleModel::Birch2 => 1,
            NozzleModel::EwanMoody => 2,
            NozzleModel::Molkov => 3,
            NozzleModel::Yuce => 4,
        }
    }

    fn name(self) -> &'static str {
        match self {
            NozzleModel::Birch => "Birch",
            NozzleModel::Birch2 => "Birch2",
            NozzleModel::EwanMoody => "Ewan/Moody",
            NozzleModel::Molkov => "Molkov",
            NozzleModel::Yuce => "Yuceil/Otugen",
        }
    }

    fn key(self) -> &'static str {
        match self {
            NozzleModel::Birch => "birc",
            NozzleModel::Birch2 => "bir2",
            NozzleModel::EwanMoody => "ewan",
            NozzleModel::Molkov => "molk",
            NozzleModel::Yuce => "yuce",
        }
    }
}

/// 연료 종류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FuelType {
    Hydrogen,
    Methane,
    Propane,
}

impl CatalogEntry for FuelType {
    const ALL: &'static [Self] = &[FuelType::Hydrogen, FuelType::Methane, FuelType::Propane];
    const FALLBACK: Self = FuelType::Hydrogen;

    fn ordinal(self) -> u8 {
        match self {
            FuelType::Hydrogen => 0,
            FuelType::Methane => 1,
            FuelType::Propane => 2,
        }
    }

    fn name(self) -> &'static str {
        match self {
            FuelType::Hydrogen => "Hydrogen",
            FuelType::Methane => "Methane",
            FuelType::Propane => "Propane",
        }
    }

    fn key(self) -> &'static str {
        match self {
            FuelType::Hydrogen => "h2",
            FuelType::Methane => "ch4",
            FuelType::Propane => "c3h8",
        }
    }
}

/// 열복사 피해 프로빗 모델.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ThermalProbitModel {
    Eisenberg,
    Tsao,
    Tno,
    Lees,
}

impl CatalogEntry for ThermalProbitModel {
    const ALL: &'static [Self] = &[
        ThermalProbitModel::Eisenberg,
        ThermalProbitModel::Tsao,
        ThermalProbitModel::Tno,
        ThermalProbitModel::Lees,
    ];
    const FALLBACK: Self = ThermalProbitModel::Eisenberg;

    fn ordinal(self) -> u8 {
        match self {
            ThermalProbitModel::Eisenberg => 0,
            ThermalProbitModel::Tsao => 1,
            ThermalProbitModel::Tno => 2,
            ThermalProbitModel::Lees => 3,
        }
    }

    fn name(self) -> &'static str {
        match self {
            ThermalProbitModel::Eisenberg => "Eisenberg",
            ThermalProbitModel::Tsao => "Tsao",
            ThermalProbitModel::Tno => "TNO",
            ThermalProbitModel::Lees => "Lees",
        }
    }

    fn key(self) -> &'static str {
        match self {
            ThermalProbitModel::Eisenberg => "eise",
            ThermalProbitModel::Tsao => "tsao",
            ThermalProbitModel::Tno => "tno",
            ThermalProbitModel::Lees => "lees",
        }
    }
}

/// 과압 피해 프로빗 모델.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OverpressureProbitModel {
    LungEisenberg,
    LungHse,
    HeadImpact,
    Collapse,
    Debris,
}

impl CatalogEntry for OverpressureProbitModel {
    const ALL: &'static [Self] = &[
        OverpressureProbitModel::LungEisenberg,
        OverpressureProbitModel::LungHse,
        OverpressureProbitModel::HeadImpact,
        OverpressureProbitModel::Collapse,
        OverpressureProbitModel::Debris,
    ];
    const FALLBACK: Self = OverpressureProbitModel::Collapse;

    fn ordinal(self) -> u8 {
        match self {
            OverpressureProbitModel::LungEisenberg => 0,
            OverpressureProbitModel::LungHse => 1,
            OverpressureProbitModel::HeadImpact => 2,
            OverpressureProbitModel::Collapse => 3,
            OverpressureProbitModel::Debris => 4,
        }
    }

    fn name(self) -> &'static str {
        match self {
            OverpressureProbitModel::LungEisenberg => "Lung (Eisenberg)",
            OverpressureProbitModel::LungHse => "Lung (HSE)",
            OverpressureProbitModel::HeadImpact => "Head Impact",
            OverpressureProbitModel::Collapse => "Collapse",
            OverpressureProbitModel::Debris => "Debris",
        }
    }

    fn key(self) -> &'static str {
        match self {
            OverpressureProbitModel::LungEisenberg => "leis",
            OverpressureProbitModel::LungHse => "lhse",
            OverpressureProbitModel::HeadImpact => "head",
            OverpressureProbitModel::Collapse => "coll",
            OverpressureProbitModel::Debris => "debr",
        }
    }
}

/// 비밀폐 공간 폭연 과압 모델.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DeflagrationModel {
    Bst,
    Tnt,
    Bauwens,
}

impl CatalogEntry for DeflagrationModel {
    const ALL: &'static [Self] = &[
        DeflagrationModel::Bst,
        DeflagrationModel::Tnt,
        DeflagrationModel::Bauwens,
    ];
    const FALLBACK: Self = DeflagrationModel::Bst;

    fn ordinal(self) -> u8 {
        match self {
            DeflagrationModel::Bst => 0,
            DeflagrationModel::Tnt => 1,
            DeflagrationModel::Bauwens => 2,
        }
    }

    fn name(self) -> &'static str {
        match self {
            DeflagrationModel::Bst => "BST",
            DeflagrationModel::Tnt => "TNT Equivalence",
            DeflagrationModel::Bauwens => "Bauwens",
        }
    }

    fn key(self) -> &'static str {
        match self {
            DeflagrationModel::Bst => "bst",
            DeflagrationModel::Tnt => "tnt",
            DeflagrationModel::Bauwens => "bauwens",
        }
    }
}

macro_rules! catalog_string_conversions {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for String {
                fn from(value: $ty) -> Self {
                    value.key().to_string()
                }
            }

            impl From<String> for $ty {
                fn from(value: String) -> Self {
                    <$ty as CatalogEntry>::parse_or_default(&value)
                }
            }

            impl std::fmt::Display for $ty {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    f.write_str(self.name())
                }
            }
        )*
    };
}

catalog_string_conversions!(
    NozzleModel,
    FuelType,
    ThermalProbitModel,
    OverpressureProbitModel,
    DeflagrationModel,
);
