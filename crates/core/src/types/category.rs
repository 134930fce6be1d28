//! Product categories.

use serde::{Deserialize, Serialize};

/// Catalog category as exposed by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProductCategory {
    Smartphones,
    PcTablets,
    Monitor,
    ScannerPrinters,
    Accessories,
    UsedRefurbished,
    /// A category added on the backend after this client was built.
    Other(String),
}

impl ProductCategory {
    /// Every category this client knows about, in menu order.
    pub const KNOWN: [Self; 6] = [
        Self::Smartphones,
        Self::PcTablets,
        Self::Monitor,
        Self::ScannerPrinters,
        Self::Accessories,
        Self::UsedRefurbished,
    ];

    /// Wire code (e.g. `PC_TABLETS`).
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::Smartphones => "SMARTPHONES",
            Self::PcTablets => "PC_TABLETS",
            Self::Monitor => "MONITOR",
            Self::ScannerPrinters => "SCANNER_STAMPANTI",
            Self::Accessories => "ACCESSORI",
            Self::UsedRefurbished => "USATO_RICONDIZIONATO",
            Self::Other(code) => code,
        }
    }

    /// Human-readable title for headings and menus.
    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            Self::Smartphones => "Smartphones",
            Self::PcTablets => "PC & Tablets",
            Self::Monitor => "Monitor",
            Self::ScannerPrinters => "Scanners & Printers",
            Self::Accessories => "Accessories",
            Self::UsedRefurbished => "Used & Refurbished",
            Self::Other(code) => code,
        }
    }

    /// Heading for a catalog view filtered by `category` (`None` = all).
    #[must_use]
    pub fn heading(category: Option<&Self>) -> &str {
        category.map_or("All products", Self::title)
    }
}

impl From<String> for ProductCategory {
    fn from(code: String) -> Self {
        match code.as_str() {
            "SMARTPHONES" => Self::Smartphones,
            "PC_TABLETS" => Self::PcTablets,
            "MONITOR" => Self::Monitor,
            "SCANNER_STAMPANTI" => Self::ScannerPrinters,
            "ACCESSORI" => Self::Accessories,
            "USATO_RICONDIZIONATO" => Self::UsedRefurbished,
            _ => Self::Other(code),
        }
    }
}

impl From<ProductCategory> for String {
    fn from(category: ProductCategory) -> Self {
        match category {
            ProductCategory::Other(code) => code,
            known => known.code().to_owned(),
        }
    }
}

impl std::str::FromStr for ProductCategory {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s.trim().to_ascii_uppercase()))
    }
}

impl std::fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}
