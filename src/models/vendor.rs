use serde::{Deserialize, Serialize};
use std::fmt;

/// Retailers with a registered stock extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Vendor {
    Newegg,
    BestBuy,
    MemoryExpress,
    CanadaComputers,
    Amazon,
    PcCanada,
}

impl Vendor {
    pub const ALL: [Vendor; 6] = [
        Vendor::Newegg,
        Vendor::BestBuy,
        Vendor::MemoryExpress,
        Vendor::CanadaComputers,
        Vendor::Amazon,
        Vendor::PcCanada,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Vendor::Newegg => "newegg",
            Vendor::BestBuy => "best_buy",
            Vendor::MemoryExpress => "memory_express",
            Vendor::CanadaComputers => "canada_computers",
            Vendor::Amazon => "amazon",
            Vendor::PcCanada => "pc_canada",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Vendor::Newegg => "Newegg",
            Vendor::BestBuy => "Best Buy",
            Vendor::MemoryExpress => "Memory Express",
            Vendor::CanadaComputers => "Canada Computers",
            Vendor::Amazon => "Amazon",
            Vendor::PcCanada => "PC Canada",
        }
    }
}

impl fmt::Display for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_unique_per_vendor() {
        let mut keys: Vec<_> = Vendor::ALL.iter().map(Vendor::key).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), Vendor::ALL.len());
        assert_eq!(Vendor::MemoryExpress.to_string(), "Memory Express");
    }

    #[test]
    fn serde_uses_snake_case_keys() {
        let vendor: Vendor = serde_json::from_str("\"canada_computers\"").unwrap();
        assert_eq!(vendor, Vendor::CanadaComputers);
        assert_eq!(serde_json::to_string(&Vendor::BestBuy).unwrap(), "\"best_buy\"");
    }
}
