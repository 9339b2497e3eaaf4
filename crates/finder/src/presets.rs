//! Quick searches and canned assistant questions.

use std::str::FromStr;

/// One-tap search targets.
pub const QUICK_SEARCHES: &[&str] = &["phone", "keys", "remote"];

/// Canned questions for the camera assistant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickQuestion {
    DescribeObject,
    ReadText,
    IdentifyMoney,
    ReadMedicine,
    DescribeColors,
}

impl QuickQuestion {
    pub const ALL: [QuickQuestion; 5] = [
        QuickQuestion::DescribeObject,
        QuickQuestion::ReadText,
        QuickQuestion::IdentifyMoney,
        QuickQuestion::ReadMedicine,
        QuickQuestion::DescribeColors,
    ];

    /// Short name used on the command line.
    pub fn key(self) -> &'static str {
        match self {
            QuickQuestion::DescribeObject => "describe",
            QuickQuestion::ReadText => "read",
            QuickQuestion::IdentifyMoney => "money",
            QuickQuestion::ReadMedicine => "medicine",
            QuickQuestion::DescribeColors => "colors",
        }
    }

    /// The prompt sent to the analyzer.
    pub fn prompt(self) -> &'static str {
        match self {
            QuickQuestion::DescribeObject => "What is this object? Describe it in detail.",
            QuickQuestion::ReadText => "Read all text visible in this image clearly and completely.",
            QuickQuestion::IdentifyMoney => "Is this money? What is the denomination and currency?",
            QuickQuestion::ReadMedicine => {
                "Read this medicine label. Tell me the name, dosage, expiry date, and if it is safe to use."
            }
            QuickQuestion::DescribeColors => "What colors do you see? Describe the colors and patterns.",
        }
    }
}

impl FromStr for QuickQuestion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|q| q.key() == key)
            .ok_or_else(|| {
                let known: Vec<&str> = Self::ALL.iter().map(|q| q.key()).collect();
                format!("Unknown preset '{s}' (expected one of: {})", known.join(", "))
            })
    }
}
