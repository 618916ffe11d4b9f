//! Phone record models produced by the extraction pipeline.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Egyptian mobile network operator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Carrier {
    #[default]
    Orange,
    Vodafone,
    Etisalat,
    We,
}

impl Carrier {
    /// All carriers, in keyword precedence order.
    pub const ALL: [Carrier; 4] = [
        Carrier::Orange,
        Carrier::Vodafone,
        Carrier::Etisalat,
        Carrier::We,
    ];

    /// English display name.
    pub fn name(&self) -> &'static str {
        match self {
            Carrier::Orange => "Orange",
            Carrier::Vodafone => "Vodafone",
            Carrier::Etisalat => "Etisalat",
            Carrier::We => "WE",
        }
    }

    /// Arabic display name.
    pub fn arabic_name(&self) -> &'static str {
        match self {
            Carrier::Orange => "اورانج",
            Carrier::Vodafone => "فودافون",
            Carrier::Etisalat => "اتصالات",
            Carrier::We => "وي",
        }
    }

    /// Brand color as a hex string.
    pub fn brand_color(&self) -> &'static str {
        match self {
            Carrier::Orange => "#FFC000",
            Carrier::Vodafone => "#FF0000",
            Carrier::Etisalat => "#00B050",
            Carrier::We => "#7030A0",
        }
    }
}

impl fmt::Display for Carrier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a carrier name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCarrier(pub String);

impl fmt::Display for UnknownCarrier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown carrier: {}", self.0)
    }
}

impl std::error::Error for UnknownCarrier {}

impl FromStr for Carrier {
    type Err = UnknownCarrier;

    /// Parse an English or Arabic carrier name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        match normalized.as_str() {
            "orange" | "mobinil" | "اورانج" | "أورانج" | "اورنج" | "موبينيل" => Ok(Carrier::Orange),
            "vodafone" | "vf" | "فودافون" | "ڤودافون" => Ok(Carrier::Vodafone),
            "etisalat" | "اتصالات" | "إتصالات" => Ok(Carrier::Etisalat),
            "we" | "te data" | "tedata" | "وي" => Ok(Carrier::We),
            _ => Err(UnknownCarrier(s.to_string())),
        }
    }
}

/// A validated phone number with its attribution, as returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneRecord {
    /// Canonical 11-digit number (`01[0125]` + 8 digits).
    pub phone_number: String,

    /// Attributed carrier.
    pub carrier: Carrier,

    /// Whether the source text mentioned a mobile wallet.
    pub has_wallet: bool,

    /// Truncated source text, for diagnostics.
    pub source_text_excerpt: String,
}

/// Customer details found in recognized text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerInfo {
    /// 14-digit national ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub national_id: Option<String>,

    /// Customer name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl CustomerInfo {
    /// Whether nothing was found.
    pub fn is_empty(&self) -> bool {
        self.national_id.is_none() && self.name.is_none()
    }
}
