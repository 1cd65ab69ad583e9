// ── MAC address ──

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A syntactically valid device MAC address.
///
/// Six two-digit hex groups separated by `:` or `-`
/// (`AA:BB:CC:DD:EE:FF`, `aa-bb-cc-dd-ee-ff`). The text is kept exactly as
/// entered; the backend owns uniqueness and normalization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MacAddress(String);

impl MacAddress {
    pub fn parse(raw: impl Into<String>) -> Result<Self, CoreError> {
        let raw = raw.into();
        if is_valid_mac(&raw) {
            Ok(Self(raw))
        } else {
            Err(CoreError::validation(
                "MAC address",
                format!("'{raw}' is not in XX:XX:XX:XX:XX:XX format"),
            ))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// `true` for six hex pairs separated by `:` or `-`, nothing else.
pub fn is_valid_mac(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    bytes.len() == 17
        && bytes.iter().enumerate().all(|(i, b)| {
            if i % 3 == 2 {
                matches!(b, b':' | b'-')
            } else {
                b.is_ascii_hexdigit()
            }
        })
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for MacAddress {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for MacAddress {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<MacAddress> for String {
    fn from(mac: MacAddress) -> Self {
        mac.0
    }
}

impl AsRef<str> for MacAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn accepts_colon_and_dash_forms() {
        for raw in [
            "AA:BB:CC:DD:EE:FF",
            "aa-bb-cc-dd-ee-ff",
            "01:23:45:67:89:ab",
            "aA:0b:Cc:1D:eE:9f",
        ] {
            assert!(is_valid_mac(raw), "{raw} should be accepted");
        }
    }

    #[test]
    fn rejects_malformed() {
        for raw in [
            "",
            "AA:BB:CC:DD:EE",
            "AA:BB:CC:DD:EE:FF:00",
            "AABBCCDDEEFF",
            "AA:BB:CC:DD:EE:FG",
            "AA.BB.CC.DD.EE.FF",
            "A:BB:CC:DD:EE:FFF",
            " AA:BB:CC:DD:EE:FF",
            "AA:BB:CC:DD:EE:FF ",
        ] {
            assert!(!is_valid_mac(raw), "{raw:?} should be rejected");
        }
    }

    #[test]
    fn keeps_text_as_entered() {
        let mac: MacAddress = "aa-bb-cc-dd-ee-ff".parse().unwrap();
        assert_eq!(mac.as_str(), "aa-bb-cc-dd-ee-ff");
        assert!(matches!(
            MacAddress::parse("nope"),
            Err(CoreError::Validation { .. })
        ));
    }
}
