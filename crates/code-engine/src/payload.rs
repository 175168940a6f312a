//! Structured QR payloads.

use std::str::FromStr;

/// Wi-Fi authentication scheme advertised in a join payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WifiAuth {
    #[default]
    Wpa,
    Wep,
    NoPass,
}

impl WifiAuth {
    fn payload_tag(self) -> &'static str {
        match self {
            Self::Wpa => "WPA",
            Self::Wep => "WEP",
            Self::NoPass => "nopass",
        }
    }
}

impl FromStr for WifiAuth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "WPA" | "WPA2" | "WPA/WPA2" => Ok(Self::Wpa),
            "WEP" => Ok(Self::Wep),
            "NONE" | "NOPASS" | "OPEN" => Ok(Self::NoPass),
            _ => Err(format!("unknown Wi-Fi auth type: {s} (expected WPA, WEP or none)")),
        }
    }
}

/// Build a `WIFI:` join payload understood by phone camera apps.
///
/// Backslashes and semicolons in the SSID and password are escaped.
pub fn format_wifi_payload(ssid: &str, password: &str, auth: WifiAuth) -> String {
    format!(
        "WIFI:T:{};S:{};P:{};;",
        auth.payload_tag(),
        escape_field(ssid),
        escape_field(password)
    )
}

fn escape_field(value: &str) -> String {
    value.replace('\\', "\\\\").replace(';', "\\;")
}
