//! Network quality classification from client hint headers

use std::collections::HashMap;

use super::device::mobile_pattern;

/// Header names consulted by the classifiers
pub const USER_AGENT: &str = "user-agent";
pub const ACCEPT: &str = "accept";
pub const SAVE_DATA: &str = "save-data";
pub const ECT: &str = "ect";
pub const DOWNLINK: &str = "downlink";
pub const RTT: &str = "rtt";
pub const CONNECTION_TYPE: &str = "x-connection-type";

/// Coarse network quality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionClass {
    Slow,
    Moderate,
    Fast,
}

/// Typed view of the request headers used for classification
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientSignals {
    pub user_agent: Option<String>,
    pub accept: Option<String>,
    pub save_data: Option<String>,
    pub effective_type: Option<String>,
    /// Downlink estimate in Mbps
    pub downlink: Option<f64>,
    /// Round-trip time estimate in milliseconds
    pub rtt: Option<f64>,
    pub connection_type: Option<String>,
}

impl ClientSignals {
    /// Extract signals from request headers (names matched case-insensitively)
    ///
    /// Numeric hints that do not parse to a finite number are absent.
    pub fn from_headers(headers: &HashMap<String, String>) -> Self {
        Self {
            user_agent: header(headers, USER_AGENT),
            accept: header(headers, ACCEPT),
            save_data: header(headers, SAVE_DATA),
            effective_type: header(headers, ECT),
            downlink: header(headers, DOWNLINK).and_then(|v| parse_number(&v)),
            rtt: header(headers, RTT).and_then(|v| parse_number(&v)),
            connection_type: header(headers, CONNECTION_TYPE),
        }
    }
}

fn header(headers: &HashMap<String, String>, name: &str) -> Option<String> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.trim().to_string())
}

fn parse_number(value: &str) -> Option<f64> {
    value.parse::<f64>().ok().filter(|n| n.is_finite())
}

impl ConnectionClass {
    /// Classify the connection from the first signal that yields a class
    ///
    /// Order: Save-Data, ECT, Downlink, RTT, connection type, Accept
    /// format support, mobile User-Agent, then fast.
    pub fn detect(signals: &ClientSignals) -> Self {
        if signals
            .save_data
            .as_deref()
            .is_some_and(|v| v.eq_ignore_ascii_case("on"))
        {
            return ConnectionClass::Slow;
        }

        if let Some(class) = signals.effective_type.as_deref().and_then(from_effective_type) {
            return class;
        }

        if let Some(mbps) = signals.downlink {
            return if mbps < 1.5 {
                ConnectionClass::Slow
            } else if mbps < 4.0 {
                ConnectionClass::Moderate
            } else {
                ConnectionClass::Fast
            };
        }

        if let Some(ms) = signals.rtt {
            return if ms > 300.0 {
                ConnectionClass::Slow
            } else if ms > 150.0 {
                ConnectionClass::Moderate
            } else {
                ConnectionClass::Fast
            };
        }

        if let Some(class) = signals.connection_type.as_deref().and_then(from_connection_type) {
            return class;
        }

        // Clients that cannot take modern formats are treated as constrained
        let accept = signals.accept.as_deref().unwrap_or_default().to_ascii_lowercase();
        if !accept.contains("webp") && !accept.contains("avif") {
            return ConnectionClass::Moderate;
        }

        if signals
            .user_agent
            .as_deref()
            .is_some_and(|ua| mobile_pattern().is_match(ua))
        {
            return ConnectionClass::Moderate;
        }

        ConnectionClass::Fast
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionClass::Slow => "slow",
            ConnectionClass::Moderate => "moderate",
            ConnectionClass::Fast => "fast",
        }
    }
}

fn from_effective_type(value: &str) -> Option<ConnectionClass> {
    match value.to_ascii_lowercase().as_str() {
        "slow-2g" | "2g" => Some(ConnectionClass::Slow),
        "3g" => Some(ConnectionClass::Moderate),
        "4g" => Some(ConnectionClass::Fast),
        _ => None,
    }
}

fn from_connection_type(value: &str) -> Option<ConnectionClass> {
    match value.to_ascii_lowercase().as_str() {
        "cellular" | "2g" | "3g" | "slow-2g" | "bluetooth" | "wimax" => Some(ConnectionClass::Slow),
        "4g" | "lte" => Some(ConnectionClass::Moderate),
        "wifi" | "ethernet" => Some(ConnectionClass::Fast),
        _ => None,
    }
}
