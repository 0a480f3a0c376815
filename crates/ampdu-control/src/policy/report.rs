//! Plain-text listing of both registries, logged after each event when the
//! verbosity asks for it.

use std::fmt;

use crate::domain::{AccessPointRegistry, StationRegistry};

/// Borrowed view over the two registries that renders as two tables.
#[derive(Debug, Clone, Copy)]
pub struct RegistryReport<'a> {
    access_points: &'a AccessPointRegistry,
    stations: &'a StationRegistry,
}

impl<'a> RegistryReport<'a> {
    pub fn new(access_points: &'a AccessPointRegistry, stations: &'a StationRegistry) -> Self {
        Self {
            access_points,
            stations,
        }
    }
}

impl fmt::Display for RegistryReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Access points ({})", self.access_points.count())?;
        writeln!(f, "{:>6}  {:<17}  {:>8}  {:>7}", "id", "mac", "max_ampdu", "channel")?;
        for ap in self.access_points.iter() {
            writeln!(
                f,
                "{:>6}  {:<17}  {:>8}  {:>7}",
                ap.id,
                ap.mac.to_string(),
                ap.max_ampdu_size,
                ap.channel
            )?;
        }

        writeln!(
            f,
            "Stations ({}, {} associated)",
            self.stations.len(),
            self.stations.count_associated()
        )?;
        writeln!(
            f,
            "{:>6}  {:>6}  {:<17}  {:<13}  {:>8}",
            "id", "ap_id", "ap_mac", "application", "max_ampdu"
        )?;
        for sta in self.stations.iter() {
            let (ap_id, ap_mac) = match sta.ap_mac {
                Some(mac) => (
                    self.access_points
                        .lookup_id(&mac)
                        .map_or_else(|| "?".to_string(), |id| id.to_string()),
                    mac.to_string(),
                ),
                None => ("-".to_string(), "-".to_string()),
            };
            writeln!(
                f,
                "{:>6}  {:>6}  {:<17}  {:<13}  {:>8}",
                sta.station_id,
                ap_id,
                ap_mac,
                sta.application.to_string(),
                sta.max_ampdu_size
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ApplicationClass, MacAddr, StationRecord};

    #[test]
    fn lists_both_registries() {
        let mut aps = AccessPointRegistry::new();
        aps.register(0, MacAddr::from_index(1), 65_535, 36).unwrap();
        let mut stas = StationRegistry::new();
        stas.register(StationRecord::new(5, ApplicationClass::TcpDownload, 0))
            .unwrap();
        stas.register(StationRecord::new(6, ApplicationClass::VoipUpload, 0))
            .unwrap();
        stas.get_mut(5).unwrap().associate(MacAddr::from_index(1));

        let text = RegistryReport::new(&aps, &stas).to_string();
        assert!(text.contains("Access points (1)"));
        assert!(text.contains("Stations (2, 1 associated)"));
        assert!(text.contains("00:00:00:00:00:01"));
        assert!(text.contains("TCP download"));
        let sta6 = text.lines().find(|l| l.trim_start().starts_with('6')).unwrap();
        assert!(sta6.contains(" - "));
    }
}
