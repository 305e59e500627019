//! Dashboard overview: one parallel sweep over all five lists, reduced to
//! summary counts.

use std::sync::Arc;

use anyhow::Result;

use crate::RecordStore;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardStats {
    pub kurse: usize,
    pub dozenten: usize,
    pub teilnehmer: usize,
    pub raeume: usize,
    pub anmeldungen: usize,
    pub bezahlt: usize,
}

impl DashboardStats {
    pub fn offene_zahlungen(&self) -> usize {
        self.anmeldungen - self.bezahlt
    }

    /// Payment rate as a percentage, rounded; undefined without enrollments.
    pub fn payment_rate(&self) -> Option<u32> {
        if self.anmeldungen == 0 {
            return None;
        }
        Some((self.bezahlt as f64 / self.anmeldungen as f64 * 100.0).round() as u32)
    }

    /// "40 %", or the placeholder dash when there is nothing to divide.
    pub fn payment_rate_label(&self) -> String {
        match self.payment_rate() {
            Some(rate) => format!("{rate} %"),
            None => "—".to_string(),
        }
    }

    /// "4 von 10"
    pub fn payment_sub_label(&self) -> String {
        format!("{} von {}", self.bezahlt, self.anmeldungen)
    }

    /// "4 bezahlt · 6 offen"
    pub fn enrollment_sub_label(&self) -> String {
        format!(
            "{} bezahlt · {} offen",
            self.bezahlt,
            self.offene_zahlungen()
        )
    }
}

pub struct OverviewController {
    store: Arc<dyn RecordStore>,
    pub stats: Option<DashboardStats>,
    pub loading: bool,
}

#[derive(Debug, Clone, Default)]
pub struct OverviewSnapshot {
    pub stats: Option<DashboardStats>,
    pub loading: bool,
}

impl OverviewController {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            stats: None,
            loading: false,
        }
    }

    pub async fn load(&mut self) -> Result<()> {
        self.loading = true;
        let result = tokio::try_join!(
            self.store.list_courses(),
            self.store.list_instructors(),
            self.store.list_participants(),
            self.store.list_rooms(),
            self.store.list_enrollments(),
        );
        self.loading = false;
        let (kurse, dozenten, teilnehmer, raeume, anmeldungen) = result?;
        self.stats = Some(DashboardStats {
            kurse: kurse.len(),
            dozenten: dozenten.len(),
            teilnehmer: teilnehmer.len(),
            raeume: raeume.len(),
            anmeldungen: anmeldungen.len(),
            bezahlt: anmeldungen.iter().filter(|a| a.fields.bezahlt).count(),
        });
        Ok(())
    }

    pub fn snapshot(&self) -> OverviewSnapshot {
        OverviewSnapshot {
            stats: self.stats,
            loading: self.loading,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_rate_rounds_to_whole_percent() {
        let stats = DashboardStats {
            anmeldungen: 10,
            bezahlt: 4,
            ..DashboardStats::default()
        };
        assert_eq!(stats.payment_rate(), Some(40));
        assert_eq!(stats.payment_rate_label(), "40 %");
        assert_eq!(stats.payment_sub_label(), "4 von 10");
        assert_eq!(stats.enrollment_sub_label(), "4 bezahlt · 6 offen");
    }

    #[test]
    fn payment_rate_without_enrollments_is_a_placeholder() {
        let stats = DashboardStats::default();
        assert_eq!(stats.payment_rate(), None);
        assert_eq!(stats.payment_rate_label(), "—");
    }

    #[test]
    fn uneven_rates_round_instead_of_truncating() {
        let stats = DashboardStats {
            anmeldungen: 3,
            bezahlt: 2,
            ..DashboardStats::default()
        };
        assert_eq!(stats.payment_rate(), Some(67));
    }
}
