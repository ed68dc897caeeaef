use serde::{Deserialize, Serialize};

/// Query statistics summary from `/control/stats`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    /// Total DNS queries in the stats window
    #[serde(default)]
    pub num_dns_queries: u64,

    /// Queries blocked by filtering rules
    #[serde(default)]
    pub num_blocked_filtering: u64,

    /// Queries rewritten by safe browsing
    #[serde(default)]
    pub num_replaced_safebrowsing: u64,

    /// Average processing time in seconds
    #[serde(default)]
    pub avg_processing_time: f64,
}

impl Stats {
    /// Share of queries blocked, in percent.
    ///
    /// Returns 0 when no queries were made. The result is always within
    /// `[0, 100]`, even if the server reports more blocks than queries.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn block_percentage(&self) -> f64 {
        if self.num_dns_queries == 0 {
            return 0.0;
        }
        let pct = self.num_blocked_filtering as f64 / self.num_dns_queries as f64 * 100.0;
        pct.clamp(0.0, 100.0)
    }

    /// Average processing time in milliseconds
    #[must_use]
    pub fn avg_processing_ms(&self) -> f64 {
        (self.avg_processing_time * 1000.0).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(queries: u64, blocked: u64) -> Stats {
        Stats {
            num_dns_queries: queries,
            num_blocked_filtering: blocked,
            ..Default::default()
        }
    }

    #[test]
    fn test_block_percentage() {
        let pct = stats(5678, 1234).block_percentage();
        assert!((pct - 21.733).abs() < 0.01, "got {pct}");
    }

    #[test]
    fn test_block_percentage_zero_queries() {
        assert!(stats(0, 0).block_percentage().abs() < f64::EPSILON);
        assert!(stats(0, 17).block_percentage().abs() < f64::EPSILON);
    }

    #[test]
    fn test_block_percentage_bounds() {
        for (queries, blocked) in [(1, 0), (1, 1), (3, 2), (10, 25), (u64::MAX, u64::MAX)] {
            let pct = stats(queries, blocked).block_percentage();
            assert!((0.0..=100.0).contains(&pct), "{queries}/{blocked} -> {pct}");
        }
    }

    #[test]
    fn test_parse_stats() {
        let json = r#"{
            "num_dns_queries": 12543,
            "num_blocked_filtering": 3421,
            "num_replaced_safebrowsing": 12,
            "num_replaced_parental": 0,
            "avg_processing_time": 0.05,
            "top_queried_domains": []
        }"#;

        let stats: Stats = serde_json::from_str(json).unwrap();
        assert_eq!(stats.num_dns_queries, 12543);
        assert_eq!(stats.num_blocked_filtering, 3421);
        assert_eq!(stats.num_replaced_safebrowsing, 12);
        assert!((stats.avg_processing_ms() - 50.0).abs() < 1e-9);
    }
}
