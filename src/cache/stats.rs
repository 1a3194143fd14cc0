use colored::Colorize;
use serde::{Serialize, Deserialize};

use std::fmt;


const FULL_WIDTH: usize = 60;
const STAT_WIDTH: usize = (FULL_WIDTH - 4) / 2;


/// Counters of a [`SampleCache`](crate::SampleCache).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Queries served from a resident payload.
    pub hits: u64,
    /// Queries that computed the node.
    pub misses: u64,
    /// Population-wide vectors stored.
    pub materialized: u64,
    /// Population-wide sorted indices stored.
    pub sorted: u64,
    /// Entries evicted.
    pub evictions: u64,
    /// Eviction rounds run.
    pub eviction_rounds: u64,
    /// Bytes in use when the snapshot was taken.
    pub used_bytes: usize,
    /// Byte budget. `0` means unlimited.
    pub budget_bytes: usize,
    /// Hysteresis threshold when the snapshot was taken.
    pub eviction_threshold: i64,
}


impl CacheStats {
    /// Returns the ratio of hits over all queries.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 { return 0f64; }
        self.hits as f64 / total as f64
    }


    /// Serializes the counters to JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self)
            .expect("CacheStats is always serializable")
    }


    /// Print the counters as a table.
    pub fn print(&self) {
        let header = format!(
            "{:=>FULL_WIDTH$}\n{:^FULL_WIDTH$}\n{:->FULL_WIDTH$}",
            "", "SAMPLE CACHE".bold(), "",
        );
        let budget = if self.budget_bytes == 0 {
            "Unlimited".to_string()
        } else {
            byte_format(self.budget_bytes)
        };
        println!(
            "\n{header}\n\
            + {:<STAT_WIDTH$}\t{:>STAT_WIDTH$}\n\
            + {:<STAT_WIDTH$}\t{:>STAT_WIDTH$}\n\
            + {:<STAT_WIDTH$}\t{:>STAT_WIDTH$}\n\
            + {:<STAT_WIDTH$}\t{:>STAT_WIDTH$}\n\
            + {:<STAT_WIDTH$}\t{:>STAT_WIDTH$}\n\
            + {:<STAT_WIDTH$}\t{:>STAT_WIDTH$}\n\
            {:=^FULL_WIDTH$}\n",
            "Used".bold(),
            byte_format(self.used_bytes).bold().green(),
            "Budget".bold(),
            budget.bold().green(),
            "Hit rate".bold(),
            format!("{:.3}", self.hit_rate()).bold().yellow(),
            "Stored (vectors/sorted)".bold(),
            format!("{}/{}", self.materialized, self.sorted).bold().cyan(),
            "Evictions (entries/rounds)".bold(),
            format!("{}/{}", self.evictions, self.eviction_rounds).bold().red(),
            "Threshold".bold(),
            self.eviction_threshold.to_string().bold().blue(),
            "".bold(),
        );
    }
}


impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "used {} / budget {}, hits {}, misses {}, evictions {}",
            self.used_bytes, self.budget_bytes,
            self.hits, self.misses, self.evictions,
        )
    }
}


fn byte_format(bytes: usize) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024f64 && unit + 1 < UNITS.len() {
        value /= 1024f64;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.2} {}", UNITS[unit])
    }
}
