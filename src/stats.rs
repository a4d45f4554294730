use alloc::vec::Vec;

/// Probe statistics for a [`HashMap`](crate::HashMap).
#[derive(Debug, Clone, PartialEq)]
pub struct DebugStats {
    /// Number of entries currently in the table
    pub populated: usize,
    /// Number of slots in the current table
    pub capacity: usize,
    /// Number of tombstoned slots
    pub tombstones: usize,
    /// Position of the current capacity in the size schedule
    pub size_index: usize,
    /// Load factor (populated / capacity)
    pub load_factor: f64,
    /// Longest distance, in strides, between an entry and its home slot
    pub max_probe_length: usize,
}

impl DebugStats {
    /// Pretty-print the debug statistics.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("=== Hash Table Debug Statistics ===");
        println!(
            "Population: {}/{} ({:.2}% load factor)",
            self.populated,
            self.capacity,
            self.load_factor * 100.0
        );
        println!("Tombstones: {}", self.tombstones);
        println!("Size index: {}", self.size_index);
        println!("Longest probe: {}", self.max_probe_length);
    }
}

/// Counts of entries by how many strides they sit from their home slot.
///
/// Bin `n` holds the number of entries found `n` strides into their probe
/// sequence; bin 0 holds the entries sitting in their home slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProbeHistogram {
    bins: Vec<usize>,
}

impl ProbeHistogram {
    pub(crate) fn record(&mut self, length: usize) {
        if self.bins.len() <= length {
            self.bins.resize(length + 1, 0);
        }
        self.bins[length] += 1;
    }

    /// Returns the bins, indexed by probe length.
    pub fn bins(&self) -> &[usize] {
        &self.bins
    }

    /// Returns the number of entries counted.
    pub fn total(&self) -> usize {
        self.bins.iter().sum()
    }

    /// Returns the longest probe length recorded, or 0 for an empty
    /// histogram.
    pub fn max_probe_length(&self) -> usize {
        self.bins.len().saturating_sub(1)
    }

    /// Returns the mean probe length, or 0 for an empty histogram.
    pub fn mean(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        let weighted: usize = self.bins.iter().enumerate().map(|(n, c)| n * c).sum();
        weighted as f64 / total as f64
    }

    /// Pretty-prints the histogram horizontally using stdout.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        let max = self.bins.iter().copied().max().unwrap_or(0);
        if max == 0 {
            println!("probe histogram: empty");
            return;
        }

        let max_bar = 60usize;
        let total_units = max_bar * 8;
        println!(
            "probe histogram ({} entries, mean {:.2}):",
            self.total(),
            self.mean()
        );

        let make_bar = |count: usize| -> String {
            if count == 0 {
                return String::new();
            }
            let units = ((count as u128 * total_units as u128).div_ceil(max as u128)) as usize;
            let mut bar = "█".repeat(units / 8);
            let partial = match units % 8 {
                1 => Some('▏'),
                2 => Some('▎'),
                3 => Some('▍'),
                4 => Some('▌'),
                5 => Some('▋'),
                6 => Some('▊'),
                7 => Some('▉'),
                _ => None,
            };
            bar.extend(partial);
            bar
        };

        for (length, &count) in self.bins.iter().enumerate() {
            println!("{:>3} | {} ({})", length, make_bar(count), count);
        }
    }
}
