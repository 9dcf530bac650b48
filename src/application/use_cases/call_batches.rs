use crate::domain::records::{CallBatch, CallStats, CallStatus, NormalizedRecord};

pub const DEFAULT_BATCH_SIZE: usize = 10;

/// Splits cleaned records into call batches for the workflow
#[derive(Debug, Clone, Copy)]
pub struct CallBatchPlanner {
    batch_size: usize,
}

impl Default for CallBatchPlanner {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl CallBatchPlanner {
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
        }
    }

    pub fn plan(&self, records: &[NormalizedRecord]) -> Vec<CallBatch> {
        records
            .chunks(self.batch_size)
            .enumerate()
            .map(|(index, chunk)| CallBatch {
                id: index + 1,
                records: chunk.to_vec(),
                status: CallStatus::Pending,
            })
            .collect()
    }

    pub fn stats(&self, records: &[NormalizedRecord]) -> CallStats {
        CallStats {
            total: records.len(),
            ..CallStats::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(n: usize) -> Vec<NormalizedRecord> {
        (1..=n).map(NormalizedRecord::with_id).collect()
    }

    #[test]
    fn test_plan_splits_into_batches_of_ten() {
        let batches = CallBatchPlanner::default().plan(&records(23));
        assert_eq!(batches.len(), 3);
        assert_eq!(batches[0].id, 1);
        assert_eq!(batches[2].records.len(), 3);
        assert_eq!(batches[2].records[0].id, 21);
        assert!(batches.iter().all(|b| b.status == CallStatus::Pending));
    }

    #[test]
    fn test_plan_empty() {
        assert!(CallBatchPlanner::default().plan(&[]).is_empty());
    }

    #[test]
    fn test_zero_batch_size_is_clamped() {
        assert_eq!(CallBatchPlanner::new(0).plan(&records(2)).len(), 2);
    }

    #[test]
    fn test_stats_start_pending() {
        let stats = CallBatchPlanner::default().stats(&records(4));
        assert_eq!(stats.total, 4);
        assert_eq!(stats.completed + stats.in_progress + stats.failed, 0);
    }
}
