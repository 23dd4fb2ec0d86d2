//! Progress events emitted during transfers.

/// Event emitted on the progress channel during an upload.
///
/// Delivery guarantee: events are sent in issuance order over a tokio mpsc
/// channel, so a live receiver observes them in order, at least once each.
/// A dropped receiver never fails the transfer — remaining events are
/// silently discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferEvent {
    /// A part finished uploading.
    Progress {
        key: String,
        /// `floor(100 * transferred_bytes / total_bytes)`; 100 for an
        /// empty file.
        percent: u8,
        transferred_bytes: u64,
        total_bytes: u64,
    },
    /// The upload completed and the object is visible at `key`.
    Completed { key: String },
    /// The upload failed; the session has been aborted.
    Failed { key: String, error: String },
}

impl TransferEvent {
    /// Computes the percent value carried by progress events.
    pub(crate) fn percent_of(transferred: u64, total: u64) -> u8 {
        if total == 0 {
            100
        } else {
            (transferred * 100 / total) as u8
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_floors() {
        assert_eq!(TransferEvent::percent_of(1, 3), 33);
        assert_eq!(TransferEvent::percent_of(2, 3), 66);
        assert_eq!(TransferEvent::percent_of(3, 3), 100);
    }

    #[test]
    fn percent_of_empty_file_is_complete() {
        assert_eq!(TransferEvent::percent_of(0, 0), 100);
    }

    #[test]
    fn percent_zero_progress() {
        assert_eq!(TransferEvent::percent_of(0, 10), 0);
    }
}
