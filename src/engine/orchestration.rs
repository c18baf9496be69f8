//! Module focusing on the way the scans are distributed between worker threads

use std::{
    any::Any,
    panic::{AssertUnwindSafe, catch_unwind},
    sync::{
        Mutex, PoisonError,
        mpsc::{SyncSender, sync_channel},
    },
    thread::Scope,
};

use tracing::error;

use crate::output::{ScanError, ScanItem};

///
/// Runs `scan` once for every (region, instance type) pair of the cross product, using at most `num_workers`
/// worker threads, and returns all produced items.
///
/// Workers pull pairs from a shared queue, so a slow region only occupies its own worker. Items are
/// collected in the order in which the pairs complete, which differs between runs. Blocks until every pair
/// has been scanned.
///
/// A scan that panics is reported as a single error item of its region; the other pairs are unaffected.
///
pub fn run_parallel<F>(
    scan: F,
    regions: &[String],
    instance_types: &[String],
    num_workers: usize,
) -> Vec<ScanItem>
where
    F: Fn(&str, &str) -> Vec<ScanItem> + Sync,
{
    let units: Vec<(&str, &str)> = regions
        .iter()
        .flat_map(|region| {
            instance_types
                .iter()
                .map(move |instance_type| (region.as_str(), instance_type.as_str()))
        })
        .collect();

    if units.is_empty() {
        return Vec::new();
    }

    let num_workers = num_workers.clamp(1, units.len());
    let queue = Mutex::new(units.into_iter());

    std::thread::scope(|s| {
        let (result_tx, result_rx) = sync_channel::<Vec<ScanItem>>(num_workers);

        for _ in 0..num_workers {
            spawn_worker(s, &queue, &scan, result_tx.clone());
        }

        // Workers hold their own clones; the channel closes once the last worker exits
        drop(result_tx);

        let mut results = Vec::new();
        for items in result_rx {
            results.extend(items);
        }
        results
    })
}

fn spawn_worker<'s, 'e, 'a, I, F>(
    s: &'s Scope<'s, 'e>,
    queue: &'e Mutex<I>,
    scan: &'e F,
    result_tx: SyncSender<Vec<ScanItem>>,
) where
    I: Iterator<Item = (&'a str, &'a str)> + Send,
    F: Fn(&str, &str) -> Vec<ScanItem> + Sync,
{
    s.spawn(move || {
        while let Some((region, instance_type)) = next_unit(queue) {
            let items = catch_unwind(AssertUnwindSafe(|| scan(region, instance_type)))
                .unwrap_or_else(|payload| vec![panicked(region, instance_type, payload.as_ref())]);
            // Send fails only if the collecting thread is gone, in which case nobody needs the rest
            if result_tx.send(items).is_err() {
                break;
            }
        }
    });
}

fn panicked(region: &str, instance_type: &str, payload: &(dyn Any + Send)) -> ScanItem {
    let cause = payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown cause");
    error!(region, instance_type, "scan panicked: {cause}");

    ScanItem::Error(ScanError {
        region: region.to_string(),
        error: format!("scan panicked: {cause}"),
    })
}

fn next_unit<I: Iterator>(queue: &Mutex<I>) -> Option<I::Item> {
    // The lock is never held across a scan, a poisoned queue is still consistent
    queue.lock().unwrap_or_else(PoisonError::into_inner).next()
}
