//! Batch execution of lifecycle hooks. Batches run strictly one after another; entries within a
//! batch run concurrently, on scoped threads or, with the `async` feature, as joined futures.

use crate::error::ContainerError;
use crate::lifecycle::ErrorPtr;
use crate::logging::DebugLog;
use crate::registry::{Batch, Entry};
use itertools::Itertools;
use tracing::error;

fn announce_batch(batch: &[Entry], log: &DebugLog) {
    if batch.len() > 1 && log.is_enabled() {
        log.debug(format_args!(
            "Asynchronously initializing: {}",
            batch.iter().map(Entry::type_name).join(", ")
        ));
    }
}

fn initialization_error(entry: &Entry) -> impl FnOnce(ErrorPtr) -> ContainerError {
    let type_name = entry.type_name();
    move |source| ContainerError::Initialization { type_name, source }
}

fn report_clean_error(entry: &Entry, error: ErrorPtr) {
    error!("Error cleaning {}: {}", entry.type_name(), error);
}

#[cfg(not(feature = "async"))]
fn initialize_entry(entry: &Entry, log: &DebugLog) -> Result<(), ContainerError> {
    let Some(initializer) = entry.object().as_initializer() else {
        return Ok(());
    };

    log.debug(format_args!("Initializing {}", entry.type_name()));
    initializer.init().map_err(initialization_error(entry))?;
    log.debug(format_args!("Initialized {}", entry.type_name()));

    Ok(())
}

/// Initializes all entries of a batch and waits for every one of them to finish. Returns the
/// first error in batch order. A panicking hook is resumed on the calling thread.
#[cfg(not(feature = "async"))]
pub(crate) fn initialize_batch(batch: &[Entry], log: &DebugLog) -> Result<(), ContainerError> {
    if let [entry] = batch {
        return initialize_entry(entry, log);
    }

    announce_batch(batch, log);

    std::thread::scope(|scope| {
        let handles = batch
            .iter()
            .map(|entry| scope.spawn(move || initialize_entry(entry, log)))
            .collect_vec();

        handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
            })
            .collect_vec()
    })
    .into_iter()
    .collect()
}

#[cfg(not(feature = "async"))]
pub(crate) fn initialize_batches(batches: &[Batch], log: &DebugLog) -> Result<(), ContainerError> {
    batches
        .iter()
        .try_for_each(|batch| initialize_batch(batch, log))
}

/// Runs every available cleaner in order, logging failures.
#[cfg(not(feature = "async"))]
pub(crate) fn clean_entries<'a, I: Iterator<Item = &'a Entry>>(entries: I, log: &DebugLog) {
    for entry in entries {
        if let Some(cleaner) = entry.object().as_cleaner() {
            log.debug(format_args!("Cleaning {}", entry.type_name()));
            if let Err(error) = cleaner.clean() {
                report_clean_error(entry, error);
            }
        }
    }
}

#[cfg(feature = "async")]
async fn initialize_entry(entry: &Entry, log: &DebugLog) -> Result<(), ContainerError> {
    let Some(initializer) = entry.object().as_initializer() else {
        return Ok(());
    };

    log.debug(format_args!("Initializing {}", entry.type_name()));
    initializer
        .init()
        .await
        .map_err(initialization_error(entry))?;
    log.debug(format_args!("Initialized {}", entry.type_name()));

    Ok(())
}

/// Initializes all entries of a batch concurrently and waits for every one of them to finish.
/// Returns the first error in batch order.
#[cfg(feature = "async")]
pub(crate) async fn initialize_batch(
    batch: &[Entry],
    log: &DebugLog,
) -> Result<(), ContainerError> {
    announce_batch(batch, log);

    futures::future::join_all(batch.iter().map(|entry| initialize_entry(entry, log)))
        .await
        .into_iter()
        .collect()
}

#[cfg(feature = "async")]
pub(crate) async fn initialize_batches(
    batches: &[Batch],
    log: &DebugLog,
) -> Result<(), ContainerError> {
    for batch in batches {
        initialize_batch(batch, log).await?;
    }

    Ok(())
}

/// Runs every available cleaner in order, logging failures.
#[cfg(feature = "async")]
pub(crate) async fn clean_entries<'a, I: Iterator<Item = &'a Entry>>(entries: I, log: &DebugLog) {
    for entry in entries {
        if let Some(cleaner) = entry.object().as_cleaner() {
            log.debug(format_args!("Cleaning {}", entry.type_name()));
            if let Err(error) = cleaner.clean().await {
                report_clean_error(entry, error);
            }
        }
    }
}

#[cfg(all(test, not(feature = "async")))]
mod tests {
    use crate::error::ContainerError;
    use crate::injectable::{Injectable, ObjectPtr};
    use crate::lifecycle::{Cleaner, ErrorPtr, Initializer};
    use crate::logging::DebugLog;
    use crate::registry::Entry;
    use crate::scheduler::{clean_entries, initialize_batch, initialize_batches};
    use std::fmt::{Display, Formatter};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Barrier};

    #[derive(Debug)]
    struct TestError;

    impl Display for TestError {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            write!(f, "test error")
        }
    }

    impl std::error::Error for TestError {}

    #[derive(Default)]
    struct Counter {
        fail: bool,
        inits: AtomicUsize,
        cleans: AtomicUsize,
    }

    impl Counter {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Default::default()
            }
        }

        fn result(&self) -> Result<(), ErrorPtr> {
            if self.fail {
                Err(Arc::new(TestError) as ErrorPtr)
            } else {
                Ok(())
            }
        }
    }

    impl Injectable for Counter {
        fn as_initializer(&self) -> Option<&dyn Initializer> {
            Some(self)
        }

        fn as_cleaner(&self) -> Option<&dyn Cleaner> {
            Some(self)
        }
    }

    impl Initializer for Counter {
        fn init(&self) -> Result<(), ErrorPtr> {
            self.inits.fetch_add(1, Ordering::SeqCst);
            self.result()
        }
    }

    impl Cleaner for Counter {
        fn clean(&self) -> Result<(), ErrorPtr> {
            self.cleans.fetch_add(1, Ordering::SeqCst);
            self.result()
        }
    }

    // both objects must be running at the same time to pass the barrier
    struct Rendezvous {
        barrier: Arc<Barrier>,
    }

    impl Injectable for Rendezvous {
        fn as_initializer(&self) -> Option<&dyn Initializer> {
            Some(self)
        }
    }

    impl Initializer for Rendezvous {
        fn init(&self) -> Result<(), ErrorPtr> {
            self.barrier.wait();
            Ok(())
        }
    }

    struct Boom;

    impl Injectable for Boom {
        fn as_initializer(&self) -> Option<&dyn Initializer> {
            Some(self)
        }
    }

    impl Initializer for Boom {
        fn init(&self) -> Result<(), ErrorPtr> {
            panic!("boom");
        }
    }

    #[test]
    #[should_panic(expected = "boom")]
    fn should_resume_panic_from_batch() {
        let batch = vec![
            Entry::unnamed(ObjectPtr::new(Boom)),
            Entry::unnamed(ObjectPtr::new(Counter::default())),
        ];

        let _ = initialize_batch(&batch, &DebugLog::default());
    }

    #[test]
    fn should_initialize_batch_concurrently() {
        let barrier = Arc::new(Barrier::new(2));
        let batch = vec![
            Entry::unnamed(ObjectPtr::new(Rendezvous {
                barrier: barrier.clone(),
            })),
            Entry::unnamed(ObjectPtr::new(Rendezvous { barrier })),
        ];

        initialize_batch(&batch, &DebugLog::default()).unwrap();
    }

    #[test]
    fn should_wait_for_whole_batch_on_error() {
        let failing = ObjectPtr::new(Counter::failing());
        let working = ObjectPtr::new(Counter::default());
        let batch = vec![Entry::unnamed(failing.clone()), Entry::unnamed(working.clone())];

        assert!(matches!(
            initialize_batch(&batch, &DebugLog::default()).unwrap_err(),
            ContainerError::Initialization { .. }
        ));
        assert_eq!(failing.inits.load(Ordering::SeqCst), 1);
        assert_eq!(working.inits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn should_stop_at_failing_batch() {
        let failing = ObjectPtr::new(Counter::failing());
        let later = ObjectPtr::new(Counter::default());
        let batches = vec![
            vec![Entry::unnamed(failing)],
            vec![Entry::unnamed(later.clone())],
        ];

        assert!(initialize_batches(&batches, &DebugLog::default()).is_err());
        assert_eq!(later.inits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn should_clean_all_despite_errors() {
        let failing = ObjectPtr::new(Counter::failing());
        let working = ObjectPtr::new(Counter::default());
        let entries = vec![Entry::unnamed(failing.clone()), Entry::unnamed(working.clone())];

        clean_entries(entries.iter(), &DebugLog::default());

        assert_eq!(failing.cleans.load(Ordering::SeqCst), 1);
        assert_eq!(working.cleans.load(Ordering::SeqCst), 1);
    }
}
