/// Runs independent per-file work, possibly in parallel.
///
/// Phases that only read the state go through this so the driver decides
/// how work is scheduled. Results come back in input order.
pub trait FileMapper: Sync {
    fn map<T, R, F>(&self, items: &[T], f: F) -> Vec<R>
    where
        T: Sync,
        R: Send,
        F: Fn(&T) -> R + Sync + Send;
}

/// Maps on the calling thread.
#[derive(Copy, Clone, Debug, Default)]
pub struct Sequential;

impl FileMapper for Sequential {
    fn map<T, R, F>(&self, items: &[T], f: F) -> Vec<R>
    where
        T: Sync,
        R: Send,
        F: Fn(&T) -> R + Sync + Send,
    {
        items.iter().map(f).collect()
    }
}
