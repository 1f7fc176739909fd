use {
    crate::{Batch, Op, Order, Record, Storage},
    std::{
        cmp::Ordering,
        iter::{self, Peekable},
        mem,
        ops::Bound,
    },
};

/// A key-value storage with an in-memory write buffer.
///
/// Writes and deletes are held in memory until `commit` is called. Dropping
/// the buffer without committing discards them, which is how a pool's batch
/// is rolled back when its settlement fails.
pub struct Buffer<S> {
    base: S,
    pending: Batch,
}

impl<S> Buffer<S> {
    pub fn new(base: S) -> Self {
        Self {
            base,
            pending: Batch::new(),
        }
    }
}

impl<S> Buffer<S>
where
    S: Storage,
{
    /// Flush pending ops to the underlying store.
    pub fn commit(&mut self) {
        let pending = mem::take(&mut self.pending);
        self.base.flush(pending);
    }
}

impl<S> Storage for Buffer<S>
where
    S: Storage,
{
    fn read(&self, key: &[u8]) -> Option<Vec<u8>> {
        match self.pending.get(key) {
            Some(Op::Insert(value)) => Some(value.clone()),
            Some(Op::Delete) => None,
            None => self.base.read(key),
        }
    }

    fn scan<'a>(
        &'a self,
        min: Option<&[u8]>,
        max: Option<&[u8]>,
        order: Order,
    ) -> Box<dyn Iterator<Item = Record> + 'a> {
        if let (Some(min), Some(max)) = (min, max) {
            if min > max {
                return Box::new(iter::empty());
            }
        }

        let base = self.base.scan(min, max, order);

        let min = min.map_or(Bound::Unbounded, |bytes| Bound::Included(bytes.to_vec()));
        let max = max.map_or(Bound::Unbounded, |bytes| Bound::Excluded(bytes.to_vec()));
        let pending_raw = self.pending.range::<Vec<u8>, _>((min, max));

        let pending: Box<dyn Iterator<Item = _>> = match order {
            Order::Ascending => Box::new(pending_raw),
            Order::Descending => Box::new(pending_raw.rev()),
        };

        Box::new(Merged::new(base, pending, order))
    }

    fn write(&mut self, key: &[u8], value: &[u8]) {
        self.pending.insert(key.to_vec(), Op::Insert(value.to_vec()));
    }

    fn remove(&mut self, key: &[u8]) {
        self.pending.insert(key.to_vec(), Op::Delete);
    }

    fn remove_range(&mut self, min: Option<&[u8]>, max: Option<&[u8]>) {
        // Find all keys within the bounds, in both the base and pending, and
        // mark them all as to be deleted.
        let deletes = self
            .scan_keys(min, max, Order::Ascending)
            .map(|key| (key, Op::Delete))
            .collect::<Vec<_>>();

        self.pending.extend(deletes);
    }

    fn flush(&mut self, batch: Batch) {
        // When we do `a.extend(b)`, while `a` and `b` have common keys, the
        // values in `b` are chosen. This is exactly what we want.
        self.pending.extend(batch);
    }
}

struct Merged<'a, B, P>
where
    B: Iterator<Item = Record>,
    P: Iterator<Item = (&'a Vec<u8>, &'a Op)>,
{
    base: Peekable<B>,
    pending: Peekable<P>,
    order: Order,
}

impl<'a, B, P> Merged<'a, B, P>
where
    B: Iterator<Item = Record>,
    P: Iterator<Item = (&'a Vec<u8>, &'a Op)>,
{
    fn new(base: B, pending: P, order: Order) -> Self {
        Self {
            base: base.peekable(),
            pending: pending.peekable(),
            order,
        }
    }

    fn take_pending(&mut self) -> Option<Record> {
        let (key, op) = self.pending.next()?;

        match op {
            Op::Insert(value) => Some((key.clone(), value.clone())),
            Op::Delete => self.next(),
        }
    }
}

impl<'a, B, P> Iterator for Merged<'a, B, P>
where
    B: Iterator<Item = Record>,
    P: Iterator<Item = (&'a Vec<u8>, &'a Op)>,
{
    type Item = Record;

    fn next(&mut self) -> Option<Self::Item> {
        match (self.base.peek(), self.pending.peek()) {
            (Some((base_key, _)), Some((pending_key, _))) => {
                let ordering = match self.order {
                    Order::Ascending => base_key.cmp(pending_key),
                    Order::Descending => base_key.cmp(pending_key).reverse(),
                };

                match ordering {
                    Ordering::Less => self.base.next(),
                    Ordering::Equal => {
                        self.base.next();
                        self.take_pending()
                    },
                    Ordering::Greater => self.take_pending(),
                }
            },
            (None, Some(_)) => self.take_pending(),
            (Some(_), None) => self.base.next(),
            (None, None) => None,
        }
    }
}

// ----------------------------------- tests -----------------------------------
