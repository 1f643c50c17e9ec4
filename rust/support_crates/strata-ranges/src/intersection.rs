use std::{cmp, iter::Peekable};

/// Creates an iterator over the set-intersection of two ascending streams of
/// positions.
///
/// Each input must yield items in non-decreasing order. Duplicates are allowed
/// on either side; the produced iterator:
/// * Yields only items present in BOTH inputs.
/// * Yields items in strictly ascending order.
/// * Never yields duplicates.
/// * Performs a streaming merge without materializing intermediate collections.
///
/// Complexity: O(len(a) + len(b)) comparisons; only constant additional memory.
pub fn intersect<T, L, R>(a: L, b: R) -> Intersection<L::IntoIter, R::IntoIter, T>
where
    T: Ord + Clone,
    L: IntoIterator<Item = T>,
    R: IntoIterator<Item = T>,
{
    Intersection::new(a.into_iter(), b.into_iter())
}

/// Iterator adapter yielding the set-intersection of two ascending streams.
pub struct Intersection<I, J, T>
where
    I: Iterator<Item = T>,
    J: Iterator<Item = T>,
{
    a: Peekable<I>,
    b: Peekable<J>,
    last: Option<T>,
}

impl<I, J, T> Intersection<I, J, T>
where
    I: Iterator<Item = T>,
    J: Iterator<Item = T>,
    T: Ord + Clone,
{
    pub fn new(a: I, b: J) -> Self {
        Self {
            a: a.peekable(),
            b: b.peekable(),
            last: None,
        }
    }
}

impl<I, J, T> Iterator for Intersection<I, J, T>
where
    I: Iterator<Item = T>,
    J: Iterator<Item = T>,
    T: Ord + Clone,
{
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (pa, pb) = match (self.a.peek(), self.b.peek()) {
                (Some(a), Some(b)) => (a, b),
                _ => return None,
            };
            match pa.cmp(pb) {
                cmp::Ordering::Less => {
                    self.a.next();
                }
                cmp::Ordering::Greater => {
                    self.b.next();
                }
                cmp::Ordering::Equal => {
                    let v = self.a.next()?;
                    self.b.next();
                    if self.last.as_ref() == Some(&v) {
                        continue;
                    }
                    self.last = Some(v.clone());
                    return Some(v);
                }
            }
        }
    }
}
