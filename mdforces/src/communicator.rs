use std::sync::{Arc, Barrier, Mutex, PoisonError};

/// A candidate for a distributed minimum or maximum search: the value, the
/// mass of the particle carrying it, and the tag of this particle. Candidates
/// without tag are placeholders for ranks which did not find any particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extremum {
    /// value to compare between candidates
    pub value: f64,
    /// mass of the particle owning this value
    pub mass: f64,
    /// tag of the particle owning this value, `None` if there is no particle
    pub tag: Option<u64>,
}

impl Extremum {
    /// Placeholder candidate used when no particle is available
    pub fn none() -> Extremum {
        Extremum { value: f64::NAN, mass: 0.0, tag: None }
    }

    /// Does this candidate refer to an actual particle?
    pub fn is_some(&self) -> bool {
        self.tag.is_some()
    }

    /// Pick the smallest candidate, using the tag to break ties
    pub fn min(self, other: Extremum) -> Extremum {
        match (self.tag, other.tag) {
            (None, _) => other,
            (_, None) => self,
            (Some(tag), Some(other_tag)) => {
                if other.value < self.value || (other.value == self.value && other_tag < tag) {
                    other
                } else {
                    self
                }
            }
        }
    }

    /// Pick the largest candidate, using the tag to break ties
    pub fn max(self, other: Extremum) -> Extremum {
        match (self.tag, other.tag) {
            (None, _) => other,
            (_, None) => self,
            (Some(tag), Some(other_tag)) => {
                if other.value > self.value || (other.value == self.value && other_tag < tag) {
                    other
                } else {
                    self
                }
            }
        }
    }
}

/// Collective operations between all ranks participating in a simulation.
///
/// All the ranks must call the same collective operations in the same order.
pub trait Communicator: Send + Sync {
    /// Index of the current rank, between 0 and `size()`
    fn rank(&self) -> usize;

    /// Number of participating ranks
    fn size(&self) -> usize;

    /// Sum `value` over all ranks. Every rank gets the same result.
    fn sum(&self, value: f64) -> f64;

    /// Find the candidate with the smallest value over all ranks
    fn minimum(&self, local: Extremum) -> Extremum;

    /// Find the candidate with the largest value over all ranks
    fn maximum(&self, local: Extremum) -> Extremum;
}

/// Communicator for simulations running on a single rank
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleProcess;

impl Communicator for SingleProcess {
    fn rank(&self) -> usize {
        0
    }

    fn size(&self) -> usize {
        1
    }

    fn sum(&self, value: f64) -> f64 {
        value
    }

    fn minimum(&self, local: Extremum) -> Extremum {
        local
    }

    fn maximum(&self, local: Extremum) -> Extremum {
        local
    }
}

#[derive(Debug)]
struct SharedSlots {
    slots: Mutex<Vec<Extremum>>,
    barrier: Barrier,
}

/// Communicator between threads of the same process, each thread acting as a
/// separate rank. This is mainly useful to test code running on multiple
/// ranks.
///
/// ```
/// # use mdforces::{Communicator, LocalCommunicator};
/// let handles = LocalCommunicator::group(3).into_iter()
///     .map(|comm| std::thread::spawn(move || comm.sum(comm.rank() as f64)))
///     .collect::<Vec<_>>();
///
/// for handle in handles {
///     assert_eq!(handle.join().unwrap(), 3.0);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct LocalCommunicator {
    rank: usize,
    size: usize,
    shared: Arc<SharedSlots>,
}

impl LocalCommunicator {
    /// Create `size` communicators connected to one another, one for each
    /// rank. Each of them should be moved to a different thread.
    pub fn group(size: usize) -> Vec<LocalCommunicator> {
        assert!(size > 0, "can not create an empty group of communicators");
        let shared = Arc::new(SharedSlots {
            slots: Mutex::new(vec![Extremum::none(); size]),
            barrier: Barrier::new(size),
        });

        return (0..size).map(|rank| LocalCommunicator {
            rank: rank,
            size: size,
            shared: Arc::clone(&shared),
        }).collect();
    }

    /// Send `value` to all ranks, and get the values from all ranks
    fn all_gather(&self, value: Extremum) -> Vec<Extremum> {
        {
            let mut slots = self.shared.slots.lock().unwrap_or_else(PoisonError::into_inner);
            slots[self.rank] = value;
        }
        self.shared.barrier.wait();

        let values = self.shared.slots.lock().unwrap_or_else(PoisonError::into_inner).clone();
        // nobody can overwrite the slots before all ranks have read them
        self.shared.barrier.wait();

        return values;
    }
}

impl Communicator for LocalCommunicator {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.size
    }

    fn sum(&self, value: f64) -> f64 {
        let local = Extremum { value: value, mass: 0.0, tag: None };
        self.all_gather(local).iter().map(|v| v.value).sum()
    }

    fn minimum(&self, local: Extremum) -> Extremum {
        self.all_gather(local).into_iter().fold(Extremum::none(), Extremum::min)
    }

    fn maximum(&self, local: Extremum) -> Extremum {
        self.all_gather(local).into_iter().fold(Extremum::none(), Extremum::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(value: f64, tag: u64) -> Extremum {
        Extremum { value: value, mass: 1.0, tag: Some(tag) }
    }

    #[test]
    fn extremum() {
        let a = candidate(1.0, 3);
        let b = candidate(2.0, 1);
        let c = candidate(1.0, 0);

        assert_eq!(a.min(b), a);
        assert_eq!(a.max(b), b);
        assert_eq!(a.min(c), c);
        assert_eq!(a.max(c), c);

        assert_eq!(a.min(Extremum::none()), a);
        assert_eq!(Extremum::none().max(b), b);
        assert!(!Extremum::none().min(Extremum::none()).is_some());
    }

    #[test]
    fn single_process() {
        let comm = SingleProcess;
        assert_eq!(comm.rank(), 0);
        assert_eq!(comm.size(), 1);
        assert_eq!(comm.sum(3.5), 3.5);
        assert_eq!(comm.minimum(candidate(1.0, 2)), candidate(1.0, 2));
    }

    #[test]
    fn local_group() {
        let handles = LocalCommunicator::group(4).into_iter().map(|comm| {
            std::thread::spawn(move || {
                let rank = comm.rank() as f64;
                let sum = comm.sum(rank + 1.0);

                let local = if comm.rank() == 2 {
                    Extremum::none()
                } else {
                    candidate(f64::sin(rank), comm.rank() as u64)
                };
                let min = comm.minimum(local);
                let max = comm.maximum(local);

                // repeated collective operations use the same slots
                let second_sum = comm.sum(2.0);
                (sum, min, max, second_sum)
            })
        }).collect::<Vec<_>>();

        for handle in handles {
            let (sum, min, max, second_sum) = handle.join().unwrap();
            assert_eq!(sum, 10.0);
            assert_eq!(second_sum, 8.0);
            // sin(0) = 0, sin(1) = 0.84, sin(3) = 0.14
            assert_eq!(min.tag, Some(0));
            assert_eq!(max.tag, Some(1));
        }
    }
}
